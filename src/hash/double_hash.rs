//! 双哈希器 - 使用两个独立种子的哈希函数

use crate::types::Fingerprint;
use ahash::RandomState;
use std::hash::{BuildHasher, Hash, Hasher};
use twox_hash::XxHash64;

/// 双哈希器
///
/// 主哈希决定槽位索引（以及分片选择的高位切片），副哈希仅用于派生指纹。
/// 两者必须使用不同种子，使得 `h1(k)` 与 `h2(k)` 在统计上不相关。
#[derive(Clone, Debug)]
pub struct DoubleHasher {
    primary: RandomState,
    secondary_seed: u64,
}

impl DoubleHasher {
    /// 使用指定种子创建双哈希器
    pub fn new(primary_seed: u64, secondary_seed: u64) -> Self {
        Self {
            primary: RandomState::with_seed(primary_seed as usize),
            secondary_seed,
        }
    }

    /// 主哈希 - 槽位定位
    #[inline]
    pub fn hash_primary<K: Hash + ?Sized>(&self, key: &K) -> u64 {
        let mut hasher = self.primary.build_hasher();
        key.hash(&mut hasher);
        hasher.finish()
    }

    /// 副哈希 - 指纹来源
    #[inline]
    pub fn hash_secondary<K: Hash + ?Sized>(&self, key: &K) -> u64 {
        let mut hasher = XxHash64::with_seed(self.secondary_seed);
        key.hash(&mut hasher);
        hasher.finish()
    }

    /// 从键派生非零指纹
    #[inline]
    pub fn fingerprint<K: Hash + ?Sized>(&self, key: &K) -> Fingerprint {
        Fingerprint::from_hash(self.hash_secondary(key))
    }
}

impl Default for DoubleHasher {
    fn default() -> Self {
        super::default_hasher()
    }
}

// 单元测试
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_key_same_hashes() {
        let hasher = DoubleHasher::new(42, 123);
        let k = String::from("consistent_key");
        assert_eq!(hasher.hash_primary(&k), hasher.hash_primary(&k));
        assert_eq!(hasher.hash_secondary(&k), hasher.hash_secondary(&k));
        assert_eq!(hasher.fingerprint(&k), hasher.fingerprint(&k));
    }

    #[test]
    fn test_seed_changes_hash() {
        let a = DoubleHasher::new(1, 123);
        let b = DoubleHasher::new(2, 123);
        let k = 0xDEAD_BEEFu64;
        assert_ne!(a.hash_primary(&k), b.hash_primary(&k), "不同种子应产生不同主哈希");
    }

    #[test]
    fn test_fingerprint_never_zero() {
        let hasher = DoubleHasher::new(42, 123);
        for i in 0..10_000u64 {
            assert!(!hasher.fingerprint(&i).is_zero(), "键 {} 产生了零指纹", i);
        }
    }

    #[test]
    fn test_primary_secondary_independent() {
        let hasher = DoubleHasher::new(42, 123);
        let k = "some_key";
        assert_ne!(hasher.hash_primary(k), hasher.hash_secondary(k));
    }
}
