//! Cuckoo多重映射 - 允许重复键的可增长容器
//!
//! 与映射同构，但插入不做唯一性预检。同一键在单代内至多占据其两个
//! 候选位置；更多重复沿扩容级联进入更新的代。

use crate::error::CuckooError;
use crate::map::cuckoo_map::{CuckooMapConfig, CuckooMapStats};
use crate::map::internal::{InternalTable, TableInsert};
use crate::stats;
use crate::types::{Fingerprint, OperationType};
use crate::DoubleHasher;
use std::hash::Hash;

/// Cuckoo多重映射
pub struct CuckooMultiMap<K, V> {
    generations: Vec<InternalTable<K, V>>,
    hasher: DoubleHasher,
    config: CuckooMapConfig,
}

impl<K: Hash + Eq, V> CuckooMultiMap<K, V> {
    /// 创建指定初始容量的多重映射
    pub fn new(initial_capacity: usize) -> Result<Self, CuckooError> {
        Self::with_config(CuckooMapConfig::with_capacity(initial_capacity))
    }

    /// 从配置创建多重映射
    pub fn with_config(config: CuckooMapConfig) -> Result<Self, CuckooError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: CuckooMapConfig) -> Self {
        let capacity = config.rounded_capacity();
        let table = InternalTable::with_capacity(capacity, config.walk_for(capacity));
        Self {
            hasher: config.build_hasher(),
            generations: vec![table],
            config,
        }
    }

    #[inline]
    fn key_coords(&self, key: &K) -> (u64, Fingerprint) {
        (self.hasher.hash_primary(key), self.hasher.fingerprint(key))
    }

    fn grow(&mut self) {
        let next = self
            .generations
            .last()
            .map_or(crate::map::MIN_CAPACITY, |t| t.capacity() * 2);
        log_info!(
            "multimap allocating generation {} with capacity {}",
            self.generations.len(),
            next
        );
        stats::record_operation(OperationType::Grow);
        self.generations
            .push(InternalTable::with_capacity(next, self.config.walk_for(next)));
    }

    /// 插入键值对；重复键总是接受
    pub fn insert(&mut self, key: K, value: V) {
        stats::record_operation(OperationType::Insert);
        let (h1, fp) = self.key_coords(&key);

        let mut outcome = self
            .generations
            .last_mut()
            .expect("generation stack is never empty")
            .insert(h1, fp, key, value);
        while let TableInsert::Overflow(k, v) = outcome {
            self.grow();
            let (h1, fp) = self.key_coords(&k);
            outcome = self
                .generations
                .last_mut()
                .expect("generation stack is never empty")
                .insert(h1, fp, k, v);
        }
    }

    /// 惰性枚举键的全部匹配值，新代优先，代内主位置优先
    pub fn get_all<'a>(&'a self, key: &'a K) -> impl Iterator<Item = &'a V> + 'a {
        stats::record_operation(OperationType::Get);
        let (h1, fp) = self.key_coords(key);
        self.generations
            .iter()
            .rev()
            .flat_map(move |t| t.find_all(h1, fp, key))
    }

    /// 键是否至少有一个匹配
    pub fn contains_key(&self, key: &K) -> bool {
        let (h1, fp) = self.key_coords(key);
        self.generations
            .iter()
            .rev()
            .any(|t| t.get(h1, fp, key).is_some())
    }

    /// 删除一个匹配条目（新代优先，代内主位置优先）
    pub fn remove(&mut self, key: &K) -> bool {
        let (h1, fp) = self.key_coords(key);
        for table in self.generations.iter_mut().rev() {
            if table.remove(h1, fp, key).is_some() {
                stats::record_operation(OperationType::Remove);
                return true;
            }
        }
        false
    }

    /// 删除键的全部匹配条目，返回删除数量
    pub fn remove_all(&mut self, key: &K) -> usize {
        let (h1, fp) = self.key_coords(key);
        let mut removed = 0;
        for table in self.generations.iter_mut().rev() {
            // 单代内同键至多两个位置
            while table.remove(h1, fp, key).is_some() {
                stats::record_operation(OperationType::Remove);
                removed += 1;
            }
        }
        removed
    }

    /// 存活条目数
    pub fn len(&self) -> usize {
        self.generations.iter().map(InternalTable::len).sum()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.generations.iter().all(InternalTable::is_empty)
    }

    /// 全部代的槽位总数
    pub fn capacity(&self) -> usize {
        self.generations.iter().map(InternalTable::capacity).sum()
    }

    /// 当前负载因子
    pub fn load_factor(&self) -> f32 {
        self.len() as f32 / self.capacity() as f32
    }

    /// 代数
    pub fn generation_count(&self) -> usize {
        self.generations.len()
    }

    /// 统计快照
    pub fn stats(&self) -> CuckooMapStats {
        CuckooMapStats {
            size: self.len(),
            capacity: self.capacity(),
            load_factor: self.load_factor(),
            generation_count: self.generation_count(),
        }
    }
}

impl<K: Hash + Eq, V> Default for CuckooMultiMap<K, V> {
    fn default() -> Self {
        Self::from_valid_config(CuckooMapConfig::default())
    }
}

// 单元测试
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equivalence_class_lookup() {
        let mut mm = CuckooMultiMap::new(16).unwrap();
        mm.insert(7u64, 'A');
        mm.insert(7, 'B');
        mm.insert(7, 'C');

        let mut found: Vec<char> = mm.get_all(&7).copied().collect();
        found.sort_unstable();
        assert_eq!(found, vec!['A', 'B', 'C']);

        assert!(mm.remove(&7));
        assert_eq!(mm.len(), 2);
        assert_eq!(mm.get_all(&7).count(), 2);
    }

    #[test]
    fn test_multiplicity_matches_inserts() {
        let mut mm = CuckooMultiMap::new(16).unwrap();
        // 同键多次插入会级联进入更新的代
        for i in 0..8u64 {
            mm.insert(42u64, i);
        }
        let mut values: Vec<u64> = mm.get_all(&42).copied().collect();
        values.sort_unstable();
        assert_eq!(values, (0..8).collect::<Vec<_>>(), "多重集必须与插入集一致");
        assert_eq!(mm.len(), 8);
    }

    #[test]
    fn test_remove_all() {
        let mut mm = CuckooMultiMap::new(16).unwrap();
        for _ in 0..5 {
            mm.insert(1u64, 0u64);
        }
        mm.insert(2, 0);

        assert_eq!(mm.remove_all(&1), 5);
        assert!(!mm.contains_key(&1));
        assert!(mm.contains_key(&2));
        assert_eq!(mm.len(), 1);
        assert_eq!(mm.remove_all(&1), 0);
    }

    #[test]
    fn test_mixed_keys() {
        let mut mm = CuckooMultiMap::new(16).unwrap();
        for k in 0..50u64 {
            mm.insert(k % 10, k);
        }
        assert_eq!(mm.len(), 50);
        for k in 0..10u64 {
            assert_eq!(mm.get_all(&k).count(), 5, "键 {} 的等价类大小错误", k);
        }
    }

    #[test]
    fn test_remove_absent() {
        let mut mm = CuckooMultiMap::<u64, u64>::new(16).unwrap();
        assert!(!mm.remove(&99));
        assert_eq!(mm.remove_all(&99), 0);
    }
}
