//! Cuckoo过滤器 - 仅存指纹的近似成员集合
//!
//! 槽位只保留16位标签，不存键。成员测试允许指纹别名带来的误报，
//! 但绝不漏报：插入总会落下一个标签，删除只清除一个匹配标签。
//! 删除仅在调用方确知键曾被插入时才安全，否则可能清掉别的键的别名标签。

use crate::error::CuckooError;
use crate::hash::{alternate_index, primary_index, DoubleHasher};
use crate::map::cuckoo_map::CuckooMapConfig;
use crate::map::MIN_CAPACITY;
use crate::stats;
use crate::types::{Fingerprint, OperationType};
use std::hash::Hash;
use std::marker::PhantomData;
use std::mem;

/// 仅存标签的内部表
///
/// 被逐出的裸标签无法在掩码不同的表里重新定位（它的 `h1` 已不可得），
/// 因此行走记录置换路径，预算耗尽时按逆序回滚，把表恢复到行走前的
/// 状态并拒绝本次插入；调用方仍持有键，可向新一代安置原始指纹。
#[derive(Debug)]
struct FilterTable {
    tags: Box<[Fingerprint]>,
    len: usize,
    max_walk: usize,
    mask: usize,
}

impl FilterTable {
    fn with_capacity(capacity: usize, max_walk: usize) -> Self {
        debug_assert!(capacity.is_power_of_two());
        Self {
            tags: vec![Fingerprint::zero(); capacity].into_boxed_slice(),
            len: 0,
            max_walk,
            mask: capacity - 1,
        }
    }

    fn capacity(&self) -> usize {
        self.tags.len()
    }

    #[inline]
    fn positions(&self, h1: u64, fp: Fingerprint) -> (usize, usize) {
        let p1 = primary_index(h1, self.mask);
        (p1, alternate_index(p1, fp, self.mask))
    }

    fn contains(&self, h1: u64, fp: Fingerprint) -> bool {
        let (p1, p2) = self.positions(h1, fp);
        self.tags[p1] == fp || self.tags[p2] == fp
    }

    /// 安置标签；预算耗尽时回滚并返回 `false`
    fn insert(&mut self, h1: u64, fp: Fingerprint) -> bool {
        let (p1, p2) = self.positions(h1, fp);
        if self.tags[p1].is_zero() {
            self.tags[p1] = fp;
            self.len += 1;
            return true;
        }
        if self.tags[p2].is_zero() {
            self.tags[p2] = fp;
            self.len += 1;
            return true;
        }

        let mut path = Vec::with_capacity(self.max_walk);
        let mut cursor = p1;
        let mut carry = fp;
        for _ in 0..self.max_walk {
            path.push(cursor);
            let evicted = mem::replace(&mut self.tags[cursor], carry);
            if evicted.is_zero() {
                self.len += 1;
                return true;
            }
            stats::record_operation(OperationType::Kick);
            cursor = alternate_index(cursor, evicted, self.mask);
            carry = evicted;
        }

        // 每一步都是一次交换，逆序重放即可精确复原
        for &pos in path.iter().rev() {
            carry = mem::replace(&mut self.tags[pos], carry);
        }
        debug_assert_eq!(carry, fp);
        log_debug!(
            "filter walk exhausted after {} steps, table rolled back (capacity={})",
            self.max_walk,
            self.capacity()
        );
        false
    }

    fn remove(&mut self, h1: u64, fp: Fingerprint) -> bool {
        let (p1, p2) = self.positions(h1, fp);
        if self.tags[p1] == fp {
            self.tags[p1] = Fingerprint::zero();
            self.len -= 1;
            return true;
        }
        if p2 != p1 && self.tags[p2] == fp {
            self.tags[p2] = Fingerprint::zero();
            self.len -= 1;
            return true;
        }
        false
    }
}

/// Cuckoo过滤器
pub struct CuckooFilter<K> {
    generations: Vec<FilterTable>,
    hasher: DoubleHasher,
    config: CuckooMapConfig,
    _key: PhantomData<fn(&K)>,
}

impl<K: Hash> CuckooFilter<K> {
    /// 创建指定初始容量的过滤器
    pub fn new(initial_capacity: usize) -> Result<Self, CuckooError> {
        Self::with_config(CuckooMapConfig::with_capacity(initial_capacity))
    }

    /// 从配置创建过滤器
    pub fn with_config(config: CuckooMapConfig) -> Result<Self, CuckooError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: CuckooMapConfig) -> Self {
        let capacity = config.rounded_capacity();
        let table = FilterTable::with_capacity(capacity, config.walk_for(capacity));
        Self {
            hasher: config.build_hasher(),
            generations: vec![table],
            config,
            _key: PhantomData,
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
            .map_or(MIN_CAPACITY, |t| t.capacity() * 2);
        log_info!(
            "filter allocating generation {} with capacity {}",
            self.generations.len(),
            next
        );
        stats::record_operation(OperationType::Grow);
        let walk = self.config.walk_for(next);
        self.generations.push(FilterTable::with_capacity(next, walk));
    }

    /// 记录键的指纹；总是成功
    pub fn insert(&mut self, key: &K) -> bool {
        stats::record_operation(OperationType::Insert);
        let (h1, fp) = self.key_coords(key);
        loop {
            if let Some(active) = self.generations.last_mut() {
                if active.insert(h1, fp) {
                    return true;
                }
            }
            // 新一代两个候选位置必然为空，原始指纹在此安置
            self.grow();
        }
    }

    /// 近似成员测试：任何一代的任一候选位置标签匹配即命中
    ///
    /// 可能误报（不同键在同一位置共享指纹），绝不漏报。
    pub fn contains(&self, key: &K) -> bool {
        stats::record_operation(OperationType::Get);
        let (h1, fp) = self.key_coords(key);
        self.generations.iter().rev().any(|t| t.contains(h1, fp))
    }

    /// 清除一个匹配标签；仅对确曾插入的键调用才安全
    pub fn remove(&mut self, key: &K) -> bool {
        let (h1, fp) = self.key_coords(key);
        for table in self.generations.iter_mut().rev() {
            if table.remove(h1, fp) {
                stats::record_operation(OperationType::Remove);
                return true;
            }
        }
        false
    }

    /// 存活标签数
    pub fn len(&self) -> usize {
        self.generations.iter().map(|t| t.len).sum()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.generations.iter().all(|t| t.len == 0)
    }

    /// 全部代的槽位总数
    pub fn capacity(&self) -> usize {
        self.generations.iter().map(FilterTable::capacity).sum()
    }

    /// 代数
    pub fn generation_count(&self) -> usize {
        self.generations.len()
    }
}

impl<K: Hash> Default for CuckooFilter<K> {
    fn default() -> Self {
        Self::from_valid_config(CuckooMapConfig::default())
    }
}
