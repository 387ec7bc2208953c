//! Cuckoo映射 - 唯一键的可增长容器
//!
//! 持有一叠容量按几何级数增长的内部表（"代"）。插入只写最新一代；
//! 踢出预算耗尽时分配一个双倍容量的新代，被逐出的受害者迁入新代，
//! 旧代原地保留并在查找时一并搜索，直到自然排空。没有后台迁移。

use crate::error::CuckooError;
use crate::hash::{DoubleHasher, DEFAULT_PRIMARY_SEED, DEFAULT_SECONDARY_SEED};
use crate::map::internal::{walk_budget, InternalTable, TableInsert};
use crate::map::MIN_CAPACITY;
use crate::stats;
use crate::types::{Fingerprint, OperationType};
use std::hash::Hash;

/// 容器配置
#[derive(Clone, Debug)]
pub struct CuckooMapConfig {
    /// 初始槽位数；向上取整到2的幂，下限16
    pub initial_capacity: usize,
    /// 踢出步数预算覆盖；`None` 时按各代容量推导
    pub max_walk: Option<usize>,
    /// 主哈希种子
    pub primary_seed: u64,
    /// 副哈希种子
    pub secondary_seed: u64,
}

impl Default for CuckooMapConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            max_walk: None,
            primary_seed: DEFAULT_PRIMARY_SEED,
            secondary_seed: DEFAULT_SECONDARY_SEED,
        }
    }
}

impl CuckooMapConfig {
    /// 指定初始容量、其余取默认的配置
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            ..Self::default()
        }
    }

    /// 校验前置条件
    pub fn validate(&self) -> Result<(), CuckooError> {
        if self.initial_capacity == 0 {
            return Err(CuckooError::ZeroCapacity);
        }
        if self.max_walk == Some(0) {
            return Err(CuckooError::ZeroWalkBudget);
        }
        Ok(())
    }

    pub(crate) fn rounded_capacity(&self) -> usize {
        self.initial_capacity.max(MIN_CAPACITY).next_power_of_two()
    }

    pub(crate) fn walk_for(&self, capacity: usize) -> usize {
        self.max_walk.unwrap_or_else(|| walk_budget(capacity))
    }

    pub(crate) fn build_hasher(&self) -> DoubleHasher {
        DoubleHasher::new(self.primary_seed, self.secondary_seed)
    }
}

/// 映射统计快照
#[derive(Debug, Clone, Default)]
pub struct CuckooMapStats {
    pub size: usize,
    pub capacity: usize,
    pub load_factor: f32,
    pub generation_count: usize,
}

/// Cuckoo映射
pub struct CuckooMap<K, V> {
    // 旧代在前，最后一代是活跃表
    generations: Vec<InternalTable<K, V>>,
    hasher: DoubleHasher,
    config: CuckooMapConfig,
}

impl<K: Hash + Eq, V> CuckooMap<K, V> {
    /// 创建指定初始容量的映射
    pub fn new(initial_capacity: usize) -> Result<Self, CuckooError> {
        Self::with_config(CuckooMapConfig::with_capacity(initial_capacity))
    }

    /// 从配置创建映射
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

    fn lookup_inner(&self, h1: u64, fp: Fingerprint, key: &K) -> Option<&V> {
        // 新代优先
        self.generations.iter().rev().find_map(|t| t.get(h1, fp, key))
    }

    fn active_mut(&mut self) -> &mut InternalTable<K, V> {
        self.generations.last_mut().expect("generation stack is never empty")
    }

    fn grow(&mut self) {
        let next = self
            .generations
            .last()
            .map_or(MIN_CAPACITY, |t| t.capacity() * 2);
        log_info!(
            "allocating generation {} with capacity {}",
            self.generations.len(),
            next
        );
        stats::record_operation(OperationType::Grow);
        self.generations
            .push(InternalTable::with_capacity(next, self.config.walk_for(next)));
    }

    /// 插入键值对；键已存在时返回 `false` 且不覆盖
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let (h1, fp) = self.key_coords(&key);
        if self.lookup_inner(h1, fp, &key).is_some() {
            return false;
        }
        stats::record_operation(OperationType::Insert);

        let mut outcome = self.active_mut().insert(h1, fp, key, value);
        while let TableInsert::Overflow(k, v) = outcome {
            // 原条目已落位；迁往新代的是被逐出的受害者
            self.grow();
            let (h1, fp) = self.key_coords(&k);
            outcome = self.active_mut().insert(h1, fp, k, v);
        }
        true
    }

    /// 查找键对应的值
    pub fn get(&self, key: &K) -> Option<&V> {
        stats::record_operation(OperationType::Get);
        let (h1, fp) = self.key_coords(key);
        self.lookup_inner(h1, fp, key)
    }

    /// 精确成员测试
    pub fn contains_key(&self, key: &K) -> bool {
        let (h1, fp) = self.key_coords(key);
        self.lookup_inner(h1, fp, key).is_some()
    }

    /// 删除键；命中返回 `true`
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

impl<K: Hash + Eq, V> Default for CuckooMap<K, V> {
    fn default() -> Self {
        Self::from_valid_config(CuckooMapConfig::default())
    }
}
