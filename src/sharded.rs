//! 分片包装 - 以每分片互斥锁提供线程安全
//!
//! `S = 2^s` 个相互独立的可增长容器，由 `h1(k)` 的最高 `s` 位选择分片。
//! 槽位索引只用 `h1` 的低位，两段位域不相交，避免分片选择与槽位选择
//! 相关联。所有公开操作在分片锁内完成后立即释放；分片之间不存在
//! 任何共享计数器，`len()` 逐分片加锁求和。

use crate::error::CuckooError;
use crate::hash::DoubleHasher;
use crate::map::cuckoo_map::{CuckooMap, CuckooMapConfig, CuckooMapStats};
use crate::map::multi_map::CuckooMultiMap;
use parking_lot::Mutex;
use std::hash::Hash;

fn validate_shard_count(shard_count: usize) -> Result<u32, CuckooError> {
    if shard_count == 0 || !shard_count.is_power_of_two() {
        return Err(CuckooError::ShardCountNotPowerOfTwo { got: shard_count });
    }
    Ok(shard_count.trailing_zeros())
}

/// 按分片数切分总容量
fn per_shard_config(config: &CuckooMapConfig, shard_count: usize) -> CuckooMapConfig {
    CuckooMapConfig {
        initial_capacity: (config.initial_capacity / shard_count).max(1),
        ..config.clone()
    }
}

#[inline]
fn shard_index(h1: u64, shard_bits: u32) -> usize {
    if shard_bits == 0 {
        0
    } else {
        (h1 >> (64 - shard_bits)) as usize
    }
}

/// 分片Cuckoo映射
pub struct ShardedCuckooMap<K, V> {
    shards: Box<[Mutex<CuckooMap<K, V>>]>,
    shard_bits: u32,
    hasher: DoubleHasher,
}

impl<K: Hash + Eq, V> ShardedCuckooMap<K, V> {
    /// 创建指定总容量与分片数的映射（分片数必须是2的幂）
    pub fn new(initial_capacity: usize, shard_count: usize) -> Result<Self, CuckooError> {
        Self::with_config(CuckooMapConfig::with_capacity(initial_capacity), shard_count)
    }

    /// 从配置创建分片映射
    pub fn with_config(config: CuckooMapConfig, shard_count: usize) -> Result<Self, CuckooError> {
        config.validate()?;
        let shard_bits = validate_shard_count(shard_count)?;
        let shard_config = per_shard_config(&config, shard_count);
        let shards = (0..shard_count)
            .map(|_| CuckooMap::with_config(shard_config.clone()).map(Mutex::new))
            .collect::<Result<Vec<_>, _>>()?
            .into_boxed_slice();
        log_debug!("sharded map created with {} shards", shard_count);
        Ok(Self {
            shards,
            shard_bits,
            hasher: config.build_hasher(),
        })
    }

    #[inline]
    fn shard_for(&self, key: &K) -> &Mutex<CuckooMap<K, V>> {
        let h1 = self.hasher.hash_primary(key);
        &self.shards[shard_index(h1, self.shard_bits)]
    }

    /// 插入键值对；键已存在时返回 `false`
    pub fn insert(&self, key: K, value: V) -> bool {
        self.shard_for(&key).lock().insert(key, value)
    }

    /// 查找键对应的值（拷贝出锁外）
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.shard_for(key).lock().get(key).cloned()
    }

    /// 精确成员测试
    pub fn contains_key(&self, key: &K) -> bool {
        self.shard_for(key).lock().contains_key(key)
    }

    /// 删除键；命中返回 `true`
    pub fn remove(&self, key: &K) -> bool {
        self.shard_for(key).lock().remove(key)
    }

    /// 逐分片加锁求和的条目总数
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|s| s.lock().is_empty())
    }

    /// 分片数
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// 聚合统计快照
    pub fn stats(&self) -> CuckooMapStats {
        let mut size = 0;
        let mut capacity = 0;
        let mut generation_count = 0;
        for shard in self.shards.iter() {
            let s = shard.lock().stats();
            size += s.size;
            capacity += s.capacity;
            generation_count = generation_count.max(s.generation_count);
        }
        CuckooMapStats {
            size,
            capacity,
            load_factor: size as f32 / capacity as f32,
            generation_count,
        }
    }
}

/// 分片Cuckoo多重映射
pub struct ShardedCuckooMultiMap<K, V> {
    shards: Box<[Mutex<CuckooMultiMap<K, V>>]>,
    shard_bits: u32,
    hasher: DoubleHasher,
}

impl<K: Hash + Eq, V> ShardedCuckooMultiMap<K, V> {
    /// 创建指定总容量与分片数的多重映射（分片数必须是2的幂）
    pub fn new(initial_capacity: usize, shard_count: usize) -> Result<Self, CuckooError> {
        Self::with_config(CuckooMapConfig::with_capacity(initial_capacity), shard_count)
    }

    /// 从配置创建分片多重映射
    pub fn with_config(config: CuckooMapConfig, shard_count: usize) -> Result<Self, CuckooError> {
        config.validate()?;
        let shard_bits = validate_shard_count(shard_count)?;
        let shard_config = per_shard_config(&config, shard_count);
        let shards = (0..shard_count)
            .map(|_| CuckooMultiMap::with_config(shard_config.clone()).map(Mutex::new))
            .collect::<Result<Vec<_>, _>>()?
            .into_boxed_slice();
        Ok(Self {
            shards,
            shard_bits,
            hasher: config.build_hasher(),
        })
    }

    #[inline]
    fn shard_for(&self, key: &K) -> &Mutex<CuckooMultiMap<K, V>> {
        let h1 = self.hasher.hash_primary(key);
        &self.shards[shard_index(h1, self.shard_bits)]
    }

    /// 插入键值对；重复键总是接受
    pub fn insert(&self, key: K, value: V) {
        self.shard_for(&key).lock().insert(key, value);
    }

    /// 取键的全部匹配值（拷贝出锁外）
    pub fn get_all(&self, key: &K) -> Vec<V>
    where
        V: Clone,
    {
        self.shard_for(key).lock().get_all(key).cloned().collect()
    }

    /// 键是否至少有一个匹配
    pub fn contains_key(&self, key: &K) -> bool {
        self.shard_for(key).lock().contains_key(key)
    }

    /// 删除一个匹配条目
    pub fn remove(&self, key: &K) -> bool {
        self.shard_for(key).lock().remove(key)
    }

    /// 删除键的全部匹配条目，返回删除数量
    pub fn remove_all(&self, key: &K) -> usize {
        self.shard_for(key).lock().remove_all(key)
    }

    /// 逐分片加锁求和的条目总数
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|s| s.lock().is_empty())
    }

    /// 分片数
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }
}
