//! 基于Cuckoo哈希的内存容器族
//!
//! 提供四层容器：唯一键映射、重复键多重映射、仅存指纹的近似过滤器，
//! 以及把键空间切分到独立子映射的分片包装。面向高吞吐负载：查找代价
//! 可预测（每代至多两次探测），空间放大有界（单槽位桶目标负载约50%）。
//!
//! ## 主要特性
//! - 双哈希定位 + 部分键踢出：备用位置仅凭槽位标签即可恢复
//! - 踢出预算耗尽时按几何级数扩容，旧代原地保留，无迁移停顿
//! - 非分片容器单线程、零阻塞；分片包装每分片一把互斥锁
//! - 操作计数统计与Prometheus导出
//!
//! ## 快速开始
//!
//! ```rust
//! use cuckoo_collections::CuckooMap;
//!
//! let mut map = CuckooMap::new(1024).expect("配置有效");
//! assert!(map.insert("key1", "value1"));
//! assert_eq!(map.get(&"key1"), Some(&"value1"));
//! assert!(map.remove(&"key1"));
//! assert!(map.is_empty());
//! ```

#![warn(clippy::all)]

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {};
}

// 核心模块导出
pub mod error;
pub mod filter;
pub mod hash;
pub mod map;
pub mod sharded;
pub mod stats;
pub mod types;

// 公共接口导出
pub use crate::{
    error::CuckooError,
    filter::CuckooFilter,
    hash::{default_hasher, DoubleHasher},
    map::{CuckooMap, CuckooMapConfig, CuckooMapStats, CuckooMultiMap},
    sharded::{ShardedCuckooMap, ShardedCuckooMultiMap},
    stats::{export_prometheus, operation_snapshot, record_operation, reset_stats},
    types::{Fingerprint, OperationType},
};

use std::hash::Hash;

// 简化默认类型别名
pub type DefaultMap = CuckooMap<String, String>;

impl<K: Hash + Eq, V> std::fmt::Debug for CuckooMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("CuckooMap")
            .field("size", &stats.size)
            .field("capacity", &stats.capacity)
            .field("load_factor", &stats.load_factor)
            .finish()
    }
}

/// 批量插入，返回成功条数
pub fn batch_insert<K: Hash + Eq, V>(
    map: &mut CuckooMap<K, V>,
    items: impl IntoIterator<Item = (K, V)>,
) -> usize {
    let mut count = 0;
    for (k, v) in items {
        if map.insert(k, v) {
            count += 1;
        }
    }
    count
}

/// 批量查询
pub fn batch_get<'a, K: Hash + Eq + 'a, V: Clone>(
    map: &CuckooMap<K, V>,
    keys: impl IntoIterator<Item = &'a K>,
) -> Vec<Option<V>> {
    keys.into_iter().map(|k| map.get(k).cloned()).collect()
}
