//! 映射核心模块 - 内部表、可增长映射与多重映射

pub mod cuckoo_map;
pub mod internal;
pub mod multi_map;
pub mod slot;

pub use cuckoo_map::{CuckooMap, CuckooMapConfig, CuckooMapStats};
pub use internal::{walk_budget, InternalTable, TableInsert, MAX_WALK_CAP};
pub use multi_map::CuckooMultiMap;
pub use slot::Slot;

use once_cell::sync::Lazy;

/// 表容量下限
pub const MIN_CAPACITY: usize = 16;

/// 全局默认配置
pub static DEFAULT_CONFIG: Lazy<CuckooMapConfig> = Lazy::new(CuckooMapConfig::default);
