//! 哈希模块 - 统一管理哈希相关功能

pub mod double_hash;
pub mod fingerprint;

pub use double_hash::DoubleHasher;
pub use fingerprint::{alternate_index, primary_index, ALT_INDEX_MULTIPLIER};

/// 默认主哈希种子
pub const DEFAULT_PRIMARY_SEED: u64 = 42;
/// 默认副哈希种子
pub const DEFAULT_SECONDARY_SEED: u64 = 123;

/// 默认双哈希器
pub fn default_hasher() -> DoubleHasher {
    DoubleHasher::new(DEFAULT_PRIMARY_SEED, DEFAULT_SECONDARY_SEED)
}
