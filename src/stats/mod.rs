//! 统计模块 - 全局操作计数

pub mod recorder;

pub use recorder::{OperationStats, OperationStatsSnapshot};

use crate::types::OperationType;
use once_cell::sync::Lazy;

/// 全局统计记录器
pub static GLOBAL_STATS: Lazy<OperationStats> = Lazy::new(OperationStats::new);

/// 记录操作统计
#[inline]
pub fn record_operation(op: OperationType) {
    GLOBAL_STATS.record(op);
}

/// 获取操作统计快照
pub fn operation_snapshot() -> OperationStatsSnapshot {
    GLOBAL_STATS.snapshot()
}

/// 重置所有统计
pub fn reset_stats() {
    GLOBAL_STATS.reset();
}

/// 导出Prometheus格式指标
pub fn export_prometheus() -> String {
    GLOBAL_STATS.export_prometheus()
}
