//! 操作统计记录器 - 原子计数器与快照

use crate::types::OperationType;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};

/// 操作统计记录器
#[derive(Debug, Default)]
pub struct OperationStats {
    insert_count: AtomicU64,
    get_count: AtomicU64,
    remove_count: AtomicU64,
    kick_count: AtomicU64,
    grow_count: AtomicU64,
}

/// 操作统计快照
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationStatsSnapshot {
    pub insert_count: u64,
    pub get_count: u64,
    pub remove_count: u64,
    pub kick_count: u64,
    pub grow_count: u64,
}

impl OperationStats {
    /// 创建归零的记录器
    pub const fn new() -> Self {
        Self {
            insert_count: AtomicU64::new(0),
            get_count: AtomicU64::new(0),
            remove_count: AtomicU64::new(0),
            kick_count: AtomicU64::new(0),
            grow_count: AtomicU64::new(0),
        }
    }

    fn counter(&self, op: OperationType) -> &AtomicU64 {
        match op {
            OperationType::Insert => &self.insert_count,
            OperationType::Get => &self.get_count,
            OperationType::Remove => &self.remove_count,
            OperationType::Kick => &self.kick_count,
            OperationType::Grow => &self.grow_count,
        }
    }

    /// 记录一次操作
    #[inline]
    pub fn record(&self, op: OperationType) {
        self.counter(op).fetch_add(1, Ordering::Relaxed);
    }

    /// 读取某操作的累计次数
    pub fn count(&self, op: OperationType) -> u64 {
        self.counter(op).load(Ordering::Relaxed)
    }

    /// 获取统计快照
    pub fn snapshot(&self) -> OperationStatsSnapshot {
        OperationStatsSnapshot {
            insert_count: self.count(OperationType::Insert),
            get_count: self.count(OperationType::Get),
            remove_count: self.count(OperationType::Remove),
            kick_count: self.count(OperationType::Kick),
            grow_count: self.count(OperationType::Grow),
        }
    }

    /// 重置全部计数
    pub fn reset(&self) {
        for op in OperationType::all() {
            self.counter(op).store(0, Ordering::Relaxed);
        }
    }

    /// 导出Prometheus格式指标
    pub fn export_prometheus(&self) -> String {
        let mut out = String::new();
        for op in OperationType::all() {
            let _ = writeln!(
                out,
                "cuckoo_operation_{}_count {}",
                op.as_str(),
                self.count(op)
            );
        }
        out
    }
}

// 单元测试
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_snapshot() {
        let stats = OperationStats::new();
        stats.record(OperationType::Insert);
        stats.record(OperationType::Insert);
        stats.record(OperationType::Kick);

        let snap = stats.snapshot();
        assert_eq!(snap.insert_count, 2);
        assert_eq!(snap.kick_count, 1);
        assert_eq!(snap.get_count, 0);
    }

    #[test]
    fn test_reset() {
        let stats = OperationStats::new();
        stats.record(OperationType::Grow);
        stats.reset();
        assert_eq!(stats.snapshot(), OperationStatsSnapshot::default());
    }

    #[test]
    fn test_prometheus_export() {
        let stats = OperationStats::new();
        stats.record(OperationType::Remove);
        let metrics = stats.export_prometheus();
        assert!(metrics.contains("cuckoo_operation_remove_count 1"));
        assert!(metrics.contains("cuckoo_operation_insert_count 0"));
    }
}
