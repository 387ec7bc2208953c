//! 核心类型定义 - 指纹与操作类型

use core::fmt;

/// 指纹类型 - 16位非零标签
///
/// `0` 保留为空槽位哨兵值，任何从哈希派生的指纹都不为零。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Fingerprint(u16);

impl Fingerprint {
    /// 创建新指纹
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// 返回零指纹（表示空槽位）
    pub const fn zero() -> Self {
        Self(0)
    }

    /// 从哈希值创建指纹
    ///
    /// 取哈希低16位；结果为零时强制映射为1，保证占用槽位的标签恒非零。
    pub const fn from_hash(hash: u64) -> Self {
        let fp = (hash & 0xFFFF) as u16;
        if fp == 0 {
            Self(1)
        } else {
            Self(fp)
        }
    }

    /// 获取指纹值
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// 检查是否为零（空槽位）
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

/// 操作类型 - 统计记录使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    /// 插入操作
    Insert,
    /// 获取操作
    Get,
    /// 删除操作
    Remove,
    /// 踢出操作
    Kick,
    /// 扩容操作（新增一代内部表）
    Grow,
}

impl OperationType {
    /// 转换为字符串表示
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Insert => "insert",
            OperationType::Get => "get",
            OperationType::Remove => "remove",
            OperationType::Kick => "kick",
            OperationType::Grow => "grow",
        }
    }

    /// 全部操作类型
    pub const fn all() -> [OperationType; 5] {
        [
            OperationType::Insert,
            OperationType::Get,
            OperationType::Remove,
            OperationType::Kick,
            OperationType::Grow,
        ]
    }
}
