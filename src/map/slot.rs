//! 槽位 - 内部表的存储单元

use crate::types::Fingerprint;
use std::mem;

/// 槽位：空，或一个 `(标签, 键, 值)` 三元组
///
/// 不变量：`tag == 0` 当且仅当 `entry` 为 `None`。
/// 占用槽位的标签等于其键的指纹，标签比较廉价，用于在调用键相等判断
/// 之前过滤掉绝大多数不匹配。
#[derive(Debug)]
pub struct Slot<K, V> {
    tag: Fingerprint,
    entry: Option<(K, V)>,
}

impl<K, V> Slot<K, V> {
    /// 创建空槽位
    pub const fn empty() -> Self {
        Self {
            tag: Fingerprint::zero(),
            entry: None,
        }
    }

    /// 检查是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tag.is_zero()
    }

    /// 当前标签（空槽位为零）
    #[inline]
    pub fn tag(&self) -> Fingerprint {
        self.tag
    }

    /// 写入新条目，返回被置换出的旧条目（若有）
    ///
    /// 这是踢出行走的原子步骤：新条目落位，旧占用者连同其标签交还给
    /// 调用方继续安置。
    pub fn replace(&mut self, tag: Fingerprint, key: K, value: V) -> Option<(Fingerprint, K, V)> {
        let old_tag = mem::replace(&mut self.tag, tag);
        let old_entry = mem::replace(&mut self.entry, Some((key, value)));
        old_entry.map(|(k, v)| (old_tag, k, v))
    }

    /// 清空槽位并取回条目
    pub fn take(&mut self) -> Option<(K, V)> {
        self.tag = Fingerprint::zero();
        self.entry.take()
    }
}

impl<K: Eq, V> Slot<K, V> {
    /// 标签与键都匹配时返回值引用
    #[inline]
    pub fn value_for(&self, fp: Fingerprint, key: &K) -> Option<&V> {
        if self.tag != fp {
            return None;
        }
        match &self.entry {
            Some((k, v)) if k == key => Some(v),
            _ => None,
        }
    }

    /// 标签与键都匹配
    #[inline]
    pub fn matches(&self, fp: Fingerprint, key: &K) -> bool {
        self.value_for(fp, key).is_some()
    }
}
