//! 内部表 - 固定容量的Cuckoo槽位数组
//!
//! 叶子结构：容量为2的幂的槽位数组，每个键只有两个候选位置
//! `p1 = h1 & mask` 与 `p2 = p1 XOR ((fp · C) & mask)`。
//! 插入在有界踢出行走内完成，预算耗尽时把最后被逐出的条目交还调用方，
//! 由上层路由到更大的一代。本结构不做线程同步，调用方负责串行化。

use crate::hash::{alternate_index, primary_index};
use crate::map::slot::Slot;
use crate::stats;
use crate::types::{Fingerprint, OperationType};

/// 踢出步数预算上限
pub const MAX_WALK_CAP: usize = 128;

/// 根据表容量推导踢出步数预算：`min(8·log2(N), 128)`
pub fn walk_budget(capacity: usize) -> usize {
    (8 * capacity.trailing_zeros() as usize).clamp(1, MAX_WALK_CAP)
}

/// 内部表插入结果
#[derive(Debug)]
pub enum TableInsert<K, V> {
    /// 条目已落位
    Placed,
    /// 预算耗尽；携带最后被逐出的条目，表内其余键完好
    Overflow(K, V),
}

/// 固定容量内部表
#[derive(Debug)]
pub struct InternalTable<K, V> {
    slots: Box<[Slot<K, V>]>,
    len: usize,
    max_walk: usize,
    mask: usize,
}

impl<K, V> InternalTable<K, V> {
    /// 创建指定容量的内部表（容量必须是2的幂）
    pub fn with_capacity(capacity: usize, max_walk: usize) -> Self {
        debug_assert!(capacity.is_power_of_two());
        Self {
            slots: (0..capacity).map(|_| Slot::empty()).collect(),
            len: 0,
            max_walk,
            mask: capacity - 1,
        }
    }

    /// 槽位总数
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// 存活条目数
    pub fn len(&self) -> usize {
        self.len
    }

    /// 是否无存活条目
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn positions(&self, h1: u64, fp: Fingerprint) -> (usize, usize) {
        let p1 = primary_index(h1, self.mask);
        (p1, alternate_index(p1, fp, self.mask))
    }

    /// 仅比较标签的成员测试 - 过滤器语义，允许指纹别名误报
    pub fn contains_tag(&self, h1: u64, fp: Fingerprint) -> bool {
        let (p1, p2) = self.positions(h1, fp);
        self.slots[p1].tag() == fp || self.slots[p2].tag() == fp
    }
}

impl<K: Eq, V> InternalTable<K, V> {
    /// 精确查找：标签匹配且键相等
    pub fn get(&self, h1: u64, fp: Fingerprint, key: &K) -> Option<&V> {
        let (p1, p2) = self.positions(h1, fp);
        if let Some(v) = self.slots[p1].value_for(fp, key) {
            return Some(v);
        }
        if p2 != p1 {
            return self.slots[p2].value_for(fp, key);
        }
        None
    }

    /// 枚举两个候选位置上的全部匹配（多重映射使用）
    pub fn find_all<'a>(
        &'a self,
        h1: u64,
        fp: Fingerprint,
        key: &'a K,
    ) -> impl Iterator<Item = &'a V> {
        let (p1, p2) = self.positions(h1, fp);
        let first = self.slots[p1].value_for(fp, key);
        let second = if p2 != p1 {
            self.slots[p2].value_for(fp, key)
        } else {
            None
        };
        [first, second].into_iter().flatten()
    }

    /// 插入条目
    ///
    /// 两个候选位置之一为空则直接落位；否则从 `p1` 开始踢出行走：
    /// 逐出当前占用者，新条目落位，被逐出者的备用位置由其标签恢复，
    /// 如此往复直至落入空位或步数预算耗尽。
    pub fn insert(&mut self, h1: u64, fp: Fingerprint, key: K, value: V) -> TableInsert<K, V> {
        let (p1, p2) = self.positions(h1, fp);

        if self.slots[p1].is_empty() {
            self.slots[p1].replace(fp, key, value);
            self.len += 1;
            return TableInsert::Placed;
        }
        if self.slots[p2].is_empty() {
            self.slots[p2].replace(fp, key, value);
            self.len += 1;
            return TableInsert::Placed;
        }

        let mut cursor = p1;
        let mut carry = (fp, key, value);
        for _ in 0..self.max_walk {
            let (tag, k, v) = carry;
            match self.slots[cursor].replace(tag, k, v) {
                None => {
                    // 落入空位，行走结束
                    self.len += 1;
                    return TableInsert::Placed;
                }
                Some(evicted) => {
                    stats::record_operation(OperationType::Kick);
                    cursor = alternate_index(cursor, evicted.0, self.mask);
                    carry = evicted;
                }
            }
        }

        // 每一步都是一进一出，条目数未变；carry不在表内
        log_debug!(
            "cuckoo walk exhausted after {} steps (capacity={}, len={})",
            self.max_walk,
            self.capacity(),
            self.len
        );
        let (_, k, v) = carry;
        TableInsert::Overflow(k, v)
    }

    /// 删除匹配条目并取回值；主位置优先
    pub fn remove(&mut self, h1: u64, fp: Fingerprint, key: &K) -> Option<V> {
        let (p1, p2) = self.positions(h1, fp);
        for idx in [p1, p2] {
            if self.slots[idx].matches(fp, key) {
                let (_, v) = self.slots[idx].take().expect("matched slot must hold an entry");
                self.len -= 1;
                return Some(v);
            }
            if p2 == p1 {
                break;
            }
        }
        None
    }
}
