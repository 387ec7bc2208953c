//! 备用位置计算 - 部分键Cuckoo技巧
//!
//! 踢出时只持有槽位内容（标签），原始键不可得，因此备用位置必须能从
//! `(当前位置, 标签)` 恢复：`p2 = p1 XOR ((fp · C) & mask)`。
//! 该变换是对合的：`alternate_index(alternate_index(p, fp), fp) == p`。

use crate::types::Fingerprint;

/// 备用位置乘数 - 把16位指纹扩散到索引空间的奇数常量
pub const ALT_INDEX_MULTIPLIER: u64 = 0x5bd1_e995;

/// 主位置：主哈希对表容量取模（容量为2的幂，用掩码实现）
#[inline]
pub fn primary_index(hash: u64, mask: usize) -> usize {
    hash as usize & mask
}

/// 备用位置：与指纹扩散值异或
///
/// 指纹非零但其扩散值的低位仍可能全零，此时 `p2 == p1`；
/// 调用方按规格容忍两位置重合。
#[inline]
pub fn alternate_index(index: usize, fp: Fingerprint, mask: usize) -> usize {
    index ^ ((fp.as_u16() as u64).wrapping_mul(ALT_INDEX_MULTIPLIER) as usize & mask)
}
