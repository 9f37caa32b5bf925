use log::debug;
use serde::{Deserialize, Serialize};

use super::alphabet::Alphabet;
use super::rotation::RotationIndex;
use crate::error::Result;

/// 正向变换结果。构建后不再修改，逆变换、检索与分析都只读借用它。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BwtResult {
    /// BWT 串（最后一列），含一个哨兵字节，长度 = 原序列长度 + 1
    pub bwt: Vec<u8>,
    /// 第 i 行旋转在原序列中的起始偏移（等价于后缀数组）
    pub sorted_offsets: Vec<u32>,
    pub alphabet: Alphabet,
}

impl BwtResult {
    /// 含哨兵的长度 n
    pub fn len(&self) -> usize {
        self.bwt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bwt.is_empty()
    }

    /// BWT 串中哨兵所在的行（即以原序列开头的那一行）
    pub fn sentinel_row(&self) -> Option<usize> {
        let s = self.alphabet.sentinel();
        self.bwt.iter().position(|&b| b == s)
    }

    /// 第一列：BWT 字符按编码排序
    pub fn first_column(&self) -> Vec<u8> {
        let mut codes: Vec<u8> = self.bwt.iter().filter_map(|&b| self.alphabet.code_of(b)).collect();
        codes.sort_unstable();
        self.alphabet.decode(&codes)
    }
}

/// 根据排好序的旋转偏移读出最后一列。
/// text 为编码后的文本（末尾是哨兵 0），offsets 为旋转排序结果。
pub fn last_column(text: &[u8], offsets: &[u32]) -> Vec<u8> {
    let idx = RotationIndex::new(text);
    offsets.iter().map(|&p| idx.rotation(p as usize).last()).collect()
}

/// 正向变换：追加哨兵、对全部循环旋转排序、读出最后一列。
///
/// 序列为空、含哨兵或含字母表外的符号时返回 `InvalidInput`。
pub fn build(sequence: &[u8], alphabet: &Alphabet) -> Result<BwtResult> {
    let text = alphabet.encode_terminated(sequence)?;
    let offsets = RotationIndex::new(&text).sorted_offsets();
    let codes = last_column(&text, &offsets);
    debug!("built BWT of {} symbols over sigma={}", codes.len(), alphabet.sigma());
    Ok(BwtResult {
        bwt: alphabet.decode(&codes),
        sorted_offsets: offsets,
        alphabet: alphabet.clone(),
    })
}
