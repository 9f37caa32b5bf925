use serde::{Deserialize, Serialize};

use crate::index::bwt::BwtResult;

/// 原序列与其 BWT 的游程、熵对比。只读 `BwtResult`，不做任何修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub original_length: usize,
    pub bwt_length: usize,
    pub original_runs: usize,
    pub bwt_runs: usize,
    /// original_runs / bwt_runs；大于 1 表示变换把相同字符聚到了一起
    pub run_reduction_ratio: f64,
    /// 零阶香农熵，bits/symbol
    pub original_entropy: f64,
    pub bwt_entropy: f64,
    pub entropy_reduction: f64,
}

/// 相同字符构成的极大游程个数
pub fn runs(s: &[u8]) -> usize {
    match s.first() {
        None => 0,
        Some(_) => 1 + s.windows(2).filter(|w| w[0] != w[1]).count(),
    }
}

/// 按串自身字符频率计算的零阶香农熵；哨兵若在串中则作为独立字符参与计算
pub fn entropy(s: &[u8]) -> f64 {
    if s.is_empty() {
        return 0.0;
    }
    let mut freq = [0usize; 256];
    for &b in s {
        freq[b as usize] += 1;
    }
    let n = s.len() as f64;
    freq.iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.log2()
        })
        .sum()
}

/// 各字符出现次数，按字节序
pub fn composition(sequence: &[u8]) -> Vec<(u8, usize)> {
    let mut freq = [0usize; 256];
    for &b in sequence {
        freq[b as usize] += 1;
    }
    (0..=255u8).filter(|&b| freq[b as usize] > 0).map(|b| (b, freq[b as usize])).collect()
}

pub fn analyze(sequence: &[u8], result: &BwtResult) -> Stats {
    let original_runs = runs(sequence);
    let bwt_runs = runs(&result.bwt);
    let run_reduction_ratio = if original_runs == 0 || bwt_runs == 0 {
        1.0
    } else {
        original_runs as f64 / bwt_runs as f64
    };
    let original_entropy = entropy(sequence);
    let bwt_entropy = entropy(&result.bwt);
    Stats {
        original_length: sequence.len(),
        bwt_length: result.len(),
        original_runs,
        bwt_runs,
        run_reduction_ratio,
        original_entropy,
        bwt_entropy,
        entropy_reduction: original_entropy - bwt_entropy,
    }
}
