use crate::index::alphabet::DNA_SYMBOLS;

/// 大写化，U 视为 T；其他字符保持不变，交给字母表校验。
pub fn normalize_seq(seq: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(seq.len());
    for &b in seq {
        let up = b.to_ascii_uppercase();
        out.push(if up == b'U' { b'T' } else { up });
    }
    out
}

/// GC 含量（百分比）。只统计 A/C/G/T，无有效碱基时返回 None。
pub fn gc_content(seq: &[u8]) -> Option<f64> {
    let mut gc = 0usize;
    let mut total = 0usize;
    for &b in seq {
        match b.to_ascii_uppercase() {
            b'G' | b'C' => {
                gc += 1;
                total += 1;
            }
            b'A' | b'T' => total += 1,
            _ => {}
        }
    }
    if total == 0 {
        None
    } else {
        Some(gc as f64 * 100.0 / total as f64)
    }
}

/// 确定性的伪随机 DNA（LCG），用于基准与演示，种子相同则输出相同。
pub fn random_dna(len: usize, seed: u32) -> Vec<u8> {
    let mut seq = Vec::with_capacity(len);
    let mut x: u32 = seed;
    for _ in 0..len {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        seq.push(DNA_SYMBOLS[(x >> 16) as usize % 4]);
    }
    seq
}

/// 以 unit 为重复单元的序列，截断到 len
pub fn repetitive_dna(len: usize, unit: &[u8]) -> Vec<u8> {
    if unit.is_empty() {
        return Vec::new();
    }
    unit.iter().copied().cycle().take(len).collect()
}
