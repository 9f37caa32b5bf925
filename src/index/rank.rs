use serde::{Deserialize, Serialize};

use super::alphabet::{check_sequence_len, Alphabet};
use crate::error::{CorruptTransform, InvalidInput, Result};

/// Occ 采样间隔缺省值
pub const DEFAULT_OCC_INTERVAL: usize = 32;

/// 秩表：
/// - `C[c]` = BWT 中编码小于 c 的字符个数（第一列里 c 块的起始行）。
/// - Occ 采用定长分块采样，块内顺扫补偿；一次查询最多扫描 interval-1 个字符，与 n 无关。
/// - interval = 1 时每一行都有采样，查询为纯查表。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankTables {
    alphabet: Alphabet,
    interval: u32,
    /// 长度 sigma + 1，c[sigma] = n
    c: Vec<u32>,
    /// 编码后的 BWT
    codes: Vec<u8>,
    /// occ_samples[block_id * sigma + c] = BWT[0..block_id * interval) 中 c 的个数
    occ_samples: Vec<u32>,
}

/// 按默认采样间隔构建秩表。
pub fn build_rank_tables(bwt: &[u8], alphabet: &Alphabet) -> Result<RankTables> {
    RankTables::build(bwt, alphabet)
}

impl RankTables {
    pub fn build(bwt: &[u8], alphabet: &Alphabet) -> Result<Self> {
        Self::build_with_interval(bwt, alphabet, DEFAULT_OCC_INTERVAL)
    }

    pub fn build_with_interval(bwt: &[u8], alphabet: &Alphabet, interval: usize) -> Result<Self> {
        let interval = interval.max(1);
        let n = bwt.len();
        check_sequence_len(n.saturating_sub(1))?;
        let sigma = alphabet.sigma();

        let mut codes = Vec::with_capacity(n);
        for (position, &b) in bwt.iter().enumerate() {
            match alphabet.code_of(b) {
                Some(c) => codes.push(c),
                None => return Err(InvalidInput::SymbolOutsideAlphabet { symbol: b, position }.into()),
            }
        }

        // 计算 C 表
        let mut freq = vec![0u32; sigma];
        for &ch in &codes {
            freq[ch as usize] += 1;
        }
        let mut c = vec![0u32; sigma + 1];
        let mut acc = 0u32;
        for i in 0..sigma {
            c[i] = acc;
            acc += freq[i];
        }
        c[sigma] = acc;

        // 采样 Occ：多留一个块，使 pos = n 且 n 恰为 interval 的倍数时也能直接查表
        let num_blocks = n / interval + 1;
        let mut occ_samples = vec![0u32; num_blocks * sigma];
        let mut running = vec![0u32; sigma];
        for bi in 0..num_blocks {
            occ_samples[bi * sigma..(bi + 1) * sigma].copy_from_slice(&running);
            let start = bi * interval;
            let end = ((bi + 1) * interval).min(n);
            if start < end {
                for &ch in &codes[start..end] {
                    running[ch as usize] += 1;
                }
            }
        }

        Ok(Self { alphabet: alphabet.clone(), interval: interval as u32, c, codes, occ_samples })
    }

    /// 校验反序列化得到的秩表：编码均在字母表内，且 C/Occ 与编码后的 BWT 一致。
    pub fn validate(&self) -> Result<()> {
        self.alphabet.validate()?;
        let sigma = self.alphabet.sigma();
        if self.interval == 0 {
            return Err(CorruptTransform::InconsistentIndex { detail: "occ interval is zero" }.into());
        }
        if let Some(position) = self.codes.iter().position(|&c| c as usize >= sigma) {
            return Err(CorruptTransform::UnknownSymbol { symbol: self.codes[position], position }.into());
        }
        let rebuilt = Self::build_with_interval(&self.alphabet.decode(&self.codes), &self.alphabet, self.interval())?;
        if rebuilt != *self {
            return Err(CorruptTransform::InconsistentIndex { detail: "C or Occ table disagrees with the BWT" }.into());
        }
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    #[inline]
    pub fn sigma(&self) -> usize {
        self.alphabet.sigma()
    }

    pub fn interval(&self) -> usize {
        self.interval as usize
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// 编码后的 BWT
    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    #[inline]
    pub fn c_code(&self, code: u8) -> usize {
        self.c[code as usize] as usize
    }

    /// 字符 sym 在第一列中的起始行；不在字母表中返回 None
    pub fn c(&self, sym: u8) -> Option<usize> {
        self.alphabet.code_of(sym).map(|code| self.c_code(code))
    }

    /// 编码 code 在 BWT 中出现的总次数
    #[inline]
    pub fn count_code(&self, code: u8) -> usize {
        (self.c[code as usize + 1] - self.c[code as usize]) as usize
    }

    /// 返回 BWT[0..pos) 中编码 code 的出现次数
    #[inline]
    pub fn occ_code(&self, code: u8, pos: usize) -> usize {
        debug_assert!(pos <= self.codes.len());
        let sigma = self.sigma();
        let interval = self.interval as usize;
        let bi = pos / interval;
        let base = self.occ_samples[bi * sigma + code as usize] as usize;
        let start = bi * interval;
        let add = self.codes[start..pos].iter().filter(|&&ch| ch == code).count();
        base + add
    }

    /// 返回 BWT[0..pos) 中字符 sym 的出现次数；不在字母表中的字符恒为 0
    pub fn occ(&self, sym: u8, pos: usize) -> usize {
        match self.alphabet.code_of(sym) {
            Some(code) => self.occ_code(code, pos),
            None => 0,
        }
    }

    /// 在行区间 [l, r) 上向左扩展字符 code 后的新区间
    #[inline]
    pub fn rank_range(&self, code: u8, l: usize, r: usize) -> (usize, usize) {
        let c0 = self.c_code(code);
        (c0 + self.occ_code(code, l), c0 + self.occ_code(code, r))
    }

    /// LF(row) = C[L[row]] + Occ(L[row], row)
    #[inline]
    pub fn lf(&self, row: usize) -> usize {
        let code = self.codes[row];
        self.c_code(code) + self.occ_code(code, row)
    }

    /// 完整的 LF 映射，一次顺扫 O(n)
    pub fn lf_mapping(&self) -> Vec<u32> {
        let mut seen = vec![0u32; self.sigma()];
        self.codes
            .iter()
            .map(|&code| {
                let j = self.c[code as usize] + seen[code as usize];
                seen[code as usize] += 1;
                j
            })
            .collect()
    }

    /// FL 映射：第一列第 i 行在最后一列中的位置，即 LF 的逆置换
    pub fn fl_mapping(&self) -> Vec<u32> {
        let lf = self.lf_mapping();
        let mut fl = vec![0u32; lf.len()];
        for (i, &j) in lf.iter().enumerate() {
            fl[j as usize] = i as u32;
        }
        fl
    }

    /// 由 C 表还原第一列（已解码）
    pub fn first_column(&self) -> Vec<u8> {
        let mut codes = Vec::with_capacity(self.codes.len());
        for code in 0..self.sigma() {
            let code = code as u8;
            codes.extend(std::iter::repeat(code).take(self.count_code(code)));
        }
        self.alphabet.decode(&codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BwtError;
    use crate::index::bwt;

    fn naive_occ(bwt: &[u8], sym: u8, pos: usize) -> usize {
        bwt[..pos].iter().filter(|&&b| b == sym).count()
    }

    #[test]
    fn c_table_counts_smaller_symbols() {
        // BWT("GATTACA") = ACTGA$TA
        let t = build_rank_tables(b"ACTGA$TA", &Alphabet::dna()).unwrap();
        assert_eq!(t.c(b'$'), Some(0));
        assert_eq!(t.c(b'A'), Some(1));
        assert_eq!(t.c(b'C'), Some(4));
        assert_eq!(t.c(b'G'), Some(5));
        assert_eq!(t.c(b'T'), Some(6));
        assert_eq!(t.c(b'N'), None);
    }

    #[test]
    fn occ_matches_naive_for_every_interval() {
        let r = bwt::build(b"ATCGATCGATCGAATCGATCG", &Alphabet::dna()).unwrap();
        for interval in [1usize, 2, 3, 4, 7, 22, 64] {
            let t = RankTables::build_with_interval(&r.bwt, &r.alphabet, interval).unwrap();
            for &sym in b"$ACGT" {
                for pos in 0..=r.len() {
                    assert_eq!(
                        t.occ(sym, pos),
                        naive_occ(&r.bwt, sym, pos),
                        "interval={} sym={} pos={}",
                        interval,
                        sym as char,
                        pos
                    );
                }
            }
        }
    }

    #[test]
    fn occ_at_zero_is_zero_and_absent_symbol_never_counts() {
        let t = build_rank_tables(b"T$ACG", &Alphabet::dna()).unwrap();
        for &sym in b"$ACGT" {
            assert_eq!(t.occ(sym, 0), 0);
        }
        assert_eq!(t.occ(b'N', 5), 0);
    }

    #[test]
    fn lf_is_a_single_cycle_permutation() {
        let r = bwt::build(b"ACAGTGAT", &Alphabet::dna()).unwrap();
        let t = RankTables::build_with_interval(&r.bwt, &r.alphabet, 4).unwrap();
        let lf = t.lf_mapping();
        let n = lf.len();
        for (row, &j) in lf.iter().enumerate() {
            assert_eq!(t.lf(row), j as usize);
        }
        let mut sorted = lf.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..n as u32).collect::<Vec<_>>());

        // 从任意行出发走 n 步回到原处，且中途不提前回来
        let mut row = 3usize;
        for step in 1..=n {
            row = lf[row] as usize;
            if step < n {
                assert_ne!(row, 3);
            }
        }
        assert_eq!(row, 3);
    }

    #[test]
    fn fl_inverts_lf() {
        let r = bwt::build(b"BANANA", &Alphabet::infer(b"BANANA", b'$').unwrap()).unwrap();
        let t = RankTables::build(&r.bwt, &r.alphabet).unwrap();
        let lf = t.lf_mapping();
        let fl = t.fl_mapping();
        for i in 0..lf.len() {
            assert_eq!(fl[lf[i] as usize] as usize, i);
        }
        assert_eq!(t.first_column(), b"$AAABNN");
    }

    #[test]
    fn validate_detects_tampered_tables() {
        let r = bwt::build(b"GATTACA", &Alphabet::dna()).unwrap();
        let t = RankTables::build_with_interval(&r.bwt, &r.alphabet, 2).unwrap();
        assert!(t.validate().is_ok());

        let mut bad = t.clone();
        bad.occ_samples[3] += 1;
        assert_eq!(
            bad.validate().unwrap_err(),
            BwtError::CorruptTransform(CorruptTransform::InconsistentIndex { detail: "C or Occ table disagrees with the BWT" })
        );

        let mut bad = t.clone();
        bad.codes[2] = 9;
        assert_eq!(
            bad.validate().unwrap_err(),
            BwtError::CorruptTransform(CorruptTransform::UnknownSymbol { symbol: 9, position: 2 })
        );
    }

    #[test]
    fn lf_walk_reports_out_of_range_on_tampered_c_table() {
        // T 块的起点被改到 n 之外，未经校验的逆变换走到 T 时越界
        let r = bwt::build(b"GATTACA", &Alphabet::dna()).unwrap();
        let mut t = RankTables::build(&r.bwt, &r.alphabet).unwrap();
        t.c[4] = 50;
        assert!(t.validate().is_err());
        assert!(matches!(
            crate::index::invert::invert_with_tables(&t).unwrap_err(),
            BwtError::CorruptTransform(CorruptTransform::LfOutOfRange { target, len: 8, .. }) if target >= 50
        ));
    }

    #[test]
    fn rejects_symbol_outside_alphabet() {
        let err = build_rank_tables(b"AC$N", &Alphabet::dna()).unwrap_err();
        assert_eq!(err, BwtError::InvalidInput(InvalidInput::SymbolOutsideAlphabet { symbol: b'N', position: 3 }));
    }
}
