use serde::{Deserialize, Serialize};

use crate::error::{CorruptTransform, InvalidInput, Result};

/// 默认哨兵字符。
pub const DEFAULT_SENTINEL: u8 = b'$';

/// 哨兵的编码，恒为 0，保证它比任何字母都小。
pub const SENTINEL_CODE: u8 = 0;

/// DNA 字母表 {A, C, G, T}
pub const DNA_SYMBOLS: &[u8] = b"ACGT";

/// 偏移与秩计数都用 u32 存储，加上哨兵后 n 不能超过 u32::MAX
pub const MAX_SEQUENCE_LEN: usize = u32::MAX as usize - 1;

/// 原序列（不含哨兵）长度检查
pub(crate) fn check_sequence_len(len: usize) -> Result<()> {
    if len > MAX_SEQUENCE_LEN {
        return Err(InvalidInput::TooLong { len, limit: MAX_SEQUENCE_LEN }.into());
    }
    Ok(())
}

/// 封闭字母表：
/// - 符号按字节序排序去重，依次编码为 1..=k；哨兵编码为 0。
/// - 编码只比较大小，因此哨兵字节本身的取值不影响排序（例如文本里有空格也没关系）。
/// - 构造时一次性校验，之后查表 O(1)。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alphabet {
    symbols: Vec<u8>,
    sentinel: u8,
    /// lookup[b] = 符号 b 的编码；0 表示不在字母表中（哨兵单独判断）
    lookup: Vec<u8>,
}

impl Alphabet {
    pub fn new(symbols: &[u8], sentinel: u8) -> Result<Self> {
        let mut sorted = symbols.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.is_empty() {
            return Err(InvalidInput::EmptyAlphabet.into());
        }
        if sorted.binary_search(&sentinel).is_ok() {
            return Err(InvalidInput::SentinelInAlphabet { sentinel }.into());
        }
        let mut lookup = vec![0u8; 256];
        for (i, &s) in sorted.iter().enumerate() {
            // 去掉哨兵后最多 255 个符号，编码不会溢出
            lookup[s as usize] = (i + 1) as u8;
        }
        Ok(Self { symbols: sorted, sentinel, lookup })
    }

    /// {A, C, G, T} + `$`
    pub fn dna() -> Self {
        let mut lookup = vec![0u8; 256];
        for (i, &s) in DNA_SYMBOLS.iter().enumerate() {
            lookup[s as usize] = (i + 1) as u8;
        }
        Self { symbols: DNA_SYMBOLS.to_vec(), sentinel: DEFAULT_SENTINEL, lookup }
    }

    /// 以序列中出现过的全部字节作为字母表。哨兵出现在序列中时报错。
    pub fn infer(sequence: &[u8], sentinel: u8) -> Result<Self> {
        if let Some(position) = sequence.iter().position(|&b| b == sentinel) {
            return Err(InvalidInput::SentinelInSequence { sentinel, position }.into());
        }
        let mut seen = [false; 256];
        for &b in sequence {
            seen[b as usize] = true;
        }
        let symbols: Vec<u8> = (0..=255u8).filter(|&b| seen[b as usize]).collect();
        Self::new(&symbols, sentinel)
    }

    #[inline]
    pub fn sentinel(&self) -> u8 {
        self.sentinel
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// 编码数（含哨兵）
    #[inline]
    pub fn sigma(&self) -> usize {
        self.symbols.len() + 1
    }

    #[inline]
    pub fn code_of(&self, b: u8) -> Option<u8> {
        if b == self.sentinel {
            return Some(SENTINEL_CODE);
        }
        match self.lookup[b as usize] {
            0 => None,
            c => Some(c),
        }
    }

    /// 校验序列并编码，末尾追加哨兵编码。
    pub fn encode_terminated(&self, sequence: &[u8]) -> Result<Vec<u8>> {
        if sequence.is_empty() {
            return Err(InvalidInput::EmptySequence.into());
        }
        check_sequence_len(sequence.len())?;
        let mut text = Vec::with_capacity(sequence.len() + 1);
        for (position, &b) in sequence.iter().enumerate() {
            if b == self.sentinel {
                return Err(InvalidInput::SentinelInSequence { sentinel: b, position }.into());
            }
            match self.lookup[b as usize] {
                0 => return Err(InvalidInput::SymbolOutsideAlphabet { symbol: b, position }.into()),
                c => text.push(c),
            }
        }
        text.push(SENTINEL_CODE);
        Ok(text)
    }

    /// 编码 -> 字节。调用方保证 code < sigma。
    pub fn decode(&self, codes: &[u8]) -> Vec<u8> {
        codes
            .iter()
            .map(|&c| if c == SENTINEL_CODE { self.sentinel } else { self.symbols[c as usize - 1] })
            .collect()
    }

    /// 校验反序列化得到的字母表：查找表完整，且与符号列表一一对应。
    pub fn validate(&self) -> Result<()> {
        let bad = |detail: &'static str| -> Result<()> { Err(CorruptTransform::InconsistentIndex { detail }.into()) };
        if self.lookup.len() != 256 {
            return bad("alphabet lookup table must have 256 entries");
        }
        if self.symbols.is_empty() || self.symbols.len() > 255 {
            return bad("alphabet must have between 1 and 255 symbols");
        }
        if self.symbols.windows(2).any(|w| w[0] >= w[1]) {
            return bad("alphabet symbols are not strictly increasing");
        }
        if self.symbols.binary_search(&self.sentinel).is_ok() {
            return bad("sentinel is listed as an alphabet symbol");
        }
        let mapped = self.lookup.iter().filter(|&&c| c != 0).count();
        let consistent = self.symbols.iter().enumerate().all(|(i, &s)| self.lookup[s as usize] as usize == i + 1);
        if mapped != self.symbols.len() || !consistent {
            return bad("alphabet lookup table disagrees with its symbols");
        }
        Ok(())
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::dna()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BwtError;

    #[test]
    fn dna_codes_follow_byte_order() {
        let a = Alphabet::dna();
        assert_eq!(a.sigma(), 5);
        assert_eq!(a.code_of(b'$'), Some(0));
        assert_eq!(a.code_of(b'A'), Some(1));
        assert_eq!(a.code_of(b'T'), Some(4));
        assert_eq!(a.code_of(b'N'), None);
        assert_eq!(a, Alphabet::new(b"TGCA", b'$').unwrap());
    }

    #[test]
    fn sentinel_sorts_lowest_even_above_symbols_bytewise() {
        // ' ' (0x20) < '$' (0x24)，但哨兵仍编码为 0
        let a = Alphabet::infer(b"to be", b'$').unwrap();
        assert_eq!(a.code_of(b'$'), Some(0));
        assert_eq!(a.code_of(b' '), Some(1));
    }

    #[test]
    fn rejects_sentinel_in_symbols() {
        let err = Alphabet::new(b"AC$", b'$').unwrap_err();
        assert_eq!(err, BwtError::InvalidInput(InvalidInput::SentinelInAlphabet { sentinel: b'$' }));
        assert!(Alphabet::new(b"", b'$').is_err());
    }

    #[test]
    fn encode_validates_every_symbol() {
        let a = Alphabet::dna();
        assert_eq!(a.encode_terminated(b"ACGT").unwrap(), vec![1, 2, 3, 4, 0]);
        assert_eq!(
            a.encode_terminated(b"AC$T").unwrap_err(),
            BwtError::InvalidInput(InvalidInput::SentinelInSequence { sentinel: b'$', position: 2 })
        );
        assert_eq!(
            a.encode_terminated(b"ACNT").unwrap_err(),
            BwtError::InvalidInput(InvalidInput::SymbolOutsideAlphabet { symbol: b'N', position: 2 })
        );
        assert_eq!(a.encode_terminated(b"").unwrap_err(), BwtError::InvalidInput(InvalidInput::EmptySequence));
    }

    #[test]
    fn length_limit_keeps_offsets_in_u32() {
        assert!(check_sequence_len(MAX_SEQUENCE_LEN).is_ok());
        assert_eq!(
            check_sequence_len(u32::MAX as usize).unwrap_err(),
            BwtError::InvalidInput(InvalidInput::TooLong { len: u32::MAX as usize, limit: MAX_SEQUENCE_LEN })
        );
    }

    #[test]
    fn validate_accepts_built_alphabets() {
        assert!(Alphabet::dna().validate().is_ok());
        assert!(Alphabet::infer(b"to be or not", b'$').unwrap().validate().is_ok());
    }

    #[test]
    fn validate_rejects_tampered_lookup() {
        let mut a = Alphabet::dna();
        a.lookup.truncate(10);
        assert!(matches!(
            a.validate().unwrap_err(),
            BwtError::CorruptTransform(CorruptTransform::InconsistentIndex { .. })
        ));

        let mut a = Alphabet::dna();
        a.lookup[b'N' as usize] = 5;
        assert!(a.validate().is_err());

        let mut a = Alphabet::dna();
        a.symbols.push(b'$');
        assert!(a.validate().is_err());
    }

    #[test]
    fn decode_inverts_encode() {
        let a = Alphabet::infer(b"BANANA", b'$').unwrap();
        let codes = a.encode_terminated(b"BANANA").unwrap();
        assert_eq!(a.decode(&codes), b"BANANA$");
    }
}
