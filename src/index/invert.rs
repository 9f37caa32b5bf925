use log::debug;

use super::alphabet::{Alphabet, SENTINEL_CODE};
use super::bwt::BwtResult;
use super::rank::RankTables;
use crate::error::{BwtError, CorruptTransform, InvalidInput, Result};

/// 逆变换：`invert(build(s)) == s`。
pub fn invert(result: &BwtResult) -> Result<Vec<u8>> {
    invert_bwt(&result.bwt, &result.alphabet)
}

/// 只给出 BWT 串与字母表时的逆变换。
/// 串中出现字母表外的字符说明它不是合法的变换结果，报 `CorruptTransform`。
pub fn invert_bwt(bwt: &[u8], alphabet: &Alphabet) -> Result<Vec<u8>> {
    let tables = RankTables::build(bwt, alphabet).map_err(|e| match e {
        BwtError::InvalidInput(InvalidInput::SymbolOutsideAlphabet { symbol, position }) => {
            CorruptTransform::UnknownSymbol { symbol, position }.into()
        }
        other => other,
    })?;
    invert_with_tables(&tables)
}

/// 复用已构建的秩表做逆变换。
///
/// 从第 0 行（以哨兵开头的旋转）出发，沿 LF 映射走 n-1 步，
/// 每步读到的最后一列字符从后往前填入结果。
/// 来自磁盘的秩表应先经过 [`RankTables::validate`]。
pub fn invert_with_tables(tables: &RankTables) -> Result<Vec<u8>> {
    let n = tables.len();
    let found = if n == 0 { 0 } else { tables.count_code(SENTINEL_CODE) };
    if found != 1 {
        return Err(CorruptTransform::SentinelCount { found }.into());
    }

    let codes = tables.codes();
    let mut out = vec![0u8; n - 1];
    let mut row = 0usize;
    for step in 0..n - 1 {
        let code = codes[row];
        if code == SENTINEL_CODE {
            return Err(CorruptTransform::UnexpectedSentinel { step }.into());
        }
        out[n - 2 - step] = code;
        let target = tables.lf(row);
        // build 得到的秩表不会越界；这里拦的是反序列化后未经 validate 的表
        if target >= n {
            return Err(CorruptTransform::LfOutOfRange { row, target, len: n }.into());
        }
        row = target;
    }
    debug!("inverted BWT of length {}", n);
    Ok(tables.alphabet().decode(&out))
}
