use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::bwt::BwtResult;
use super::rank::RankTables;
use crate::error::{InvalidInput, Result};

/// 一次检索的结果：排序旋转上的行区间 [lo, hi) 以及对应的原文起始位置。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchSet {
    pub lo: usize,
    pub hi: usize,
    pub count: usize,
    /// 按行序排列，不保证按文本位置递增
    pub offsets: Vec<u32>,
}

impl MatchSet {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// 按文本位置升序排列的匹配起点
    pub fn sorted_offsets(&self) -> Vec<u32> {
        let mut v = self.offsets.clone();
        v.sort_unstable();
        v
    }
}

/// 模式中不允许出现哨兵；其余字符（包括字母表外的）都是合法查询。
fn check_pattern(tables: &RankTables, pattern: &[u8]) -> Result<()> {
    let sentinel = tables.alphabet().sentinel();
    match pattern.iter().position(|&b| b == sentinel) {
        Some(position) => Err(InvalidInput::SentinelInPattern { sentinel, position }.into()),
        None => Ok(()),
    }
}

/// 反向搜索：从模式最后一个字符开始，逐字符收缩行区间。
/// 返回最终区间 [lo, hi)；无匹配时 lo == hi。空模式返回 [0, n)。
pub fn interval(tables: &RankTables, pattern: &[u8]) -> Result<(usize, usize)> {
    check_pattern(tables, pattern)?;
    let alphabet = tables.alphabet();
    let mut l = 0usize;
    let mut r = tables.len();
    for &p in pattern.iter().rev() {
        // 字母表外的字符不可能匹配
        let Some(code) = alphabet.code_of(p) else {
            return Ok((0, 0));
        };
        let (nl, nr) = tables.rank_range(code, l, r);
        if nl >= nr {
            return Ok((0, 0));
        }
        l = nl;
        r = nr;
    }
    Ok((l, r))
}

/// 只计数，不取位置。重叠出现分别计数。
pub fn count(tables: &RankTables, pattern: &[u8]) -> Result<usize> {
    let (l, r) = interval(tables, pattern)?;
    Ok(r - l)
}

/// 变换结果与秩表必须出自同一条序列，否则区间无法换成偏移。
fn check_pair(result: &BwtResult, tables: &RankTables) -> Result<()> {
    let tables_len = tables.len();
    for result_len in [result.len(), result.sorted_offsets.len()] {
        if result_len != tables_len {
            return Err(InvalidInput::MismatchedTables { result_len, tables_len }.into());
        }
    }
    if result.alphabet != *tables.alphabet() {
        return Err(InvalidInput::MismatchedAlphabet.into());
    }
    Ok(())
}

/// 计数并通过 sorted_offsets 取出每个匹配在原序列中的起始位置。
pub fn search(result: &BwtResult, tables: &RankTables, pattern: &[u8]) -> Result<MatchSet> {
    check_pair(result, tables)?;
    let (lo, hi) = interval(tables, pattern)?;
    Ok(MatchSet { lo, hi, count: hi - lo, offsets: result.sorted_offsets[lo..hi].to_vec() })
}

/// 批量检索，模式之间互不依赖，用 rayon 并行；结果与输入顺序一致。
pub fn search_many<P>(result: &BwtResult, tables: &RankTables, patterns: &[P]) -> Vec<Result<MatchSet>>
where
    P: AsRef<[u8]> + Sync,
{
    debug!("searching {} patterns", patterns.len());
    patterns.par_iter().map(|p| search(result, tables, p.as_ref())).collect()
}
