use std::time::{Duration, Instant};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::index::alphabet::Alphabet;
use crate::index::bwt;
use crate::index::rank::RankTables;
use crate::index::search;
use crate::util::naive;

/// 反向搜索与朴素扫描的一次计时对比
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchComparison {
    pub text_len: usize,
    pub pattern_len: usize,
    /// 变换 + 秩表构建（一次性成本）
    pub build_time: Duration,
    /// 单次反向搜索
    pub bwt_time: Duration,
    pub naive_time: Duration,
    pub bwt_count: usize,
    pub naive_count: usize,
}

impl SearchComparison {
    /// naive_time / bwt_time；搜索耗时为 0 时无意义
    pub fn speedup(&self) -> Option<f64> {
        let t = self.bwt_time.as_secs_f64();
        if t > 0.0 {
            Some(self.naive_time.as_secs_f64() / t)
        } else {
            None
        }
    }

    pub fn counts_agree(&self) -> bool {
        self.bwt_count == self.naive_count
    }
}

pub fn compare_search(text: &[u8], pattern: &[u8], alphabet: &Alphabet) -> Result<SearchComparison> {
    let t0 = Instant::now();
    let result = bwt::build(text, alphabet)?;
    let tables = RankTables::build(&result.bwt, alphabet)?;
    let build_time = t0.elapsed();

    let t1 = Instant::now();
    let bwt_count = search::count(&tables, pattern)?;
    let bwt_time = t1.elapsed();

    let t2 = Instant::now();
    let naive_count = naive::count_occurrences(text, pattern);
    let naive_time = t2.elapsed();

    debug!(
        "n={} m={} build={:?} bwt={:?} naive={:?}",
        text.len(),
        pattern.len(),
        build_time,
        bwt_time,
        naive_time
    );
    Ok(SearchComparison {
        text_len: text.len(),
        pattern_len: pattern.len(),
        build_time,
        bwt_time,
        naive_time,
        bwt_count,
        naive_count,
    })
}
