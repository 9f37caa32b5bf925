use std::io::Write;

use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};

use super::alphabet::Alphabet;
use super::bwt::{self, BwtResult};
use super::invert;
use super::rank::RankTables;
use super::search::{self, MatchSet};
use crate::analysis::compression::{self, Stats};
use crate::error::{self, CorruptTransform};

/// 索引构建信息，仅用于追溯，不参与检索。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexMeta {
    pub source_file: Option<String>,
    pub build_args: Option<String>,
    pub build_timestamp: Option<String>,
}

/// 落盘用的索引：变换结果 + 秩表 + 元信息。
/// - 变换结果与秩表构建一次后只读，逆变换、检索、分析共享同一份。
/// - 保存完整 sorted_offsets，区间可直接换成文本位置。
#[derive(Debug, Serialize, Deserialize)]
pub struct FmIndex {
    pub result: BwtResult,
    pub tables: RankTables,
    pub meta: IndexMeta,
}

impl FmIndex {
    pub fn build(sequence: &[u8], alphabet: &Alphabet, occ_interval: usize) -> error::Result<Self> {
        let result = bwt::build(sequence, alphabet)?;
        let tables = RankTables::build_with_interval(&result.bwt, alphabet, occ_interval)?;
        Ok(Self { result, tables, meta: IndexMeta::default() })
    }

    pub fn set_meta(&mut self, meta: IndexMeta) {
        self.meta = meta;
    }

    pub fn len(&self) -> usize {
        self.result.len()
    }

    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.result.alphabet
    }

    pub fn search(&self, pattern: &[u8]) -> error::Result<MatchSet> {
        search::search(&self.result, &self.tables, pattern)
    }

    pub fn search_many<P: AsRef<[u8]> + Sync>(&self, patterns: &[P]) -> Vec<error::Result<MatchSet>> {
        search::search_many(&self.result, &self.tables, patterns)
    }

    pub fn count(&self, pattern: &[u8]) -> error::Result<usize> {
        search::count(&self.tables, pattern)
    }

    pub fn invert(&self) -> error::Result<Vec<u8>> {
        invert::invert_with_tables(&self.tables)
    }

    /// 分析需要原序列；索引里不保存原文，先逆变换还原。
    pub fn analyze(&self) -> error::Result<Stats> {
        let original = self.invert()?;
        Ok(compression::analyze(&original, &self.result))
    }

    /// 检查反序列化得到的各部分是否描述同一条序列。
    pub fn validate(&self) -> error::Result<()> {
        self.tables.validate()?;
        let n = self.tables.len();
        if self.result.alphabet != *self.tables.alphabet() {
            return Err(CorruptTransform::InconsistentIndex { detail: "BWT and rank tables use different alphabets" }.into());
        }
        if self.result.bwt != self.tables.alphabet().decode(self.tables.codes()) {
            return Err(CorruptTransform::InconsistentIndex { detail: "BWT disagrees with the rank tables" }.into());
        }
        if self.result.sorted_offsets.len() != n || self.result.sorted_offsets.iter().any(|&o| o as usize >= n) {
            return Err(CorruptTransform::InconsistentIndex { detail: "rotation offsets do not cover the BWT rows" }.into());
        }
        Ok(())
    }

    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let f = std::fs::File::create(path)?;
        let mut w = std::io::BufWriter::new(f);
        bincode::serialize_into(&mut w, self)?;
        w.flush()?;
        info!("index of {} rows written to {}", self.len(), path);
        Ok(())
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        let f = std::fs::File::open(path)?;
        let idx: Self = bincode::deserialize_from(std::io::BufReader::new(f))?;
        idx.validate().map_err(|e| anyhow::anyhow!("index '{}' is corrupt: {}", path, e))?;
        info!("index of {} rows loaded from {}", idx.len(), path);
        Ok(idx)
    }
}
