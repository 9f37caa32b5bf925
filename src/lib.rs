//! # bwt-rust
//!
//! Burrows-Wheeler 变换（BWT）工具集。
//!
//! 本 crate 提供：
//!
//! - **正向变换**：对追加哨兵后的序列的全部循环旋转排序，读出最后一列
//! - **逆变换**：基于 C 表与 Occ 表的 LF 映射精确还原原序列
//! - **反向搜索**：BWA 风格的精确子串计数与定位，耗时只与模式长度有关
//! - **压缩特征分析**：游程数与零阶熵在变换前后的对比
//!
//! ## 快速示例
//!
//! ```rust
//! use bwt_rust::index::{build, invert, search, Alphabet, RankTables};
//!
//! let dna = Alphabet::dna();
//! let result = build(b"ATCGATCGATCGAATCGATCG", &dna).unwrap();
//! assert_eq!(invert(&result).unwrap(), b"ATCGATCGATCGAATCGATCG");
//!
//! let tables = RankTables::build(&result.bwt, &result.alphabet).unwrap();
//! let matches = search(&result, &tables, b"ATCG").unwrap();
//! assert_eq!(matches.count, 5);
//! assert_eq!(matches.sorted_offsets(), vec![0, 4, 8, 13, 17]);
//! ```
//!
//! ## 模块说明
//!
//! - [`index`] — 字母表、旋转索引、正向/逆向变换、秩表、反向搜索、索引落盘
//! - [`analysis`] — 压缩特征分析，反向搜索与朴素扫描的计时对比
//! - [`io`] — FASTA 解析
//! - [`util`] — DNA 工具、朴素子串计数、日志初始化
//! - [`error`] — 错误类型

pub mod analysis;
pub mod error;
pub mod index;
pub mod io;
pub mod util;

pub use error::{BwtError, CorruptTransform, InvalidInput};
