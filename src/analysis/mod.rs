//! 基于变换结果的观测：压缩特征分析与检索计时对比。

pub mod benchmark;
pub mod compression;

pub use benchmark::{compare_search, SearchComparison};
pub use compression::{analyze, Stats};
