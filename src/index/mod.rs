//! 变换流水线：旋转索引 → 正向变换 → {秩表, 逆变换, 反向搜索}。

pub mod alphabet;
pub mod bwt;
pub mod fm;
pub mod invert;
pub mod rank;
pub mod rotation;
pub mod search;

pub use alphabet::Alphabet;
pub use bwt::{build, BwtResult};
pub use invert::{invert, invert_bwt};
pub use rank::{build_rank_tables, RankTables};
pub use search::{search, MatchSet};
