//! 变换、逆变换与检索过程中的错误类型。
//!
//! 错误分两类：调用方传入的数据不合法（[`InvalidInput`]），以及交给逆变换的
//! BWT 串内部不一致（[`CorruptTransform`]）。每个变体都携带出错的值或位置。

use thiserror::Error;

/// 输入校验失败。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("sequence is empty")]
    EmptySequence,

    #[error("alphabet has no symbols")]
    EmptyAlphabet,

    #[error("sentinel {} is also declared as an alphabet symbol", show(.sentinel))]
    SentinelInAlphabet { sentinel: u8 },

    #[error("sentinel {} found in sequence at position {position}", show(.sentinel))]
    SentinelInSequence { sentinel: u8, position: usize },

    #[error("symbol {} at position {position} is outside the alphabet", show(.symbol))]
    SymbolOutsideAlphabet { symbol: u8, position: usize },

    #[error("sentinel {} found in pattern at position {position}", show(.sentinel))]
    SentinelInPattern { sentinel: u8, position: usize },

    #[error("sequence of length {len} exceeds the limit of {limit} for this operation")]
    TooLong { len: usize, limit: usize },

    #[error("transform result has {result_len} rows but rank tables have {tables_len}")]
    MismatchedTables { result_len: usize, tables_len: usize },

    #[error("transform result and rank tables use different alphabets")]
    MismatchedAlphabet,
}

/// BWT 串不是任何合法序列的变换结果。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorruptTransform {
    #[error("expected exactly one sentinel, found {found}")]
    SentinelCount { found: usize },

    #[error("symbol {} at row {position} is outside the alphabet", show(.symbol))]
    UnknownSymbol { symbol: u8, position: usize },

    #[error("LF-mapping of row {row} points to {target}, outside [0, {len})")]
    LfOutOfRange { row: usize, target: usize, len: usize },

    #[error("sentinel reached after {step} steps, before the walk was complete")]
    UnexpectedSentinel { step: usize },

    /// 仅在反序列化得到的数据未经校验时出现
    #[error("index data is inconsistent: {detail}")]
    InconsistentIndex { detail: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BwtError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    #[error("corrupt transform: {0}")]
    CorruptTransform(#[from] CorruptTransform),
}

pub type Result<T> = std::result::Result<T, BwtError>;

/// 可打印字符原样输出，其余以十六进制表示。
fn show(b: &u8) -> String {
    let b = *b;
    if b.is_ascii_graphic() || b == b' ' {
        format!("'{}'", b as char)
    } else {
        format!("0x{:02x}", b)
    }
}
