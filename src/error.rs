//! Error types for squeez

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqueezError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("input is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("truncated payload: {0}")]
    TruncatedPayload(String),

    #[error("corrupt payload: {0}")]
    CorruptPayload(String),

    /// A symbol of the input has no codeword in the table built from that
    /// same input. Always a bug in table construction.
    #[error("symbol {0:?} has no codeword in the code table")]
    UnknownSymbol(char),

    #[error("bit stream exhausted")]
    StreamExhausted,

    #[error("pop from an empty priority queue")]
    EmptyQueue,

    #[error("input of {size} bytes exceeds the configured limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },

    #[error("round-trip verification produced different text")]
    VerificationFailed,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SqueezError>;
