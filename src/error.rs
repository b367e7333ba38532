use num_bigint::BigInt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LagrangeError>;

/// Errors raised while decoding shares or reconstructing a polynomial.
#[derive(Debug, Error)]
pub enum LagrangeError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("duplicate x-coordinate {0} among selected shares")]
    DuplicateAbscissa(BigInt),
    #[error("insufficient shares: need {required}, got {provided}")]
    InsufficientShares { required: usize, provided: usize },
    #[error("invalid threshold {threshold} for {share_count} shares")]
    InvalidThreshold { threshold: usize, share_count: usize },
    #[error("share {index}: invalid base {base:?}, expected 2..=36")]
    InvalidBase { index: u64, base: String },
    #[error("share {index}: {value:?} is not a valid base-{base} number")]
    InvalidEncoding { index: u64, base: u32, value: String },
    #[error("invalid rational {0:?}")]
    InvalidRational(String),
    #[error("malformed share set: {0}")]
    MalformedInput(#[from] serde_json::Error),
    #[error("failed to read share set: {0}")]
    Io(#[from] std::io::Error),
}
