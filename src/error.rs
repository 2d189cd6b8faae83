//! Shared error taxonomy for the core (spec §7).
//!
//! Surfaces map this verbatim onto their own vocabulary (HTTP status codes,
//! tonic `Code`s); the core itself never retries and never panics on bad
//! input.

use thiserror::Error;

/// One cycle, as a sequence of target identities in traversal order.
pub type Cycle = Vec<String>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("ninja parse error: {0}")]
    ParseError(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("cycle detected: {0:?}")]
    CycleDetected(Vec<Cycle>),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl From<rocksdb::Error> for CoreError {
    fn from(e: rocksdb::Error) -> Self {
        CoreError::StoreUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::StoreUnavailable(e.to_string())
    }
}
