use thiserror::Error;

use crate::entitlement::{Feature, LimitKind};

/// Error type that captures store validation, gating, and persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{limit} limit reached: free plan allows at most {max}")]
    LimitExceeded { limit: LimitKind, max: u32 },
    #[error("{0} requires a premium subscription")]
    FeatureLocked(Feature),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid backup file: {0}")]
    ImportFormat(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
