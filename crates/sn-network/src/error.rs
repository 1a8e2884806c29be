//! Network-subsystem error type.

use thiserror::Error;

use sn_core::{CoreError, EdgeId};

/// Errors produced by edge stores, splicers, and the edge loader.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// A filter token or parameter was rejected by the store.
    #[error("invalid query input: {0}")]
    InvalidInput(String),

    #[error("edge {0} rejected: {1}")]
    InvalidEdge(EdgeId, String),

    /// The backing store failed (connectivity, timeout, malformed rows).
    #[error("edge store failure: {0}")]
    Backend(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("edge parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
