//! Assembly error type.

use std::fmt;

use thiserror::Error;

use sn_core::CoreError;
use sn_network::NetworkError;

/// The collaborator call a failure came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    NarrowQuery,
    Splice,
    WideQuery,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::NarrowQuery => "narrow query",
            Stage::Splice      => "splice",
            Stage::WideQuery   => "wide query",
        })
    }
}

/// Every way a request can fail.  Any error aborts the whole request; no
/// partial subgraph is ever returned.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration value {0:?} is not set")]
    ConfigurationMissing(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{stage} failed: {source}")]
    UpstreamQueryFailure {
        stage:  Stage,
        #[source]
        source: NetworkError,
    },

    #[error("geometry error: {0}")]
    Geometry(String),

    #[error("request cancelled")]
    Cancelled,

    /// Raised by [`RoutingSubgraph::check_invariants`](crate::RoutingSubgraph::check_invariants).
    #[error("subgraph invariant violated: {0}")]
    Invariant(String),
}

impl From<CoreError> for AssembleError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::ConfigurationMissing(key) => AssembleError::ConfigurationMissing(key),
            CoreError::InvalidRadius(_) | CoreError::InvalidCoordinate { .. } => {
                AssembleError::Geometry(e.to_string())
            }
            CoreError::InvalidBudget { .. } | CoreError::UnknownModus(_) => {
                AssembleError::InvalidInput(e.to_string())
            }
            CoreError::Config(msg) => AssembleError::Config(msg),
            CoreError::Toml(_) | CoreError::Io(_) => AssembleError::Config(e.to_string()),
        }
    }
}

impl AssembleError {
    /// Attribute a collaborator error to `stage`.
    ///
    /// Cancellation and rejected inputs keep their own kinds; everything
    /// else becomes [`AssembleError::UpstreamQueryFailure`].
    pub fn upstream(stage: Stage, e: NetworkError) -> Self {
        match e {
            NetworkError::Cancelled => AssembleError::Cancelled,
            NetworkError::InvalidInput(msg) => AssembleError::InvalidInput(msg),
            NetworkError::Core(core) => core.into(),
            source => AssembleError::UpstreamQueryFailure { stage, source },
        }
    }
}

pub type AssembleResult<T> = Result<T, AssembleError>;
