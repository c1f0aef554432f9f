use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

/// Failures while persisting or loading an index generation.
///
/// Every variant raised during loading is fatal for the engine being
/// constructed: no partially loaded generation is ever handed out.
#[derive(Debug, Error)]
pub enum IndexError {
    /// An artifact file is missing or could not be read.
    #[error("failed to read index artifact {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An artifact file was read but does not have the expected shape.
    #[error("malformed index artifact {}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The artifacts disagree with each other.
    #[error("inconsistent index: {0}")]
    Consistency(String),

    /// BM25 tuning values that would make scores undefined.
    #[error("invalid BM25 parameter: {0}")]
    InvalidParams(String),

    /// Reload requested on an engine built from in-memory artifacts.
    #[error("engine has no index directory to reload from")]
    Detached,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl IndexError {
    pub(crate) fn consistency(msg: impl Into<String>) -> Self {
        IndexError::Consistency(msg.into())
    }
}
