//! Error types for the dataset pipeline
//!
//! Only configuration problems and failures on the output side cross the
//! library boundary. Per-file and per-line problems are logged and counted
//! by the stage that hit them.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid filter mode '{0}', expected 'in' or 'out'")]
    InvalidMode(String),

    #[error("unknown division '{0}', expected one of: file, line, method, class")]
    UnknownDivision(String),

    #[error("division '{0}' cannot be record-filtered, expected one of: file, method, class")]
    UnfilterableDivision(String),

    #[error("source folder does not exist: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
