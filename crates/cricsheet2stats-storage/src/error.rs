//! Error types for table persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur reading or writing the stats tables.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A table file does not exist yet - the aggregation pipeline has not
    /// been run (or wrote somewhere else). The query service treats this as
    /// "tables unavailable" rather than a crash.
    #[error("stats table not found: {path}")]
    TableUnavailable { path: PathBuf },

    /// Reading or writing a table file failed.
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A table file exists but its rows don't parse.
    #[error("failed to parse {path}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Result type alias for StorageError
pub type Result<T> = std::result::Result<T, StorageError>;
