//! Error types for harvest-sync.

use std::path::PathBuf;

use thiserror::Error;

use harvest_core::error::DataError;

/// All errors that can arise from a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed event data — in the log's last line or in a fetched page.
    #[error("data error in {context}: {source}")]
    Data {
        context: String,
        #[source]
        source: DataError,
    },

    /// Transport failure or non-success status from the remote feed.
    #[error("feed error on page {page}: {detail}")]
    Feed { page: u32, detail: String },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

/// Convenience constructor for [`SyncError::Data`].
pub fn data_err(context: impl Into<String>, source: DataError) -> SyncError {
    SyncError::Data {
        context: context.into(),
        source,
    }
}
