#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{path::PathBuf, time::Duration};

use thiserror::Error;

/// Errors raised while loading records or invoking a submission.
#[derive(Error, Debug)]
pub enum GradeError {
    /// A required record sequence is absent or a record is malformed.
    #[error("Invalid input for {what}: {detail}")]
    InvalidInput {
        /// Which record was being read.
        what:   String,
        /// What was wrong with it.
        detail: String,
    },

    /// A record or status file could not be read.
    #[error("Could not read {}", path.display())]
    Io {
        /// File that failed to open.
        path:   PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The submission ran past its deadline and was killed.
    #[error("Execution timed out after {timeout:?}")]
    Timeout {
        /// How long we waited before killing the process.
        timeout: Duration,
    },
}

impl GradeError {
    /// Shorthand for [`GradeError::InvalidInput`].
    pub fn invalid(what: impl Into<String>, detail: impl Into<String>) -> Self {
        GradeError::InvalidInput {
            what:   what.into(),
            detail: detail.into(),
        }
    }
}
