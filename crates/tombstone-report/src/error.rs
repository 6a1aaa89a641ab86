//! Error types for report operations.

use thiserror::Error;
use tombstone_graph::GraphError;

/// Result type alias using `ReportError`.
pub type ReportResult<T> = Result<T, ReportError>;

pub const NO_DOWNLOAD_DATA: &str = "No data available to download.";
pub const MISSING_ADMIN_EMAIL: &str = "Please provide an admin email.";
pub const NO_MAIL_DATA: &str = "No data to send via email.";

#[derive(Debug, Error)]
pub enum ReportError {
    /// A precondition on user input or on the current view failed.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
