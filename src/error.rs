//! Error types
//!
//! `RenderError` covers faults inside the rendering pipeline. Callers only ever
//! see `ReportError`, which wraps any rendering fault in a single opaque
//! generation failure.

use thiserror::Error;

/// Faults raised while drawing a report onto a document sink
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Page {page} out of range (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },

    #[error("Row of {found} cells does not match the {expected}-column header of table '{table}'")]
    RowWidth {
        table: String,
        expected: usize,
        found: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Public report error
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to generate administrative report")]
    GenerationFailed(#[source] RenderError),

    #[error("Invalid report request: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    #[error("Invalid report configuration: {0}")]
    InvalidConfig(#[source] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;
