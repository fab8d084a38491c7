use std::path::Path;

use thiserror::Error;

use crate::ExtractedContent;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("backend `{0}` is not available in this build")]
    Unavailable(&'static str),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF extraction backends.
///
/// A backend reads one file and produces its pages, tables and document
/// metadata. Selection between backends and the minimum-content policy live
/// in the ingest crate's `BackendChain`; post-processing (cleaning) happens
/// after a backend has been chosen.
pub trait PdfBackend: Send + Sync {
    /// Short name used in log events.
    fn name(&self) -> &'static str;

    /// Whether the backend's underlying library is compiled in.
    ///
    /// Checked once when a chain is assembled, never per file.
    fn is_available(&self) -> bool {
        true
    }

    /// Whether extraction failures should be logged at debug level instead
    /// of error level.
    fn quiet_failures(&self) -> bool {
        false
    }

    /// Extract pages, tables and metadata from a PDF file.
    ///
    /// The returned content has no venue attached yet.
    fn extract(&self, path: &Path) -> Result<ExtractedContent, BackendError>;
}
