use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod backends;
pub mod chain;
pub mod pipeline;
pub mod summary;

// Re-export domain types for convenience
pub use specsheet_core::{
    BackendError, ContentSummary, ExtractedContent, FileRef, Metadata, PdfBackend, Table,
};
pub use specsheet_parsing::{PipelineConfig, PipelineConfigBuilder};

pub use backends::{LopdfBackend, PdfExtractBackend};
pub use chain::BackendChain;
pub use pipeline::{FileOutcome, Pipeline, SkipReason, post_process};
pub use summary::{has_equipment_keywords, summarize};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("PDF file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("no content extracted from PDF: {}", .0.display())]
    NoContent(PathBuf),
    #[error("processing panicked: {0}")]
    Panicked(String),
    #[error("invalid manifest: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(#[from] specsheet_parsing::ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Venue name → files handed over by the acquisition subsystem.
pub type Manifest = BTreeMap<String, Vec<FileRef>>;

/// Read a JSON manifest of the form
/// `{ "<venue>": [ { "downloaded": true, "local_path": "..." }, ... ] }`.
pub fn load_manifest(path: &Path) -> Result<Manifest, IngestError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
