pub mod config;
pub mod tables;
pub mod text_processing;

pub use config::{ConfigError, ListOverride, PipelineConfig, PipelineConfigBuilder};
pub use tables::{TableExtractor, extract_tables};
pub use text_processing::{clean_cell, clean_text};
// Re-export domain types from core (canonical definitions live there)
pub use specsheet_core::{ExtractedContent, Metadata, Table};
