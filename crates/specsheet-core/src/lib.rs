use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub mod backend;
pub mod config_file;

pub use backend::{BackendError, PdfBackend};

/// One table: rows of cell strings.
pub type Table = Vec<Vec<String>>;

/// Document-info passthrough (`Title`, `Author`, `Producer`, ...).
pub type Metadata = BTreeMap<String, String>;

/// Build the separator inserted before each page in the full text.
///
/// `page_number` is 1-based.
pub fn page_marker(page_number: usize) -> String {
    format!("\n\n--- Page {} ---\n", page_number)
}

/// Join per-page texts into the full document text, each page preceded by
/// its [`page_marker`].
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut text = String::new();
    for (idx, page) in pages.iter().enumerate() {
        text.push_str(&page_marker(idx + 1));
        text.push_str(page.as_ref());
    }
    text
}

/// Content extracted from a single PDF file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedContent {
    /// All pages concatenated, with page-break markers.
    pub text: String,
    /// Per-page text in physical page order.
    pub pages: Vec<String>,
    pub tables: Vec<Table>,
    pub metadata: Metadata,
    pub file_path: PathBuf,
    /// Grouping key supplied by the caller; empty until the pipeline attaches it.
    pub venue: String,
}

impl ExtractedContent {
    /// Assemble content from per-page text. `text` is derived from `pages`.
    pub fn from_pages(
        file_path: impl Into<PathBuf>,
        pages: Vec<String>,
        tables: Vec<Table>,
        metadata: Metadata,
    ) -> Self {
        Self {
            text: join_pages(&pages),
            pages,
            tables,
            metadata,
            file_path: file_path.into(),
            venue: String::new(),
        }
    }

    /// Number of characters left after trimming surrounding whitespace.
    pub fn stripped_len(&self) -> usize {
        self.text.trim().chars().count()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// A file handed over by the acquisition subsystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    #[serde(default)]
    pub downloaded: bool,
    #[serde(default)]
    pub local_path: Option<PathBuf>,
    /// Where the file was fetched from. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl FileRef {
    /// A reference to a file that is already on disk.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            downloaded: true,
            local_path: Some(path.into()),
            url: None,
        }
    }
}

/// Flat projection of an [`ExtractedContent`] for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSummary {
    pub venue: String,
    pub file_path: PathBuf,
    pub total_pages: usize,
    /// Length of the full text in characters.
    pub total_text_length: usize,
    pub tables_found: usize,
    pub has_equipment_keywords: bool,
    pub metadata: Metadata,
}
