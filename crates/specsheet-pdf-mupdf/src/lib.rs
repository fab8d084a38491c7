use std::path::Path;

use mupdf::{Document, MetadataName, TextPageFlags};

use specsheet_core::{BackendError, ExtractedContent, Metadata, PdfBackend, Table};

pub mod layout;

pub use layout::{PositionedLine, detect_tables};

/// MuPDF-based implementation of [`PdfBackend`], the primary backend.
///
/// This crate isolates the AGPL-3.0 mupdf dependency so that builds without
/// the ingest crate's `mupdf` feature do not depend on it.
///
/// Besides page text it reports tables recovered from line geometry (see
/// [`layout`]) and the document-info metadata. Header/footer bands can be
/// excluded per page; both are off by default.
#[derive(Debug, Clone, Default)]
pub struct MupdfBackend {
    /// Fraction of page height from bottom to exclude as footer (0.0–1.0).
    footer_exclusion_ratio: Option<f32>,
    /// Fraction of page height from top to exclude as header (0.0–1.0).
    header_exclusion_ratio: Option<f32>,
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the footer exclusion ratio. Pass `0.0` to disable.
    pub fn with_footer_exclusion(mut self, ratio: f32) -> Self {
        self.footer_exclusion_ratio = if ratio > 0.0 { Some(ratio) } else { None };
        self
    }

    /// Set the header exclusion ratio. Pass `0.0` to disable.
    pub fn with_header_exclusion(mut self, ratio: f32) -> Self {
        self.header_exclusion_ratio = if ratio > 0.0 { Some(ratio) } else { None };
        self
    }
}

impl PdfBackend for MupdfBackend {
    fn name(&self) -> &'static str {
        "mupdf"
    }

    fn quiet_failures(&self) -> bool {
        true
    }

    fn extract(&self, path: &Path) -> Result<ExtractedContent, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut pages = Vec::new();
        let mut tables: Vec<Table> = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?
        {
            let page = page_result.map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

            // Get page bounds for header/footer exclusion
            let page_bounds = page
                .bounds()
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let page_height = page_bounds.y1 - page_bounds.y0;

            let header_threshold = self
                .header_exclusion_ratio
                .map(|r| page_bounds.y0 + page_height * r);
            let footer_threshold = self
                .footer_exclusion_ratio
                .map(|r| page_bounds.y1 - page_height * r);

            let mut page_text = String::new();
            let mut lines = Vec::new();
            for block in text_page.blocks() {
                let block_bounds = block.bounds();

                // Skip blocks entirely within the header region
                if header_threshold.is_some_and(|t| block_bounds.y1 <= t) {
                    continue;
                }

                // Skip blocks whose top edge is in the footer region
                if footer_threshold.is_some_and(|t| block_bounds.y0 >= t) {
                    continue;
                }

                for line in block.lines() {
                    let line_text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    page_text.push_str(&line_text);
                    page_text.push('\n');

                    let bounds = line.bounds();
                    lines.push(PositionedLine {
                        x0: bounds.x0,
                        y0: bounds.y0,
                        x1: bounds.x1,
                        y1: bounds.y1,
                        text: line_text,
                    });
                }
            }

            tables.extend(detect_tables(&lines).into_iter().filter(|t| t.len() > 1));
            pages.push(page_text);
        }

        let metadata = read_metadata(&document);
        Ok(ExtractedContent::from_pages(path, pages, tables, metadata))
    }
}

/// Document-info fields that are present and non-empty.
fn read_metadata(document: &Document) -> Metadata {
    let fields = [
        (MetadataName::Title, "Title"),
        (MetadataName::Author, "Author"),
        (MetadataName::Creator, "Creator"),
        (MetadataName::Producer, "Producer"),
        (MetadataName::CreationDate, "CreationDate"),
        (MetadataName::ModDate, "ModDate"),
    ];

    let mut metadata = Metadata::new();
    for (name, key) in fields {
        if let Ok(value) = document.metadata(name) {
            if !value.trim().is_empty() {
                metadata.insert(key.to_string(), value);
            }
        }
    }
    metadata
}
