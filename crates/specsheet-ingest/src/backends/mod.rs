//! The secondary and tertiary extraction backends.
//!
//! The primary backend lives in `specsheet-pdf-mupdf`. Neither backend here
//! can see table geometry, so both recover tables from page text with the
//! heuristic [`TableExtractor`].

use specsheet_core::Table;
use specsheet_parsing::TableExtractor;

mod lopdf_backend;
mod pdf_extract_backend;

pub use lopdf_backend::LopdfBackend;
pub use pdf_extract_backend::PdfExtractBackend;

/// Run the heuristic extractor over each page and concatenate the results.
fn heuristic_tables<S: AsRef<str>>(extractor: &TableExtractor, pages: &[S]) -> Vec<Table> {
    pages
        .iter()
        .flat_map(|page| extractor.extract(page.as_ref()))
        .collect()
}
