use std::path::Path;

use specsheet_core::{BackendError, ExtractedContent, PdfBackend};
use specsheet_parsing::{PipelineConfig, TableExtractor};

/// Secondary backend built on the `pdf-extract` crate.
///
/// Compiled in with the `pdf-extract` cargo feature. Without it the backend
/// reports itself unavailable and [`BackendChain`](crate::BackendChain) drops
/// it. Metadata is always empty.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractBackend {
    #[cfg_attr(not(feature = "pdf-extract"), allow(dead_code))]
    tables: TableExtractor,
}

impl PdfExtractBackend {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            tables: TableExtractor::new(config),
        }
    }
}

impl PdfBackend for PdfExtractBackend {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn is_available(&self) -> bool {
        cfg!(feature = "pdf-extract")
    }

    #[cfg(feature = "pdf-extract")]
    fn extract(&self, path: &Path) -> Result<ExtractedContent, BackendError> {
        use std::panic::{self, AssertUnwindSafe};

        let bytes = std::fs::read(path)?;

        // pdf-extract panics on some malformed documents
        let pages = match panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
        })) {
            Ok(Ok(pages)) => pages,
            Ok(Err(e)) => return Err(BackendError::ExtractionError(e.to_string())),
            Err(_) => {
                return Err(BackendError::ExtractionError(
                    "pdf-extract panicked (malformed document)".into(),
                ));
            }
        };

        let unwrapped: Vec<String> = pages.iter().map(|p| undouble_line_breaks(p)).collect();
        let tables = super::heuristic_tables(&self.tables, &unwrapped);
        Ok(ExtractedContent::from_pages(
            path,
            pages,
            tables,
            Default::default(),
        ))
    }

    #[cfg(not(feature = "pdf-extract"))]
    fn extract(&self, _path: &Path) -> Result<ExtractedContent, BackendError> {
        Err(BackendError::Unavailable(self.name()))
    }
}

/// pdf-extract ends every text line with a blank line. Halve each newline
/// pair so consecutive lines are adjacent again; a longer run still leaves
/// a blank line behind.
#[cfg_attr(not(feature = "pdf-extract"), allow(dead_code))]
fn undouble_line_breaks(text: &str) -> String {
    text.replace("\n\n", "\n")
}
