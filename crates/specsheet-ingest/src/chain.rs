use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::{debug, error, info};

use specsheet_core::{ExtractedContent, PdfBackend};
use specsheet_parsing::PipelineConfig;

use crate::backends::{LopdfBackend, PdfExtractBackend};

/// Ordered backends with a minimum-content threshold.
///
/// [`extract`](Self::extract) returns the first result whose trimmed text
/// has at least `min_text_chars` characters. Errors, panics and short
/// results all fall through to the next backend.
pub struct BackendChain {
    backends: Vec<Box<dyn PdfBackend>>,
    min_text_chars: usize,
}

impl std::fmt::Debug for BackendChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendChain")
            .field("backends", &self.backend_names())
            .field("min_text_chars", &self.min_text_chars)
            .finish()
    }
}

impl BackendChain {
    /// Build a chain, dropping backends that are not available in this build.
    pub fn new(backends: Vec<Box<dyn PdfBackend>>, min_text_chars: usize) -> Self {
        let backends = backends
            .into_iter()
            .filter(|backend| {
                let available = backend.is_available();
                if !available {
                    info!(backend = backend.name(), "PDF backend not available, skipping");
                }
                available
            })
            .collect();
        Self {
            backends,
            min_text_chars,
        }
    }

    /// mupdf, then pdf-extract, then lopdf.
    pub fn standard(config: &PipelineConfig) -> Self {
        let mut backends: Vec<Box<dyn PdfBackend>> = Vec::new();
        #[cfg(feature = "mupdf")]
        backends.push(Box::new(specsheet_pdf_mupdf::MupdfBackend::new()));
        backends.push(Box::new(PdfExtractBackend::new(config)));
        backends.push(Box::new(LopdfBackend::new(config)));
        Self::new(backends, config.min_text_chars())
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    pub fn min_text_chars(&self) -> usize {
        self.min_text_chars
    }

    /// Try each backend once, in order.
    pub fn extract(&self, path: &Path) -> Option<ExtractedContent> {
        for backend in &self.backends {
            let name = backend.name();
            let result = panic::catch_unwind(AssertUnwindSafe(|| backend.extract(path)));

            let content = match result {
                Ok(Ok(content)) => content,
                Ok(Err(e)) => {
                    if backend.quiet_failures() {
                        debug!(backend = name, path = %path.display(), error = %e, "extraction failed");
                    } else {
                        error!(backend = name, path = %path.display(), error = %e, "extraction failed");
                    }
                    continue;
                }
                Err(payload) => {
                    let msg = panic_message(payload.as_ref());
                    if backend.quiet_failures() {
                        debug!(backend = name, path = %path.display(), panic = %msg, "extraction panicked");
                    } else {
                        error!(backend = name, path = %path.display(), panic = %msg, "extraction panicked");
                    }
                    continue;
                }
            };

            let chars = content.stripped_len();
            if chars >= self.min_text_chars {
                debug!(backend = name, path = %path.display(), chars, "extraction accepted");
                return Some(content);
            }
            debug!(
                backend = name,
                path = %path.display(),
                chars,
                min = self.min_text_chars,
                "insufficient text, trying next backend"
            );
        }
        None
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
