use std::path::Path;

use lopdf::{Dictionary, Document, Object};

use specsheet_core::{BackendError, ExtractedContent, Metadata, PdfBackend};
use specsheet_parsing::{PipelineConfig, TableExtractor};

use super::heuristic_tables;

/// Tertiary backend built on `lopdf`. Always available.
#[derive(Debug, Clone, Default)]
pub struct LopdfBackend {
    tables: TableExtractor,
}

impl LopdfBackend {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            tables: TableExtractor::new(config),
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn extract(&self, path: &Path) -> Result<ExtractedContent, BackendError> {
        let doc = Document::load(path).map_err(|e| BackendError::OpenError(e.to_string()))?;

        // get_pages is keyed by page number, so iteration is in page order
        let mut pages = Vec::new();
        for page_number in doc.get_pages().into_keys() {
            let text = doc
                .extract_text(&[page_number])
                .map_err(|e| BackendError::ExtractionError(format!("page {page_number}: {e}")))?;
            pages.push(text);
        }

        let tables = heuristic_tables(&self.tables, &pages);
        let metadata = read_info(&doc);
        Ok(ExtractedContent::from_pages(path, pages, tables, metadata))
    }
}

/// Flatten the trailer's `Info` dictionary into string pairs.
fn read_info(doc: &Document) -> Metadata {
    let mut metadata = Metadata::new();

    let Ok(info) = doc.trailer.get(b"Info") else {
        return metadata;
    };
    let dict: &Dictionary = match info {
        Object::Reference(id) => match doc.get_dictionary(*id) {
            Ok(dict) => dict,
            Err(_) => return metadata,
        },
        Object::Dictionary(dict) => dict,
        _ => return metadata,
    };

    for (key, value) in dict.iter() {
        let value = match value {
            Object::Reference(id) => match doc.get_object(*id) {
                Ok(resolved) => resolved,
                Err(_) => continue,
            },
            other => other,
        };
        if let Some(text) = object_to_string(value) {
            if !text.trim().is_empty() {
                metadata.insert(String::from_utf8_lossy(key).into_owned(), text);
            }
        }
    }

    metadata
}

fn object_to_string(object: &Object) -> Option<String> {
    match object {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        Object::Integer(n) => Some(n.to_string()),
        Object::Real(r) => Some(r.to_string()),
        Object::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE when it starts with a byte-order mark,
/// otherwise PDFDocEncoding, which agrees with Latin-1 for printable text.
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&b| b as char).collect()
}
