use specsheet_core::{ContentSummary, ExtractedContent};
use specsheet_parsing::PipelineConfig;

/// Case-insensitive substring match of any configured equipment keyword.
///
/// Matching is by substring, so "led" also matches "called".
pub fn has_equipment_keywords(text: &str, config: &PipelineConfig) -> bool {
    let lower = text.to_lowercase();
    config
        .equipment_keywords()
        .iter()
        .any(|keyword| lower.contains(keyword.as_str()))
}

/// Project extracted content to a flat summary record.
pub fn summarize(content: &ExtractedContent, config: &PipelineConfig) -> ContentSummary {
    ContentSummary {
        venue: content.venue.clone(),
        file_path: content.file_path.clone(),
        total_pages: content.page_count(),
        total_text_length: content.text.chars().count(),
        tables_found: content.tables.len(),
        has_equipment_keywords: has_equipment_keywords(&content.text, config),
        metadata: content.metadata.clone(),
    }
}
