use once_cell::sync::Lazy;
use regex::Regex;

use specsheet_core::Table;

use crate::config::PipelineConfig;

/// Column separator: two or more whitespace characters, or a tab.
static COLUMN_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}|\t").unwrap());

/// Recovers equipment tables that a backend flattened into plain text.
///
/// Rows are lines whose columns are separated by runs of whitespace or tabs;
/// contiguous rows form a candidate table, and only candidates with at least
/// two rows and a header row mentioning an equipment keyword are kept.
#[derive(Debug, Clone)]
pub struct TableExtractor {
    header_keywords: Vec<String>,
}

impl Default for TableExtractor {
    fn default() -> Self {
        Self::new(&PipelineConfig::default())
    }
}

impl TableExtractor {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            header_keywords: config.table_header_keywords().to_vec(),
        }
    }

    /// Candidate tables that pass the equipment-header filter.
    pub fn extract(&self, text: &str) -> Vec<Table> {
        candidate_tables(text)
            .into_iter()
            .filter(|table| self.looks_like_equipment_table(table))
            .collect()
    }

    /// Whether a candidate has at least two rows and a header row containing
    /// one of the configured keywords.
    pub fn looks_like_equipment_table(&self, table: &Table) -> bool {
        if table.len() < 2 {
            return false;
        }
        let header = table[0].join(" ").to_lowercase();
        self.header_keywords
            .iter()
            .any(|keyword| header.contains(keyword.as_str()))
    }
}

/// Extract equipment tables from text with the default header keywords.
pub fn extract_tables(text: &str) -> Vec<Table> {
    TableExtractor::default().extract(text)
}

/// Split a line into trimmed, non-empty column cells.
///
/// Returns `None` unless the line has at least two cells.
pub fn parse_table_row(line: &str) -> Option<Vec<String>> {
    let cells: Vec<String> = COLUMN_SPLIT_RE
        .split(line)
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect();
    (cells.len() >= 2).then_some(cells)
}

/// Group contiguous row-like lines into candidate tables, before any keyword
/// filtering.
pub fn candidate_tables(text: &str) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut current: Table = Vec::new();
    let mut in_table = false;

    for line in text.split('\n') {
        let line = line.trim();

        if line.is_empty() {
            if !current.is_empty() {
                tables.push(std::mem::take(&mut current));
            }
            in_table = false;
            continue;
        }

        match parse_table_row(line) {
            Some(row) => {
                current.push(row);
                in_table = true;
            }
            None if in_table => {
                // Prose breaks table continuity
                if !current.is_empty() {
                    tables.push(std::mem::take(&mut current));
                }
                in_table = false;
            }
            None => {}
        }
    }

    if !current.is_empty() {
        tables.push(current);
    }

    tables
}
