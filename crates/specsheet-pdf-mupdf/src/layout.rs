//! Table detection from MuPDF line geometry.
//!
//! MuPDF emits each table cell as its own text line. Lines that overlap
//! vertically are grouped into a row, and consecutive rows with the same
//! number of cells (at least two) form a table.

use specsheet_core::Table;

/// A line of text with its bounding box in page coordinates (y grows down).
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedLine {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub text: String,
}

impl PositionedLine {
    fn center_y(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }
}

struct Row<'a> {
    top: f32,
    bottom: f32,
    cells: Vec<&'a PositionedLine>,
}

/// Detect tables on one page.
///
/// Every returned table has cells in left-to-right order and rows in
/// top-to-bottom order. Single-row tables are returned too; callers decide
/// whether to keep them.
pub fn detect_tables(lines: &[PositionedLine]) -> Vec<Table> {
    let mut sorted: Vec<&PositionedLine> =
        lines.iter().filter(|l| !l.text.trim().is_empty()).collect();
    sorted.sort_by(|a, b| {
        a.center_y()
            .total_cmp(&b.center_y())
            .then(a.x0.total_cmp(&b.x0))
    });

    let mut rows: Vec<Row<'_>> = Vec::new();
    for line in sorted {
        let center = line.center_y();
        let joins_last = rows
            .last()
            .is_some_and(|row| center >= row.top && center <= row.bottom);
        if let Some(row) = rows.last_mut().filter(|_| joins_last) {
            row.top = row.top.min(line.y0);
            row.bottom = row.bottom.max(line.y1);
            row.cells.push(line);
        } else {
            rows.push(Row {
                top: line.y0,
                bottom: line.y1,
                cells: vec![line],
            });
        }
    }

    let mut tables = Vec::new();
    let mut current: Table = Vec::new();

    for mut row in rows {
        row.cells.sort_by(|a, b| a.x0.total_cmp(&b.x0));
        let cells: Vec<String> = row.cells.iter().map(|c| c.text.trim().to_string()).collect();

        let continues = current.last().is_some_and(|prev| prev.len() == cells.len());
        if cells.len() >= 2 && (current.is_empty() || continues) {
            current.push(cells);
            continue;
        }

        if !current.is_empty() {
            tables.push(std::mem::take(&mut current));
        }
        if cells.len() >= 2 {
            current.push(cells);
        }
    }

    if !current.is_empty() {
        tables.push(current);
    }

    tables
}
