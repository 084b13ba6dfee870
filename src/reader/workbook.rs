//! Workbook (.xlsx) reading via calamine, with header detection handed off
//! to the header resolver.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::debug;

use crate::header;
use crate::types::{Cell, RawTable, SourceTable};

/// Read a workbook, trying each sheet against the header resolver first and
/// only then falling back to cruder strategies:
/// 1. per-sheet header detection + multi-row reconstruction,
/// 2. a two-row header read (rows 0 and 1 joined per column),
/// 3. skipping 1..=10 leading rows, accepting the first skip that produces
///    more than one column,
/// 4. a default read of the first sheet with the header at row 0.
pub fn read(path: &Path) -> Option<SourceTable> {
    let mut workbook = open_workbook_auto(path).ok()?;
    let sheet_names = workbook.sheet_names().to_vec();

    let mut previews: Vec<RawTable> = Vec::new();
    for name in &sheet_names {
        let Ok(range) = workbook.worksheet_range(name) else {
            debug!(sheet = %name, "sheet range unavailable");
            continue;
        };
        let preview = preview_from_range(&range);
        if !preview.is_empty() {
            previews.push(preview);
        }
    }

    for preview in &previews {
        if let Some(table) = header::resolve_preview(preview) {
            return Some(table);
        }
    }

    for preview in &previews {
        if let Some(table) = two_row_header(preview) {
            return Some(table);
        }
    }

    for preview in &previews {
        for skip in 1..=10 {
            if let Some(table) = read_with_header_at(preview, skip) {
                return Some(table);
            }
        }
    }

    previews.first().and_then(|p| read_with_header_at(p, 0))
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::from_text(s),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from_text(s),
        Data::Error(_) => Cell::Empty,
    }
}

fn preview_from_range(range: &Range<Data>) -> RawTable {
    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();
    RawTable { rows }
}

fn header_name(cell: Option<&Cell>, index: usize) -> String {
    let name = header::normalize_header(&cell.map(Cell::as_text).unwrap_or_default());
    if name.is_empty() {
        format!("col_{index}")
    } else {
        name
    }
}

/// Join rows 0 and 1 per column into a header; data begins at row 2.
fn two_row_header(preview: &RawTable) -> Option<SourceTable> {
    if preview.rows.len() < 2 || preview.width() <= 1 {
        return None;
    }
    let width = preview.width();
    let top = &preview.rows[0];
    let sub = &preview.rows[1];
    let columns: Vec<String> = (0..width)
        .map(|c| {
            let p1 = top.get(c).map(Cell::as_text).unwrap_or_default();
            let p2 = sub.get(c).map(Cell::as_text).unwrap_or_default();
            let joined = header::normalize_header(format!("{} {}", p1.trim(), p2.trim()).trim());
            if joined.is_empty() {
                format!("col_{c}")
            } else {
                joined
            }
        })
        .collect();
    let rows = preview.rows.get(2..).unwrap_or_default().to_vec();
    Some(SourceTable { columns, rows })
}

/// Fix the header at row `at`; data begins on the next row. Returns None
/// unless the grid is wider than one column.
fn read_with_header_at(preview: &RawTable, at: usize) -> Option<SourceTable> {
    if preview.width() <= 1 {
        return None;
    }
    let row = preview.rows.get(at)?;
    let width = preview.width();
    let columns: Vec<String> = (0..width).map(|c| header_name(row.get(c), c)).collect();
    let rows = preview.rows.get(at + 1..).unwrap_or_default().to_vec();
    Some(SourceTable { columns, rows })
}
