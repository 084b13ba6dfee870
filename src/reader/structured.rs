//! Structured text (.json) reading: JSON-lines of objects, with an
//! array-of-objects fallback limited to the first ~200 KB.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::types::{Cell, SourceTable};

/// The array fallback reads at most this many bytes; some portals dump
/// multi-megabyte arrays and only the header shape matters up front.
const MAX_ARRAY_BYTES: usize = 200 * 1024;

pub fn read(path: &Path) -> Option<SourceTable> {
    let bytes = fs::read(path).ok()?;
    let content = String::from_utf8_lossy(&bytes);

    if let Some(table) = read_json_lines(&content) {
        return Some(table);
    }

    let mut limit = content.len().min(MAX_ARRAY_BYTES);
    while !content.is_char_boundary(limit) {
        limit -= 1;
    }
    read_array(&content[..limit])
}

fn object_row(object: &Map<String, Value>, columns: &[String]) -> Vec<Cell> {
    columns
        .iter()
        .map(|key| object.get(key).map(value_to_cell).unwrap_or(Cell::Empty))
        .collect()
}

fn value_to_cell(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Empty,
        Value::Number(n) => Cell::Number(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => Cell::from_text(s),
        Value::Bool(b) => Cell::Text(b.to_string()),
        other => Cell::Text(other.to_string()),
    }
}

/// Every non-empty line must be a JSON object; the first object's keys (in
/// document order) become the header.
fn read_json_lines(content: &str) -> Option<SourceTable> {
    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<Cell>> = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line).ok()?;
        let object = value.as_object()?;
        if columns.is_empty() {
            columns = object.keys().cloned().collect();
        }
        rows.push(object_row(object, &columns));
    }

    if columns.is_empty() {
        None
    } else {
        Some(SourceTable { columns, rows })
    }
}

/// JSON array of objects; the first object's keys become the implied header.
fn read_array(text: &str) -> Option<SourceTable> {
    let value: Value = serde_json::from_str(text).ok()?;
    let array = value.as_array()?;
    let first = array.first()?.as_object()?;
    let columns: Vec<String> = first.keys().cloned().collect();

    let rows = array
        .iter()
        .filter_map(Value::as_object)
        .map(|object| object_row(object, &columns))
        .collect();

    Some(SourceTable { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_json_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("folha.json");
        fs::write(
            &path,
            "{\"nome\": \"Maria\", \"liquido\": 8300.5}\n{\"nome\": \"João\", \"liquido\": 6100}\n",
        )
        .unwrap();

        let table = read(&path).expect("json lines");
        assert_eq!(table.columns, vec!["nome", "liquido"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.cell(0, 1), &Cell::Number(8300.5));
    }

    #[test]
    fn test_json_array_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("folha.json");
        fs::write(
            &path,
            "[{\"nome\": \"Maria\", \"cargo\": \"Analista\"}, {\"nome\": \"João\", \"cargo\": null}]",
        )
        .unwrap();

        let table = read(&path).expect("json array");
        assert_eq!(table.columns, vec!["nome", "cargo"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.cell(1, 1), &Cell::Empty);
    }

    #[test]
    fn test_invalid_json_is_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json at all").unwrap();
        assert!(read(&path).is_none());
    }
}
