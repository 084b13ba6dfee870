//! HTML table extraction (.html/.htm): the first embedded table, if any.

use std::fs;
use std::path::Path;

use scraper::{Html, Selector};

use crate::header;
use crate::parsing::normalize_text;
use crate::types::{Cell, SourceTable};

pub fn read(path: &Path) -> Option<SourceTable> {
    let bytes = fs::read(path).ok()?;
    let content = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(e.as_bytes());
            decoded.into_owned()
        }
    };
    parse_first_table(&content)
}

/// Rows of the first `<table>`; the first row becomes the header.
pub fn parse_first_table(html: &str) -> Option<SourceTable> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table").unwrap();
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("th, td").unwrap();

    let table = document.select(&table_selector).next()?;

    let mut grid: Vec<Vec<Cell>> = Vec::new();
    for tr in table.select(&row_selector) {
        let cells: Vec<Cell> = tr
            .select(&cell_selector)
            .map(|cell| {
                let text = cell.text().collect::<Vec<_>>().join(" ");
                Cell::from_text(&normalize_text(&text))
            })
            .collect();
        if !cells.is_empty() {
            grid.push(cells);
        }
    }

    let mut rows = grid.into_iter();
    let head = rows.next()?;
    let columns: Vec<String> = head
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = header::normalize_header(&cell.as_text());
            if name.is_empty() {
                format!("col_{i}")
            } else {
                name
            }
        })
        .collect();

    Some(SourceTable {
        columns,
        rows: rows.collect(),
    })
}
