use serde::{Deserialize, Serialize};

/// A single cell as it came out of a file reader.
///
/// Workbook cells keep their numeric type so that values like 1500.5 are
/// passed through instead of being re-parsed under Brazilian-locale rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Text view of the cell. Whole numbers render without a trailing ".0"
    /// so that header tokens and registration numbers stay clean.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Cell::Text(s) => s.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Number(_) => false,
            Cell::Text(s) => s.trim().is_empty(),
        }
    }

    pub fn from_text(s: &str) -> Self {
        if s.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

/// Transient headerless grid produced by the file readers before any header
/// has been located. Rows may be ragged.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest row in the grid.
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }
}

/// A table with its header resolved: the hand-off shape between the format
/// readers and the record assembler.
#[derive(Debug, Clone, Default)]
pub struct SourceTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl SourceTable {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    /// Cell at (row, col), treating missing trailing cells as empty.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }
}

/// Per-file ingest context: which court and which payroll cycle the file
/// belongs to, taken from the directory layout.
#[derive(Debug, Clone)]
pub struct IngestContext {
    pub tj_code: String,
    pub year_month: String,
}
