//! Header location and reconstruction for previews with unknown layout.
//!
//! Payroll exports rarely start with a clean header line: title banners,
//! court letterheads and merged group labels ("Rendimentos" spanning four
//! sub-columns) all show up in the wild. Everything here is an attempt that
//! returns `Option` so the reader-level fallback chains can keep going.

use crate::types::{Cell, RawTable, SourceTable};

/// Domain vocabulary that marks a row as a plausible header.
pub const HEADER_KEYWORDS: [&str; 12] = [
    "nome",
    "servidor",
    "cargo",
    "funcao",
    "função",
    "lotacao",
    "lotação",
    "total de creditos",
    "total de créditos",
    "liquido",
    "líquido",
    "descontos",
];

/// Group labels that signal a two-row header in delimited files.
const GROUP_TOKENS: [&str; 2] = ["rendimentos", "descontos"];

/// How many preview rows the detector will scan.
const MAX_SCAN_ROWS: usize = 200;

/// Minimum detection score for a row to be accepted as the header.
const MIN_HEADER_SCORE: i64 = 15;

/// How many physical rows a merged header may span.
const MAX_HEADER_LEVELS: usize = 3;

/// Score one row: 10 points per cell containing a domain keyword, plus one
/// point per non-empty cell.
fn score_row(row: &[Cell]) -> i64 {
    let mut keyword_cells = 0i64;
    let mut non_empty = 0i64;
    for cell in row {
        if cell.is_empty() {
            continue;
        }
        non_empty += 1;
        let text = cell.as_text().trim().to_lowercase();
        if HEADER_KEYWORDS.iter().any(|k| text.contains(k)) {
            keyword_cells += 1;
        }
    }
    keyword_cells * 10 + non_empty
}

/// Scan up to the first 200 rows for the best-scoring header candidate.
/// Returns None when even the best row scores below the threshold.
pub fn detect_header_row(preview: &RawTable) -> Option<usize> {
    let mut best: Option<(usize, i64)> = None;
    for (idx, row) in preview.rows.iter().take(MAX_SCAN_ROWS).enumerate() {
        let score = score_row(row);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((idx, score));
        }
    }
    match best {
        Some((idx, score)) if score >= MIN_HEADER_SCORE => Some(idx),
        _ => None,
    }
}

/// A row still belongs to the header block while it carries no numeric
/// cells; the first row with amounts in it is data.
fn header_like(row: &[Cell]) -> bool {
    !row.is_empty() && !row.iter().any(|c| matches!(c, Cell::Number(_)))
}

/// Drop commas, collapse doubled spaces, trim.
pub fn normalize_header(name: &str) -> String {
    let mut s = name.trim().replace(',', "");
    while s.contains("  ") {
        s = s.replace("  ", " ");
    }
    s.trim().to_string()
}

/// Reconstruct a single-row header from up to 3 physical rows starting at
/// `start`. Blank cells are forward-filled vertically (so a group label
/// propagates down to its sub-columns) and each column's distinct non-empty
/// tokens are joined in order. Returns the names plus the number of rows
/// consumed; columns with no tokens get positional `col_{i}` placeholders.
pub fn build_headers_from_rows(preview: &RawTable, start: usize, levels: usize) -> (Vec<String>, usize) {
    let mut block: Vec<&Vec<Cell>> = Vec::new();
    for offset in 0..levels {
        let Some(row) = preview.rows.get(start + offset) else {
            break;
        };
        if offset > 0 && !header_like(row) {
            break;
        }
        block.push(row);
    }
    let consumed = block.len().max(1);

    let width = block.iter().map(|r| r.len()).max().unwrap_or(0);
    // Text grid with vertical forward-fill across the block
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(block.len());
    for (level, row) in block.iter().enumerate() {
        let mut texts: Vec<String> = (0..width)
            .map(|c| row.get(c).map(|cell| cell.as_text().trim().to_string()).unwrap_or_default())
            .collect();
        if level > 0 {
            for c in 0..width {
                if texts[c].is_empty() && !grid[level - 1][c].is_empty() {
                    texts[c] = grid[level - 1][c].clone();
                }
            }
        }
        grid.push(texts);
    }

    let mut headers = Vec::with_capacity(width);
    for c in 0..width {
        let mut parts: Vec<&str> = Vec::new();
        for level in &grid {
            let token = level[c].as_str();
            if !token.is_empty() && !parts.contains(&token) {
                parts.push(token);
            }
        }
        let name = normalize_header(&parts.join(" "));
        headers.push(if name.is_empty() { format!("col_{c}") } else { name });
    }
    (headers, consumed)
}

/// Drop columns whose data body is entirely empty.
fn drop_empty_columns(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> SourceTable {
    let keep: Vec<usize> = (0..columns.len())
        .filter(|&c| rows.iter().any(|r| r.get(c).map_or(false, |cell| !cell.is_empty())))
        .collect();
    if keep.len() == columns.len() {
        return SourceTable { columns, rows };
    }
    let columns = keep.iter().map(|&c| columns[c].clone()).collect();
    let rows = rows
        .into_iter()
        .map(|r| keep.iter().map(|&c| r.get(c).cloned().unwrap_or(Cell::Empty)).collect())
        .collect();
    SourceTable { columns, rows }
}

fn single_row_header(preview: &RawTable, start: usize) -> Option<SourceTable> {
    if preview.width() <= 1 {
        return None;
    }
    let width = preview.width();
    let row = preview.rows.get(start)?;
    let columns: Vec<String> = (0..width)
        .map(|c| {
            let name = normalize_header(&row.get(c).map(|cell| cell.as_text()).unwrap_or_default());
            if name.is_empty() {
                format!("col_{c}")
            } else {
                name
            }
        })
        .collect();
    let rows = preview.rows.get(start + 1..).unwrap_or_default().to_vec();
    Some(SourceTable { columns, rows })
}

/// Resolve a headerless preview into a finalized table.
///
/// Detects the header row by keyword scoring, reconstructs a possibly
/// multi-row header, and validates the result (at least 3 names containing
/// a domain keyword, more than 3 columns). On a failed validation falls
/// back to a plain single-row header at the detected index; returns None
/// when no identifiable header exists, letting the caller continue down its
/// own fallback chain.
pub fn resolve_preview(preview: &RawTable) -> Option<SourceTable> {
    let start = detect_header_row(preview)?;
    let (headers, consumed) = build_headers_from_rows(preview, start, MAX_HEADER_LEVELS);
    let body = preview.rows.get(start + consumed..).unwrap_or_default().to_vec();
    let table = drop_empty_columns(headers, body);

    let significant = table
        .columns
        .iter()
        .filter(|name| {
            let lower = name.to_lowercase();
            HEADER_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .count();
    if significant >= 3 && table.columns.len() > 3 {
        return Some(table);
    }

    single_row_header(preview, start).filter(|t| t.columns.len() > 1)
}

/// Trigger for the two-line header strategy: grouping vocabulary present
/// in the first-row header AND at least 20% of the columns unnamed.
pub fn should_use_two_line_header(columns: &[String]) -> bool {
    let lower: Vec<String> = columns.iter().map(|c| c.trim().to_lowercase()).collect();
    let unnamed = lower
        .iter()
        .filter(|c| c.is_empty() || c.starts_with("unnamed") || c.starts_with("col_"))
        .count();
    let has_groups = lower
        .iter()
        .any(|c| GROUP_TOKENS.iter().any(|g| c.contains(g)));
    has_groups && unnamed >= (lower.len() / 5).max(2)
}

/// Detect the field delimiter of a delimited file from its first line:
/// `;` wins ties or greater counts, `,` otherwise.
pub fn detect_two_line_delimiter(content: &str) -> u8 {
    let head = content.lines().next().unwrap_or("");
    let semi = head.matches(';').count();
    let comma = head.matches(',').count();
    if semi >= comma {
        b';'
    } else {
        b','
    }
}

/// Build a header by joining the first two lines token-by-token per column;
/// data begins at line 3. Returns None when the file has fewer than two
/// lines or only one column.
pub fn two_line_header(content: &str) -> Option<SourceTable> {
    let delim = detect_two_line_delimiter(content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let row1 = records.next()?.ok()?;
    let row2 = records.next()?.ok()?;

    let width = row1.len().max(row2.len());
    if width <= 1 {
        return None;
    }
    let columns: Vec<String> = (0..width)
        .map(|i| {
            let p1 = row1.get(i).unwrap_or("").trim();
            let p2 = row2.get(i).unwrap_or("").trim();
            let name = normalize_header(format!("{p1} {p2}").trim());
            if name.is_empty() {
                format!("col_{i}")
            } else {
                name
            }
        })
        .collect();

    let mut rows = Vec::new();
    for record in records.flatten() {
        rows.push(record.iter().map(Cell::from_text).collect());
    }
    Some(SourceTable { columns, rows })
}
