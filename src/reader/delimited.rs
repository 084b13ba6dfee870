//! Robust reading of delimited text (.csv/.txt) with unknown separator and
//! encoding.

use std::fs;
use std::path::Path;

use crate::header;
use crate::types::{Cell, SourceTable};

/// Attempt order: sniffed separator with strict UTF-8, sniffed separator
/// with a Windows-1252 fallback decode, explicit `;` with UTF-8, explicit
/// `;` with Windows-1252. The first attempt producing more than one column
/// wins; if its header shows grouped/unnamed columns the two-line strategy
/// replaces it. When every attempt fails, the two-line strategy is tried
/// directly on both decodings.
pub fn read(path: &Path) -> Option<SourceTable> {
    let bytes = fs::read(path).ok()?;

    let utf8 = std::str::from_utf8(&bytes).ok().map(|s| s.to_string());
    let latin = {
        let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
        decoded.into_owned()
    };

    let attempts: [(Option<&str>, Option<u8>); 4] = [
        (utf8.as_deref(), None),
        (Some(latin.as_str()), None),
        (utf8.as_deref(), Some(b';')),
        (Some(latin.as_str()), Some(b';')),
    ];

    for (content, delim) in attempts {
        let Some(content) = content else { continue };
        let delim = delim.unwrap_or_else(|| sniff_delimiter(content));
        let Some(table) = parse_with(content, delim) else {
            continue;
        };
        if header::should_use_two_line_header(&table.columns) {
            if let Some(two_line) = header::two_line_header(content) {
                if two_line.columns.len() > 1 {
                    return Some(two_line);
                }
            }
        }
        return Some(table);
    }

    // Some exports only carry a two-row header with no parseable first pass
    utf8.as_deref()
        .and_then(header::two_line_header)
        .or_else(|| header::two_line_header(&latin))
}

/// Detect the most likely field delimiter by checking consistency across
/// the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line.
/// The delimiter that produces the most consistent field count (>1 field)
/// wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the first line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Score: (number of lines with same field count as line 1) * field_count
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Parse with a fixed delimiter; first row becomes the header. Returns None
/// unless the result has more than one column.
fn parse_with(content: &str, delimiter: u8) -> Option<SourceTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records().filter_map(|r| r.ok());
    let head = records.next()?;
    if head.len() <= 1 {
        return None;
    }

    // Blank header cells stay blank so the two-line trigger can see them
    let columns: Vec<String> = head.iter().map(header::normalize_header).collect();
    let rows: Vec<Vec<Cell>> = records
        .map(|record| record.iter().map(Cell::from_text).collect())
        .collect();

    Some(SourceTable { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sniff_semicolon_delimiter() {
        let content = "Nome;Cargo;Liquido\nMaria;Analista;100,00\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_sniff_comma_delimiter() {
        let content = "nome,cargo,liquido\nMaria,Analista,\"1.000,00\"\n";
        assert_eq!(sniff_delimiter(content), b',');
    }

    #[test]
    fn test_sniff_tab_delimiter() {
        let content = "nome\tcargo\tliquido\nMaria\tAnalista\t100\n";
        assert_eq!(sniff_delimiter(content), b'\t');
    }

    #[test]
    fn test_read_semicolon_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("folha.csv");
        fs::write(&path, "nome;cargo;liquido\nMaria;Analista;9.000,00\n").unwrap();

        let table = read(&path).expect("readable csv");
        assert_eq!(table.columns, vec!["nome", "cargo", "liquido"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.cell(0, 2), &Cell::Text("9.000,00".into()));
    }

    #[test]
    fn test_read_latin1_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("folha.csv");
        // "remuneração" encoded as Latin-1 makes the file invalid UTF-8
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"nome;remunera\xe7\xe3o bruta\n");
        bytes.extend_from_slice(b"Maria;1.000,00\n");
        fs::write(&path, bytes).unwrap();

        let table = read(&path).expect("latin-1 fallback");
        assert_eq!(table.columns[1], "remuneração bruta");
    }

    #[test]
    fn test_read_two_line_header_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("folha.csv");
        // Grouped header with blank sub-columns triggers the two-line path
        fs::write(
            &path,
            "Nome;Rendimentos;;;Descontos;\n;Vencimento;Vantagens;Total;Previdência;Líquido\nMaria;100;50;150;20;130\n",
        )
        .unwrap();

        let table = read(&path).expect("two-line header");
        assert_eq!(table.columns[0], "Nome");
        assert_eq!(table.columns[1], "Rendimentos Vencimento");
        assert_eq!(table.columns[4], "Descontos Previdência");
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_read_single_column_garbage_is_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.csv");
        fs::write(&path, b"\x00\x01\x02garbage\nmorestuff\n").unwrap();
        assert!(read(&path).is_none());
    }
}
