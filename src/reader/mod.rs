//! Format dispatch for raw payroll files.
//!
//! Each submodule is a chain of fallible attempts evaluated until the first
//! success; a file that defeats every strategy yields an empty table, never
//! an error.

pub mod delimited;
pub mod markup;
pub mod structured;
pub mod workbook;

use std::path::Path;

use tracing::debug;

use crate::types::SourceTable;

/// Read one file into a resolved table, dispatching on the extension.
///
/// Never fails: any decode or parse problem across all attempted strategies
/// results in an empty table. Callers filter extensions beforehand; unknown
/// extensions simply produce an empty table here.
pub fn read_table(path: &Path) -> SourceTable {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let table = match ext.as_str() {
        "csv" | "txt" => delimited::read(path),
        "xlsx" => workbook::read(path),
        "json" => structured::read(path),
        "html" | "htm" => markup::read(path),
        _ => None,
    };

    match table {
        Some(t) => t,
        None => {
            debug!(path = %path.display(), "no reading strategy produced a table");
            SourceTable::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_unknown_extension_yields_empty_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        fs::write(&path, b"%PDF-1.4 garbage").unwrap();
        let table = read_table(&path);
        assert!(table.is_empty());
    }

    #[test]
    fn test_missing_file_yields_empty_table() {
        let table = read_table(Path::new("/nonexistent/folha.csv"));
        assert!(table.is_empty());
    }
}
