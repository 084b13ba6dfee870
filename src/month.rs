//! Month-level aggregation: every supported file in one
//! `<raw_root>/<tj_code>/<YYYY-MM>/` directory, concatenated into one set
//! of canonical records.

use std::fs;
use std::path::Path;

use metrics::{counter, histogram};
use tracing::{debug, info, instrument, warn};

use crate::assemble::assemble_records;
use crate::constants::is_supported_extension;
use crate::reader::read_table;
use crate::schema::CanonicalRecord;
use crate::types::IngestContext;

/// Read one file into canonical records. Returns an empty vector for files
/// no strategy could read; nothing here can abort the month.
fn ingest_file(path: &Path, ctx: &IngestContext) -> Vec<CanonicalRecord> {
    let table = read_table(path);
    if table.is_empty() {
        warn!(path = %path.display(), "file contributed zero rows");
        counter!("payroll_unreadable_files_total", "tj" => ctx.tj_code.clone()).increment(1);
        return Vec::new();
    }
    let records = assemble_records(&table, ctx);
    debug!(path = %path.display(), rows = records.len(), "file assembled");
    records
}

/// Load and normalize every supported file for one source and month.
///
/// Files are processed independently; a malformed file is skipped with zero
/// contributed rows and processing continues. No dedup by `server_id` is
/// performed across files, even when two files describe the same person.
#[instrument(skip(raw_root), fields(tj = %tj_code, month = %year_month))]
pub fn load_month_data(tj_code: &str, year_month: &str, raw_root: &Path) -> Vec<CanonicalRecord> {
    let month_dir = raw_root.join(tj_code).join(year_month);
    if !month_dir.is_dir() {
        debug!(dir = %month_dir.display(), "month directory missing");
        return Vec::new();
    }

    let ctx = IngestContext {
        tj_code: tj_code.to_string(),
        year_month: year_month.to_string(),
    };

    let mut entries: Vec<_> = match fs::read_dir(&month_dir) {
        Ok(read) => read.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(e) => {
            warn!(dir = %month_dir.display(), error = %e, "cannot list month directory");
            return Vec::new();
        }
    };
    entries.sort();

    let start = std::time::Instant::now();
    let mut records: Vec<CanonicalRecord> = Vec::new();
    let mut files_read = 0usize;

    for path in entries {
        if !path.is_file() {
            continue;
        }
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !is_supported_extension(ext) {
            continue;
        }
        let file_records = ingest_file(&path, &ctx);
        if !file_records.is_empty() {
            files_read += 1;
        }
        records.extend(file_records);
    }

    derive_net_pay(&mut records);

    counter!("payroll_files_ingested_total", "tj" => ctx.tj_code.clone())
        .increment(files_read as u64);
    counter!("payroll_rows_ingested_total", "tj" => ctx.tj_code.clone())
        .increment(records.len() as u64);
    histogram!("payroll_month_ingest_duration_seconds", "tj" => ctx.tj_code.clone())
        .record(start.elapsed().as_secs_f64());

    info!(files = files_read, rows = records.len(), "month aggregated");
    records
}

/// Derive a missing net pay from gross minus deductions, floored at zero.
/// Only applied when the source gave no usable net value.
fn derive_net_pay(records: &mut [CanonicalRecord]) {
    for record in records {
        if record.net_pay <= 0.0 && record.gross_pay > 0.0 {
            record.net_pay = (record.gross_pay - record.deductions).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_month_dir_is_empty() {
        let dir = tempdir().unwrap();
        let records = load_month_data("TJRS", "2025-01", dir.path());
        assert!(records.is_empty());
    }

    #[test]
    fn test_unsupported_extensions_are_skipped() {
        let dir = tempdir().unwrap();
        let month_dir = dir.path().join("TJRS").join("2025-01");
        fs::create_dir_all(&month_dir).unwrap();
        fs::write(month_dir.join("folha.pdf"), b"%PDF").unwrap();
        fs::write(
            month_dir.join("folha.csv"),
            "nome;liquido\nMaria;1.000,00\n",
        )
        .unwrap();

        let records = load_month_data("TJRS", "2025-01", dir.path());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].net_pay, 1000.0);
    }

    #[test]
    fn test_corrupt_file_is_isolated() {
        let dir = tempdir().unwrap();
        let month_dir = dir.path().join("TJTO").join("2025-03");
        fs::create_dir_all(&month_dir).unwrap();
        fs::write(month_dir.join("broken.csv"), b"\x00\x01\x02\nrubbish\n").unwrap();
        fs::write(
            month_dir.join("ok.csv"),
            "nome;cargo;remuneração bruta;descontos\nMaria;Analista;10.000,00;2.000,00\nJoão;Técnico;8.000,00;1.500,00\n",
        )
        .unwrap();

        let records = load_month_data("TJTO", "2025-03", dir.path());
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_net_pay_derivation() {
        let mut records = vec![CanonicalRecord::empty("TJRS", "2025-01")];
        records[0].gross_pay = 10000.0;
        records[0].deductions = 2500.0;
        derive_net_pay(&mut records);
        assert_eq!(records[0].net_pay, 7500.0);

        // Deductions larger than gross floor at zero
        let mut records = vec![CanonicalRecord::empty("TJRS", "2025-01")];
        records[0].gross_pay = 100.0;
        records[0].deductions = 500.0;
        derive_net_pay(&mut records);
        assert_eq!(records[0].net_pay, 0.0);

        // A reported net value is never overwritten
        let mut records = vec![CanonicalRecord::empty("TJRS", "2025-01")];
        records[0].gross_pay = 100.0;
        records[0].net_pay = 90.0;
        records[0].deductions = 50.0;
        derive_net_pay(&mut records);
        assert_eq!(records[0].net_pay, 90.0);
    }
}
