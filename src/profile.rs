//! Data-quality inspection: a read-only profile of which column names show
//! up in the raw files, per source and month. Reuses the format readers and
//! header resolution but never looks at cell values.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::constants::{get_supported_tjs, is_supported_extension};
use crate::reader::read_table;

/// Portuguese month names as they appear in export filenames.
static PT_MONTHS: [(&str, &str); 13] = [
    ("janeiro", "01"),
    ("fevereiro", "02"),
    ("marco", "03"),
    ("março", "03"),
    ("abril", "04"),
    ("maio", "05"),
    ("junho", "06"),
    ("julho", "07"),
    ("agosto", "08"),
    ("setembro", "09"),
    ("outubro", "10"),
    ("novembro", "11"),
    ("dezembro", "12"),
];

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(20\d{2})").unwrap());

/// Best effort to extract column names from a file without keeping any of
/// its data. Empty when not identifiable.
fn safe_read_columns(path: &Path) -> Vec<String> {
    read_table(path).columns
}

fn strip_accents(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'ç' => 'c',
            'ã' | 'â' | 'á' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' => 'o',
            'ú' => 'u',
            other => other,
        })
        .collect()
}

/// Infer "YYYY-MM" from a filename containing a Portuguese month name and a
/// 4-digit year, e.g. "janeiro2025.csv" -> "2025-01",
/// "Maio2025_Piaui.csv" -> "2025-05". None when not inferable.
pub fn infer_year_month_from_name(name: &str) -> Option<String> {
    let stem = Path::new(name).file_stem()?.to_str()?;
    let s = strip_accents(&stem.to_lowercase().replace(['+', '_'], " "));

    let month = PT_MONTHS
        .iter()
        .find(|(token, _)| s.contains(token))
        .map(|(_, num)| *num)?;

    // Take the last year occurrence in the name
    let year = YEAR.find_iter(&s).last()?.as_str();
    Some(format!("{year}-{month}"))
}

fn sorted_counts(counts: HashMap<String, usize>) -> Map<String, Value> {
    let mut pairs: Vec<(String, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.to_lowercase().cmp(&b.0.to_lowercase())));
    pairs
        .into_iter()
        .map(|(name, count)| (name, Value::from(count)))
        .collect()
}

fn profile_month_dir(month_dir: &Path) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let Ok(entries) = fs::read_dir(month_dir) else {
        return counts;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !is_supported_extension(ext) {
            continue;
        }
        for column in safe_read_columns(&path) {
            *counts.entry(column).or_insert(0) += 1;
        }
    }
    counts
}

/// Build `{tj_code: {year_month: {column_name: file_count}}}` for every
/// registered source under `raw_root`. Column keys are ordered by
/// descending frequency, then case-insensitive name.
///
/// Two raw layouts are supported: `<tj>/<YYYY-MM>/` subdirectories, and a
/// flat layout where the month is inferred from each filename.
#[instrument(skip(raw_root))]
pub fn profile_columns(raw_root: &Path) -> Value {
    let mut summary = Map::new();
    if !raw_root.is_dir() {
        return Value::Object(summary);
    }

    for tj in get_supported_tjs() {
        let tj_path = raw_root.join(tj);
        if !tj_path.is_dir() {
            continue;
        }

        let mut subdirs: Vec<_> = fs::read_dir(&tj_path)
            .map(|read| {
                read.filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| p.is_dir())
                    .collect()
            })
            .unwrap_or_default();
        subdirs.sort();

        let mut months = Map::new();
        if !subdirs.is_empty() {
            // Layout A: one subdirectory per year-month
            for ym_path in subdirs {
                let Some(ym) = ym_path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let counts = profile_month_dir(&ym_path);
                if !counts.is_empty() {
                    months.insert(ym.to_string(), Value::Object(sorted_counts(counts)));
                }
            }
        } else {
            // Layout B: flat files, month inferred from the filename
            let mut grouped: HashMap<String, HashMap<String, usize>> = HashMap::new();
            let Ok(entries) = fs::read_dir(&tj_path) else {
                continue;
            };
            for entry in entries.filter_map(|e| e.ok()) {
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }
                let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
                if !is_supported_extension(ext) {
                    continue;
                }
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let Some(ym) = infer_year_month_from_name(name) else {
                    debug!(file = %name, "year-month not inferable, skipping");
                    continue;
                };
                let columns = safe_read_columns(&path);
                if columns.is_empty() {
                    continue;
                }
                let bucket = grouped.entry(ym).or_default();
                for column in columns {
                    *bucket.entry(column).or_insert(0) += 1;
                }
            }
            let mut keys: Vec<String> = grouped.keys().cloned().collect();
            keys.sort();
            for ym in keys {
                let counts = grouped.remove(&ym).unwrap_or_default();
                months.insert(ym, Value::Object(sorted_counts(counts)));
            }
        }

        if !months.is_empty() {
            summary.insert(tj.to_string(), Value::Object(months));
        }
    }

    Value::Object(summary)
}
