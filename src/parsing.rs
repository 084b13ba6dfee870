use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use unicode_normalization::UnicodeNormalization;

use crate::types::Cell;

/// Everything that is not a digit, comma, period, hyphen or space.
static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9,.\- ]+").unwrap());

/// Trim and NFKC-normalize a piece of source text.
pub fn normalize_text(s: &str) -> String {
    s.trim().nfkc().collect::<String>()
}

/// Coerce a raw cell into a float under Brazilian-locale rules.
///
/// Never fails: empty cells and unparsable text both coerce to 0.0, and
/// already-numeric cells pass through untouched.
pub fn to_float(cell: &Cell) -> f64 {
    match cell {
        Cell::Empty => 0.0,
        Cell::Number(n) => *n,
        Cell::Text(s) => to_float_text(s),
    }
}

fn to_float_text(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    let s: String = s.nfkc().collect();
    let s = s.replace('\u{00a0}', " ");
    let s = s.replace("R$", "").replace("BRL", "").replace("brl", "");
    // Keep only digits, comma, period, hyphen and interior spaces
    let s = NON_NUMERIC.replace_all(&s, "");
    let s = s.trim().replace(' ', "");
    // Brazilian formats: 1.234,56 -> 1234.56
    let s = s.replace('.', "").replace(',', ".");
    s.parse::<f64>().unwrap_or(0.0)
}

/// Deterministic 16-hex-char identifier for one server within one court.
///
/// Collisions are cryptographically negligible and not otherwise guarded
/// against.
pub fn make_server_id(tj_code: &str, name: &str, registration: Option<&str>) -> String {
    let base = format!(
        "{}|{}|{}",
        tj_code,
        normalize_text(name),
        normalize_text(registration.unwrap_or(""))
    );
    let digest = Sha256::digest(base.as_bytes());
    hex::encode(digest)[..16].to_string()
}
