/// Source code constants to ensure consistency across the codebase.
/// Each code identifies one court's transparency portal exports.

pub const TJRS_CODE: &str = "TJRS";
pub const TJPI_CODE: &str = "TJPI";
pub const TJTO_CODE: &str = "TJTO";

/// File extensions the ingestion path will attempt to read.
/// Anything else inside a month directory is skipped without comment.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["csv", "txt", "xlsx", "json", "html", "htm"];

/// Get all source codes with a registered extractor
pub fn get_supported_tjs() -> Vec<&'static str> {
    vec![TJRS_CODE, TJPI_CODE, TJTO_CODE]
}

/// True when `ext` (without the dot, any case) is an ingestible format
pub fn is_supported_extension(ext: &str) -> bool {
    let ext = ext.to_lowercase();
    SUPPORTED_EXTENSIONS.iter().any(|e| *e == ext)
}
