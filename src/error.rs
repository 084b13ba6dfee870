use thiserror::Error;

/// Failures that can surface at the extractor/CLI boundary.
///
/// Parsing problems inside the per-file strategy chains never become errors:
/// an unreadable file simply contributes zero rows. These variants cover the
/// places where propagation is the right call (config, unknown source codes,
/// persistence of results).
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("no extractor registered for source: {0}")]
    UnknownSource(String),
}

pub type Result<T> = std::result::Result<T, IngestError>;
