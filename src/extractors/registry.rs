use std::collections::HashMap;
use std::path::Path;

use crate::constants::{TJPI_CODE, TJRS_CODE, TJTO_CODE};
use crate::error::{IngestError, Result};
use crate::schema::CanonicalRecord;

use super::{MonthExtractor, TjPiExtractor, TjRsExtractor, TjToExtractor};

/// Registry for source-specific extraction strategies
pub struct ExtractorRegistry {
    extractors: HashMap<String, Box<dyn MonthExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new registry with all built-in extractors registered
    pub fn new() -> Self {
        let mut extractors: HashMap<String, Box<dyn MonthExtractor>> = HashMap::new();

        extractors.insert(TJRS_CODE.to_string(), Box::new(TjRsExtractor));
        extractors.insert(TJPI_CODE.to_string(), Box::new(TjPiExtractor));
        extractors.insert(TJTO_CODE.to_string(), Box::new(TjToExtractor));

        Self { extractors }
    }

    /// Register an extractor for a source code, replacing any previous one
    pub fn register(&mut self, tj_code: String, extractor: Box<dyn MonthExtractor>) {
        self.extractors.insert(tj_code, extractor);
    }

    /// Get the extractor for a source code
    pub fn get(&self, tj_code: &str) -> Option<&dyn MonthExtractor> {
        self.extractors.get(tj_code).map(|e| e.as_ref())
    }

    /// Fetch one month for one source through its registered extractor
    pub fn fetch_month(
        &self,
        tj_code: &str,
        year_month: &str,
        raw_root: &Path,
    ) -> Result<Vec<CanonicalRecord>> {
        match self.get(tj_code) {
            Some(extractor) => extractor.fetch_month(year_month, raw_root),
            None => Err(IngestError::UnknownSource(tj_code.to_string())),
        }
    }

    /// List all registered source codes
    pub fn list_sources(&self) -> Vec<&str> {
        let mut sources: Vec<&str> = self.extractors.keys().map(|k| k.as_str()).collect();
        sources.sort();
        sources
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
