use std::path::Path;

use crate::assemble::fill_server_ids;
use crate::constants::TJTO_CODE;
use crate::error::Result;
use crate::month::load_month_data;
use crate::schema::CanonicalRecord;

use super::MonthExtractor;

/// Tribunal de Justiça do Tocantins. Publishes CSV with two-line grouped
/// headers and the occasional JSON export.
pub struct TjToExtractor;

impl MonthExtractor for TjToExtractor {
    fn tj_code(&self) -> &'static str {
        TJTO_CODE
    }

    fn fetch_month(&self, year_month: &str, raw_root: &Path) -> Result<Vec<CanonicalRecord>> {
        let mut records = load_month_data(TJTO_CODE, year_month, raw_root);
        fill_server_ids(&mut records);
        Ok(records)
    }
}
