use std::path::Path;

use crate::assemble::fill_server_ids;
use crate::constants::TJPI_CODE;
use crate::error::Result;
use crate::month::load_month_data;
use crate::schema::CanonicalRecord;

use super::MonthExtractor;

/// Tribunal de Justiça do Piauí. Known for multi-row merged headers in
/// its spreadsheet exports; all of that is handled by header resolution.
pub struct TjPiExtractor;

impl MonthExtractor for TjPiExtractor {
    fn tj_code(&self) -> &'static str {
        TJPI_CODE
    }

    fn fetch_month(&self, year_month: &str, raw_root: &Path) -> Result<Vec<CanonicalRecord>> {
        let mut records = load_month_data(TJPI_CODE, year_month, raw_root);
        fill_server_ids(&mut records);
        Ok(records)
    }
}
