use std::path::Path;

use crate::assemble::fill_server_ids;
use crate::constants::TJRS_CODE;
use crate::error::Result;
use crate::month::load_month_data;
use crate::schema::CanonicalRecord;

use super::MonthExtractor;

/// Tribunal de Justiça do Rio Grande do Sul. Monthly exports arrive as
/// spreadsheets or CSV with Brazilian-formatted amounts.
pub struct TjRsExtractor;

impl MonthExtractor for TjRsExtractor {
    fn tj_code(&self) -> &'static str {
        TJRS_CODE
    }

    fn fetch_month(&self, year_month: &str, raw_root: &Path) -> Result<Vec<CanonicalRecord>> {
        let mut records = load_month_data(TJRS_CODE, year_month, raw_root);
        fill_server_ids(&mut records);
        Ok(records)
    }
}
