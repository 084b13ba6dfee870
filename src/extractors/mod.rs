//! Source-specific extractors. One per court; all of them funnel through
//! the shared month loader, differing only in their registered code.

use std::path::Path;

use crate::error::Result;
use crate::schema::CanonicalRecord;

pub mod registry;
mod tj_pi;
mod tj_rs;
mod tj_to;

pub use registry::ExtractorRegistry;
pub use tj_pi::TjPiExtractor;
pub use tj_rs::TjRsExtractor;
pub use tj_to::TjToExtractor;

/// Extraction strategy for one court's transparency exports.
pub trait MonthExtractor: Send + Sync {
    /// The source code this extractor serves, e.g. "TJRS"
    fn tj_code(&self) -> &'static str;

    /// Produce canonical records for one `YYYY-MM` from files under
    /// `<raw_root>/<tj_code>/<year_month>/`. A month with no usable data
    /// is an empty vector, not an error.
    fn fetch_month(&self, year_month: &str, raw_root: &Path) -> Result<Vec<CanonicalRecord>>;
}
