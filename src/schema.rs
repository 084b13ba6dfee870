use serde::{Deserialize, Serialize};

/// Canonical column names, in the fixed output order.
pub const UNIFIED_COLUMNS: [&str; 12] = [
    "tj_code",
    "year_month",
    "server_id",
    "server_name",
    "role",
    "career",
    "bond_type",
    "gross_pay",
    "base_pay",
    "benefits",
    "deductions",
    "net_pay",
];

/// One normalized payroll row: one server, one month, one court.
///
/// Every record carries exactly this field set regardless of how much the
/// source file covered; unmapped text fields are `None` and unmapped
/// monetary fields are 0.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub tj_code: String,
    /// "YYYY-MM"
    pub year_month: String,
    /// Stable identifier; empty until derived from the server name.
    pub server_id: String,
    pub server_name: Option<String>,
    pub role: Option<String>,
    pub career: Option<String>,
    pub bond_type: Option<String>,
    pub gross_pay: f64,
    pub base_pay: f64,
    pub benefits: f64,
    pub deductions: f64,
    pub net_pay: f64,
}

impl CanonicalRecord {
    /// A record with only the ingest context filled in.
    pub fn empty(tj_code: &str, year_month: &str) -> Self {
        Self {
            tj_code: tj_code.to_string(),
            year_month: year_month.to_string(),
            server_id: String::new(),
            server_name: None,
            role: None,
            career: None,
            bond_type: None,
            gross_pay: 0.0,
            base_pay: 0.0,
            benefits: 0.0,
            deductions: 0.0,
            net_pay: 0.0,
        }
    }
}

/// The canonical fields resolved by column mapping, excluding the three
/// context fields (tj_code, year_month, server_id) which never come from
/// source columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    ServerName,
    Role,
    Career,
    BondType,
    GrossPay,
    BasePay,
    Benefits,
    Deductions,
    NetPay,
}

impl CanonicalField {
    /// Field-evaluation order for column mapping. A raw header that
    /// satisfies several fields' candidate lists is claimed by the first
    /// field in this order; later fields may still claim the same column.
    pub const MAPPED: [CanonicalField; 9] = [
        CanonicalField::ServerName,
        CanonicalField::Role,
        CanonicalField::Career,
        CanonicalField::BondType,
        CanonicalField::GrossPay,
        CanonicalField::BasePay,
        CanonicalField::Benefits,
        CanonicalField::Deductions,
        CanonicalField::NetPay,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CanonicalField::ServerName => "server_name",
            CanonicalField::Role => "role",
            CanonicalField::Career => "career",
            CanonicalField::BondType => "bond_type",
            CanonicalField::GrossPay => "gross_pay",
            CanonicalField::BasePay => "base_pay",
            CanonicalField::Benefits => "benefits",
            CanonicalField::Deductions => "deductions",
            CanonicalField::NetPay => "net_pay",
        }
    }

    pub fn is_monetary(self) -> bool {
        matches!(
            self,
            CanonicalField::GrossPay
                | CanonicalField::BasePay
                | CanonicalField::Benefits
                | CanonicalField::Deductions
                | CanonicalField::NetPay
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unified_columns_cover_mapped_fields() {
        for field in CanonicalField::MAPPED {
            assert!(UNIFIED_COLUMNS.contains(&field.name()));
        }
    }

    #[test]
    fn test_empty_record_has_context_only() {
        let rec = CanonicalRecord::empty("TJRS", "2025-01");
        assert_eq!(rec.tj_code, "TJRS");
        assert_eq!(rec.year_month, "2025-01");
        assert!(rec.server_id.is_empty());
        assert!(rec.server_name.is_none());
        assert_eq!(rec.gross_pay, 0.0);
    }
}
