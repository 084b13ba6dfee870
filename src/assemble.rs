//! Assembly of canonical records from one resolved table.

use crate::mapper::{self, ColumnMapping};
use crate::parsing::{make_server_id, to_float};
use crate::schema::{CanonicalField, CanonicalRecord};
use crate::types::{Cell, IngestContext, SourceTable};

fn text_field(table: &SourceTable, row: usize, index: Option<usize>) -> Option<String> {
    let cell = table.cell(row, index?);
    if cell.is_empty() {
        None
    } else {
        Some(cell.as_text().trim().to_string())
    }
}

fn money_field(table: &SourceTable, row: usize, index: Option<usize>) -> f64 {
    match index {
        Some(col) => to_float(table.cell(row, col)),
        None => to_float(&Cell::Empty),
    }
}

/// Produce one canonical record per data row, with no row filtering.
///
/// Text fields come straight from the mapped columns (None when unmapped or
/// blank); monetary fields are coerced through the numeric normalizer;
/// `server_id` is left empty here and derived later once names are known.
pub fn assemble_records(table: &SourceTable, ctx: &IngestContext) -> Vec<CanonicalRecord> {
    let mapping: ColumnMapping = mapper::map_columns(&table.columns);

    let mut records = Vec::with_capacity(table.rows.len());
    for row in 0..table.rows.len() {
        let mut record = CanonicalRecord::empty(&ctx.tj_code, &ctx.year_month);
        record.server_name =
            text_field(table, row, mapping.source_index(CanonicalField::ServerName));
        record.role = text_field(table, row, mapping.source_index(CanonicalField::Role));
        record.career = text_field(table, row, mapping.source_index(CanonicalField::Career));
        record.bond_type = text_field(table, row, mapping.source_index(CanonicalField::BondType));
        record.gross_pay = money_field(table, row, mapping.source_index(CanonicalField::GrossPay));
        record.base_pay = money_field(table, row, mapping.source_index(CanonicalField::BasePay));
        record.benefits = money_field(table, row, mapping.source_index(CanonicalField::Benefits));
        record.deductions =
            money_field(table, row, mapping.source_index(CanonicalField::Deductions));
        record.net_pay = money_field(table, row, mapping.source_index(CanonicalField::NetPay));
        records.push(record);
    }
    records
}

/// Derive `server_id` for records that still lack one and have a name.
/// Deterministic across runs for identical inputs.
pub fn fill_server_ids(records: &mut [CanonicalRecord]) {
    for record in records {
        if record.server_id.is_empty() {
            if let Some(name) = &record.server_name {
                record.server_id = make_server_id(&record.tj_code, name, None);
            }
        }
    }
}
