//! Statement text for the `psm_data` table
//!
//! The table name and column layout are read by device firmware and must
//! not change.

use crate::encode::HexBlob;

/// Name of the single settings table
pub const TABLE_NAME: &str = "psm_data";

/// SQL to create the settings table
pub const CREATE_PSM_DATA_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS psm_data (key INTEGER PRIMARY KEY UNIQUE, value)";

/// SQL to read every record with its storage class
pub const SELECT_ALL_RECORDS: &str =
    "SELECT key, lower(hex(value)), typeof(value) FROM psm_data ORDER BY key";

/// Insert-or-replace statement for one record
pub fn upsert_statement(key: i64, value: &HexBlob) -> String {
    format!("INSERT OR REPLACE INTO {TABLE_NAME} VALUES({key}, X'{value}')")
}
