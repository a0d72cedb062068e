use crate::registry::KeyRegistry;
use crate::storage::StoredRecord;
use crate::ui::Theme;
use owo_colors::OwoColorize;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct RecordRow {
    #[tabled(rename = "Key")]
    pub key: i64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Type")]
    pub storage_type: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl RecordRow {
    pub fn from_record(record: &StoredRecord) -> Self {
        Self {
            key: record.key,
            name: KeyRegistry.name_of(record.key).unwrap_or("-").to_string(),
            storage_type: record.storage_type.clone(),
            value: record.value.to_string(),
        }
    }
}

/// Render dumped records, one row per key
pub fn record_table(records: &[StoredRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let rows: Vec<RecordRow> = records.iter().map(RecordRow::from_record).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Registry listing, `  <name> (<index>)` per line
pub fn key_table(registry: &KeyRegistry, theme: &Theme) -> String {
    registry
        .entries()
        .map(|entry| {
            format!(
                "  {} ({})\n",
                entry.name.style(theme.key_name.clone()),
                entry.index.style(theme.key_index.clone())
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_str;

    #[test]
    fn test_key_table_lists_every_entry() {
        let listing = key_table(&KeyRegistry, &Theme::plain());
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), KeyRegistry.len());
        assert_eq!(lines[0], "  PlStorageDataDpsURL (0)");
        assert_eq!(lines[5], "  PlStorageDataWiFiSSID (5)");
    }

    #[test]
    fn test_key_table_colored() {
        let listing = key_table(&KeyRegistry, &Theme::colored());
        let first = listing.lines().next().unwrap();
        assert!(first.contains("PlStorageDataDpsURL"));
        assert!(first.contains('\u{1b}'), "expected ANSI styling in {first:?}");
    }

    #[test]
    fn test_record_table() {
        assert_eq!(record_table(&[]), "");

        let records = vec![
            StoredRecord {
                key: 5,
                value: encode_str("MyNet"),
                storage_type: "blob".into(),
            },
            StoredRecord {
                key: 4000,
                value: encode_str("x"),
                storage_type: "blob".into(),
            },
        ];
        let table = record_table(&records);
        assert!(table.contains("PlStorageDataWiFiSSID"));
        assert!(table.contains("4d794e6574"));
        assert!(table.contains("4000"));
    }
}
