//! Write and dump flows
//!
//! Write: resolve key -> check value file -> check engine -> create the
//! database if absent -> encode -> upsert.
//!
//! The engine check runs before the lazy create, so a missing engine fails
//! without leaving an empty database file behind.

use crate::config::ensure_parent_dir;
use crate::encode::{HexBlob, ValueSource};
use crate::registry::{resolve_key, ResolvedKey};
use crate::storage::{StoreGateway, StoredRecord};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Validated input for write mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    pub key: String,
    pub value: ValueSource,
    pub db_file: PathBuf,
}

impl WriteRequest {
    /// Check write-mode arguments, reporting every problem at once
    pub fn from_parts(
        key: Option<String>,
        value: Option<String>,
        value_file: Option<PathBuf>,
        db_file: Option<PathBuf>,
    ) -> Result<Self> {
        let mut problems = Vec::new();

        if key.is_none() {
            problems.push("--key must be specified".to_string());
        }

        let value = match (value, value_file) {
            (Some(value), None) => Some(ValueSource::Literal(value)),
            (None, Some(path)) => Some(ValueSource::File(path)),
            (None, None) => {
                problems.push("Either --value or --value-file must be specified".to_string());
                None
            }
            (Some(_), Some(_)) => {
                problems.push("Both --value and --value-file are specified".to_string());
                None
            }
        };

        if db_file.is_none() {
            problems.push("--db-file must be specified".to_string());
        }

        match (key, value, db_file) {
            (Some(key), Some(value), Some(db_file)) if problems.is_empty() => Ok(Self {
                key,
                value,
                db_file,
            }),
            _ => Err(Error::Usage(problems)),
        }
    }
}

/// What a successful write did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub key: ResolvedKey,
    pub value: HexBlob,
    /// The database file did not exist and was initialized first
    pub created: bool,
}

/// Store one value.
///
/// `open` builds the gateway for `request.db_file`; it is only called once
/// the key and value source have been validated.
pub fn write_record<F>(request: &WriteRequest, open: F) -> Result<WriteOutcome>
where
    F: FnOnce(&Path) -> Box<dyn StoreGateway>,
{
    let key = resolve_key(&request.key)?;
    debug!("resolved key {:?} to {}", request.key, key);
    if key.name.is_none() {
        warn!("key {} is not in the registry, writing it as-is", key.index);
    }

    request.value.check_exists()?;

    let gateway = open(&request.db_file);
    gateway.check_available()?;

    let created = !gateway.db_path().is_file();
    if created {
        warn!(
            "DB file not found: {}, it will be created",
            gateway.db_path().display()
        );
        ensure_parent_dir(gateway.db_path())?;
        gateway.initialize()?;
    }

    let value = request.value.encode()?;
    debug!("blob_data: {}", value);

    gateway.upsert(key.index, &value)?;
    info!(
        "Stored {} bytes under {} in {}",
        value.byte_len(),
        key,
        gateway.db_path().display()
    );

    Ok(WriteOutcome { key, value, created })
}

/// Read every record of an existing database
pub fn dump_records(gateway: &dyn StoreGateway) -> Result<Vec<StoredRecord>> {
    let db_path = gateway.db_path();
    if !db_path.is_file() {
        return Err(Error::FileNotFound {
            what: "DB file",
            path: db_path.to_path_buf(),
        });
    }

    gateway.check_available()?;
    let records = gateway.dump()?;
    for record in &records {
        debug!("{}|{}|{}", record.key, record.value, record.storage_type);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_str;
    use crate::storage::SqliteStore;

    fn embedded(path: &Path) -> Box<dyn StoreGateway> {
        Box::new(SqliteStore::new(path))
    }

    fn request(key: &str, value: ValueSource, db_file: PathBuf) -> WriteRequest {
        WriteRequest {
            key: key.to_string(),
            value,
            db_file,
        }
    }

    #[test]
    fn test_from_parts_accepts_one_value_source() {
        let req = WriteRequest::from_parts(
            Some("WiFiSSID".into()),
            Some("MyNet".into()),
            None,
            Some("psm.db".into()),
        )
        .unwrap();
        assert_eq!(req.value, ValueSource::Literal("MyNet".into()));

        let req = WriteRequest::from_parts(
            Some("5".into()),
            None,
            Some("cert.pem".into()),
            Some("psm.db".into()),
        )
        .unwrap();
        assert_eq!(req.value, ValueSource::File("cert.pem".into()));
    }

    #[test]
    fn test_from_parts_rejects_both_values() {
        let err = WriteRequest::from_parts(
            Some("5".into()),
            Some("MyNet".into()),
            Some("cert.pem".into()),
            Some("psm.db".into()),
        )
        .unwrap_err();
        match err {
            Error::Usage(problems) => {
                assert_eq!(problems, vec!["Both --value and --value-file are specified"])
            }
            other => panic!("expected usage error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_parts_collects_all_problems() {
        let err = WriteRequest::from_parts(None, None, None, None).unwrap_err();
        match err {
            Error::Usage(problems) => assert_eq!(problems.len(), 3),
            other => panic!("expected usage error, got {other:?}"),
        }
    }

    #[test]
    fn test_write_creates_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("test.db");
        let store = SqliteStore::new(&db);

        let outcome = write_record(
            &request("PlStorageDataWiFiSSID", ValueSource::Literal("MyNet".into()), db.clone()),
            embedded,
        )
        .unwrap();
        assert!(outcome.created);
        assert_eq!(outcome.key.index, 5);

        let records = dump_records(&store).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, 5);
        assert_eq!(records[0].value, encode_str("MyNet"));
    }

    #[test]
    fn test_key_forms_store_identical_records() {
        let mut dumps = Vec::new();
        for key in ["5", "WiFiSSID", "PlStorageDataWiFiSSID"] {
            let dir = tempfile::tempdir().unwrap();
            let db = dir.path().join("psm.db");
            let store = SqliteStore::new(&db);
            write_record(&request(key, ValueSource::Literal("MyNet".into()), db), embedded).unwrap();
            dumps.push(dump_records(&store).unwrap());
        }
        assert_eq!(dumps[0], dumps[1]);
        assert_eq!(dumps[1], dumps[2]);
    }

    #[test]
    fn test_second_write_replaces_first() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("psm.db");
        let store = SqliteStore::new(&db);

        let first = write_record(&request("DNS", ValueSource::Literal("1.1.1.1".into()), db.clone()), embedded).unwrap();
        let second = write_record(&request("DNS", ValueSource::Literal("8.8.8.8".into()), db.clone()), embedded).unwrap();
        assert!(first.created);
        assert!(!second.created);

        let records = dump_records(&store).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value.decode(), b"8.8.8.8");
    }

    #[test]
    fn test_write_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let value_file = dir.path().join("roots.der");
        std::fs::write(&value_file, [0x30u8, 0x82, 0x00, 0xff]).unwrap();
        let db = dir.path().join("psm.db");
        let store = SqliteStore::new(&db);

        let outcome = write_record(&request("PkiRootCerts", ValueSource::File(value_file), db), embedded).unwrap();
        assert_eq!(outcome.value.as_str(), "308200ff");
        assert_eq!(dump_records(&store).unwrap()[0].key, 33);
    }

    #[test]
    fn test_invalid_key_leaves_no_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("psm.db");

        let err = write_record(
            &request("NoSuchKey", ValueSource::Literal("x".into()), db.clone()),
            |_: &Path| -> Box<dyn StoreGateway> { panic!("gateway opened for an unresolvable key") },
        )
        .unwrap_err();
        assert!(matches!(err, Error::KeyResolution(_)));
        assert!(!db.exists());
    }

    #[test]
    fn test_missing_value_file_leaves_no_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("psm.db");

        let err = write_record(
            &request("5", ValueSource::File(dir.path().join("missing.bin")), db.clone()),
            embedded,
        )
        .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { what: "Value file", .. }));
        assert!(!db.exists());
    }

    #[test]
    fn test_gateway_opened_on_request_db_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested/psm.db");

        let mut opened = None;
        write_record(&request("WiFiSSID", ValueSource::Literal("MyNet".into()), db.clone()), |path: &Path| {
            opened = Some(path.to_path_buf());
            embedded(path)
        })
        .unwrap();

        assert_eq!(opened, Some(db.clone()));
        assert!(db.is_file());
    }

    #[test]
    fn test_dump_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("absent.db"));
        assert!(matches!(
            dump_records(&store),
            Err(Error::FileNotFound { what: "DB file", .. })
        ));
    }
}
