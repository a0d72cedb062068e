use anyhow::Context;
use psm_db::app::{dump_records, write_record};
use psm_db::storage::open_gateway;
use psm_db::ui::{self, Icons};
use psm_db::{EngineKind, KeyRegistry, WriteRequest};
use std::path::Path;

pub fn run_show_keys() {
    ui::header("Available keys:");
    print!("{}", ui::key_table(&KeyRegistry, ui::theme()));
}

pub fn run_show_db(db_file: Option<&Path>, engine: EngineKind, sqlite3: &Path) -> anyhow::Result<()> {
    let Some(db_file) = db_file else {
        return Err(psm_db::Error::Usage(vec!["--db-file must be specified".to_string()]).into());
    };

    let gateway = open_gateway(engine, sqlite3, db_file);
    let records = dump_records(gateway.as_ref()).context("Failed to show DB")?;

    ui::section(
        Icons::DATABASE,
        &format!("{} ({} records, {} engine)", db_file.display(), records.len(), engine),
    );
    if !records.is_empty() {
        println!("{}", ui::record_table(&records));
    }
    Ok(())
}

pub fn run_write(request: &WriteRequest, engine: EngineKind, sqlite3: &Path) -> anyhow::Result<()> {
    let outcome = write_record(request, |db_file| open_gateway(engine, sqlite3, db_file))
        .context("Failed to update DB")?;

    if outcome.created {
        ui::section(Icons::NEW, &format!("Created {}", request.db_file.display()));
    }
    ui::success(&format!(
        "{} {} = {} bytes",
        Icons::KEY,
        outcome.key,
        outcome.value.byte_len()
    ));
    Ok(())
}
