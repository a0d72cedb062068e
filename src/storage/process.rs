//! External `sqlite3` engine
//!
//! Every operation spawns the configured `sqlite3` shell against the
//! database file, writes one statement to its stdin and waits for it to
//! exit. There is no timeout; a killed engine surfaces as a failed run.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, error, info};
use crate::encode::HexBlob;
use crate::{Error, Result};
use super::{schema, StoreGateway, StoredRecord};

/// Shell options: stop on the first error, no headers, `|` separated rows
const ENGINE_ARGS: &[&str] = &["-batch", "-bail", "-noheader", "-list", "-separator", "|"];

/// Gateway driving the `sqlite3` command-line shell
pub struct Sqlite3Process {
    program: PathBuf,
    db_path: PathBuf,
}

impl Sqlite3Process {
    pub fn new(program: impl Into<PathBuf>, db_path: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            db_path: db_path.into(),
        }
    }

    /// Run one statement, returning the engine's stdout
    fn run(&self, operation: &'static str, statement: &str) -> Result<String> {
        debug!("input_text: {}", statement);

        let mut child = Command::new(&self.program)
            .args(ENGINE_ARGS)
            .arg(&self.db_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.unavailable(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            let written = stdin
                .write_all(statement.as_bytes())
                .and_then(|_| stdin.write_all(b";\n"));
            // An engine that bails early closes its stdin; its exit status tells the story
            match written {
                Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e.into()),
                _ => {}
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            for line in String::from_utf8_lossy(&output.stderr).lines() {
                error!("{}", line);
            }
            return Err(Error::EngineExecution {
                operation,
                status: output.status.code(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn unavailable(&self, err: io::Error) -> Error {
        if err.kind() == io::ErrorKind::NotFound {
            Error::EngineUnavailable(format!("{} command not found", self.program.display()))
        } else {
            Error::EngineUnavailable(format!("failed to run {}: {}", self.program.display(), err))
        }
    }

    fn log_output(stdout: &str) {
        for line in stdout.trim().lines() {
            info!("{}", line);
        }
    }
}

impl StoreGateway for Sqlite3Process {
    fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn check_available(&self) -> Result<String> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.unavailable(e))?;

        if !output.status.success() {
            return Err(Error::EngineUnavailable(format!(
                "\"{} --version\" command failed",
                self.program.display()
            )));
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!("sqlite3 version: {}", version);
        Ok(version)
    }

    fn initialize(&self) -> Result<()> {
        let stdout = self.run("initialize", schema::CREATE_PSM_DATA_TABLE)?;
        Self::log_output(&stdout);
        Ok(())
    }

    fn upsert(&self, key: i64, value: &HexBlob) -> Result<()> {
        let stdout = self.run("update", &schema::upsert_statement(key, value))?;
        Self::log_output(&stdout);
        Ok(())
    }

    fn dump(&self) -> Result<Vec<StoredRecord>> {
        let stdout = self.run("dump content of", schema::SELECT_ALL_RECORDS)?;
        stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(parse_dump_row)
            .collect()
    }
}

/// Parse one `key|hex|type` line of dump output
pub fn parse_dump_row(line: &str) -> Result<StoredRecord> {
    let malformed = || Error::UnexpectedOutput(line.to_string());

    let mut fields = line.trim_end_matches('\r').splitn(3, '|');
    let key = fields
        .next()
        .and_then(|k| k.parse::<i64>().ok())
        .ok_or_else(malformed)?;
    let value = fields
        .next()
        .and_then(|v| HexBlob::parse(v).ok())
        .ok_or_else(malformed)?;
    let storage_type = fields.next().ok_or_else(malformed)?.to_string();

    Ok(StoredRecord { key, value, storage_type })
}
