//! psm-db CLI - seed and inspect Platform Storage Manager databases

use clap::{CommandFactory, Parser};
use psm_db::config::{self, PsmConfig, DEFAULT_SQLITE3};
use psm_db::logging::{self, LogOptions};
use psm_db::EngineKind;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "psm-db")]
#[command(version)]
#[command(about = "Seed or inspect a PSM (Platform Storage Manager) settings database")]
#[command(long_about = r#"
Writes one value into the psm_data table of a device settings database,
creating the database if it does not exist yet.

Example usage:
  psm-db --key WiFiSSID --value MyNet --db-file psm.db
  psm-db --key PkiRootCerts --value-file roots.pem --db-file psm.db
  psm-db --show-db --db-file psm.db
  psm-db --show-keys
"#)]
struct Cli {
    /// Key to be set: full name, name without the PlStorageData prefix, or an integer
    #[arg(long, allow_negative_numbers = true)]
    key: Option<String>,

    /// Value to be set (exactly one of --value / --value-file)
    #[arg(long, allow_negative_numbers = true)]
    value: Option<String>,

    /// File containing the value to be set (exactly one of --value / --value-file)
    #[arg(long, value_name = "PATH")]
    value_file: Option<PathBuf>,

    /// DB file to be updated or shown
    #[arg(long, value_name = "PATH")]
    db_file: Option<PathBuf>,

    /// Show the content of the DB file
    #[arg(long)]
    show_db: bool,

    /// Show all available keys
    #[arg(long)]
    show_keys: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to log file (always written at debug level)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Database engine
    #[arg(long, value_enum)]
    engine: Option<EngineKind>,

    /// sqlite3 executable used by the sqlite3 engine
    #[arg(long, value_name = "PATH")]
    sqlite3: Option<PathBuf>,

    /// Config file (defaults to ./psm-db.toml when present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Command line merged over the config file
#[derive(Debug)]
struct Settings {
    key: Option<String>,
    value: Option<String>,
    value_file: Option<PathBuf>,
    db_file: Option<PathBuf>,
    show_db: bool,
    engine: EngineKind,
    sqlite3: PathBuf,
    log: LogOptions,
}

impl Settings {
    fn merge(cli: Cli, file: PsmConfig) -> Self {
        Self {
            key: cli.key,
            value: cli.value,
            value_file: cli.value_file,
            db_file: cli.db_file.or(file.db_file),
            show_db: cli.show_db,
            engine: cli.engine.or(file.engine).unwrap_or_default(),
            sqlite3: cli
                .sqlite3
                .or(file.sqlite3)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SQLITE3)),
            log: LogOptions {
                verbose: cli.verbose || file.verbose.unwrap_or(false),
                log_file: cli.log_file.or(file.log_file),
            },
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version come through here too
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    if cli.show_keys {
        commands::run_show_keys();
        return ExitCode::SUCCESS;
    }

    let file_config = match config::load_config(cli.config.as_deref()) {
        Ok(found) => found.unwrap_or_default(),
        Err(e) => {
            eprintln!("[ERROR] {e}");
            return ExitCode::FAILURE;
        }
    };
    let settings = Settings::merge(cli, file_config);

    let _guard = match logging::init(&settings.log) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("[ERROR] failed to set up logging: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!("settings: {:?}", settings);

    match run(settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(settings: Settings) -> anyhow::Result<()> {
    if settings.show_db {
        return commands::run_show_db(settings.db_file.as_deref(), settings.engine, &settings.sqlite3);
    }

    let request = psm_db::WriteRequest::from_parts(
        settings.key,
        settings.value,
        settings.value_file,
        settings.db_file,
    )?;
    commands::run_write(&request, settings.engine, &settings.sqlite3)
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<psm_db::Error>() {
        Some(psm_db::Error::Usage(problems)) => {
            for problem in problems {
                tracing::error!("{}", problem);
            }
            let _ = Cli::command().print_help();
        }
        Some(psm_db::Error::KeyResolution(_)) => {
            tracing::error!("{:#}", err);
            tracing::error!("Use --show-keys to see all available keys");
        }
        _ => tracing::error!("{:#}", err),
    }
}
