//! Logging setup
//!
//! Console output goes to stderr at INFO (DEBUG when verbose). An optional
//! log file always receives DEBUG and is truncated on every run.

use crate::config::ensure_parent_dir;
use crate::Result;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub verbose: bool,
    pub log_file: Option<PathBuf>,
}

/// Keeps the subscriber installed for the current invocation
pub struct LogGuard {
    _default: DefaultGuard,
}

/// Build the subscriber and install it as the default for this thread
pub fn init(options: &LogOptions) -> Result<LogGuard> {
    let console_filter = if options.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(console::Term::stderr().is_term())
        .with_target(false)
        .without_time()
        .with_filter(console_filter);

    let file_layer = match &options.log_file {
        Some(path) => {
            ensure_parent_dir(path)?;
            let file = File::create(path)?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        None => None,
    };

    let subscriber = tracing_subscriber::registry().with(console_layer).with(file_layer);
    Ok(LogGuard {
        _default: tracing::subscriber::set_default(subscriber),
    })
}
