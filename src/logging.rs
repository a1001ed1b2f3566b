// src/logging.rs

//! Logging setup for `critpath` using `tracing` + `tracing-subscriber`.
//!
//! Filter selection, first match wins:
//! 1. `--log-level` CLI flag, applied to critpath only
//! 2. `CRITPATH_LOG` environment variable, as `EnvFilter` directives
//!    (e.g. `debug` or `critpath::dag=trace,reqwest=debug`)
//! 3. [`DEFAULT_DIRECTIVES`]
//!
//! Logs go to STDERR; stdout carries only the report.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "CRITPATH_LOG";

/// Our own events at `info`; the HTTP stack only when something is wrong.
pub const DEFAULT_DIRECTIVES: &str = "info,hyper=warn,hyper_util=warn,reqwest=warn";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let directives = resolve_directives(cli_level, std::env::var(LOG_ENV_VAR).ok());
    let filter = EnvFilter::try_new(&directives)
        .with_context(|| format!("invalid log filter {directives:?}"))?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Pick the filter directives for the given flag and environment value.
pub fn resolve_directives(cli_level: Option<LogLevel>, env_value: Option<String>) -> String {
    if let Some(lvl) = cli_level {
        return format!("warn,critpath={}", lvl.as_str());
    }
    env_value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_DIRECTIVES.to_string())
}
