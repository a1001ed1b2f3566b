// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `critpath`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "critpath",
    version,
    about = "Estimate the critical path of a CI pipeline from historical job durations.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// If omitted, `Critpath.toml` in the current working directory is used
    /// when present. A file named here must exist.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Workflow YAML declaring the jobs; overrides `[pipeline].workflow_file`.
    #[arg(long, value_name = "PATH")]
    pub workflow_file: Option<String>,

    /// Read raw duration samples from this JSON file instead of the GitHub API.
    #[arg(long, value_name = "PATH", conflicts_with = "save_samples")]
    pub samples: Option<String>,

    /// Write the fetched raw samples to this JSON file for later `--samples` runs.
    #[arg(long, value_name = "PATH")]
    pub save_samples: Option<String>,

    /// Print the result as JSON instead of a text report.
    #[arg(long)]
    pub json: bool,

    /// Parse the workflow and print the dependency graph; fetch nothing.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// Applies to critpath's own events; dependencies stay at `warn`. If
    /// omitted, `CRITPATH_LOG` or a default filter will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
