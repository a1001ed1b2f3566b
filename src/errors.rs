// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CritpathError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CI provider error: {0}")]
    Provider(String),

    /// The traversal drained its queue while these jobs still had
    /// unresolved dependents. `cycles` lists the strongly connected groups
    /// that caused it.
    #[error("Cycle detected in job graph; unresolved jobs: {}", unresolved.join(", "))]
    CyclicGraph {
        unresolved: Vec<String>,
        cycles: Vec<Vec<String>>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, CritpathError>;
