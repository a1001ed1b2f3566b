// src/config/validate.rs

use crate::config::model::{ConfigFile, GitHubSection, PipelineSection, RawConfigFile};
use crate::errors::{CritpathError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::CritpathError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.github, raw.pipeline))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    if let Some(github) = &cfg.github {
        validate_github(github)?;
    }
    validate_pipeline(&cfg.pipeline)?;
    Ok(())
}

fn config_error(msg: impl Into<String>) -> CritpathError {
    CritpathError::ConfigError(msg.into())
}

fn ensure_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(config_error(format!("[github].{field} must not be empty")));
    }
    Ok(())
}

fn validate_github(gh: &GitHubSection) -> Result<()> {
    ensure_non_empty("owner", &gh.owner)?;
    ensure_non_empty("repo", &gh.repo)?;
    ensure_non_empty("workflow_name", &gh.workflow_name)?;
    ensure_non_empty("token_env", &gh.token_env)?;

    if gh.pages == 0 {
        return Err(config_error("[github].pages must be >= 1 (got 0)"));
    }

    if !(1..=100).contains(&gh.per_page) {
        return Err(config_error(format!(
            "[github].per_page must be between 1 and 100 (got {})",
            gh.per_page
        )));
    }

    if gh.timeout_secs == 0 {
        return Err(config_error("[github].timeout_secs must be >= 1 (got 0)"));
    }

    if !(gh.api_base.starts_with("https://") || gh.api_base.starts_with("http://")) {
        return Err(config_error(format!(
            "[github].api_base must be an http(s) URL (got '{}')",
            gh.api_base
        )));
    }

    Ok(())
}

fn validate_pipeline(pipeline: &PipelineSection) -> Result<()> {
    if let Some(path) = &pipeline.workflow_file {
        if path.trim().is_empty() {
            return Err(config_error("[pipeline].workflow_file must not be empty"));
        }
    }
    Ok(())
}
