// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [github]
/// owner = "WATonomous"
/// repo = "infra-config"
/// workflow_name = "Provision"
/// pages = 2
///
/// [pipeline]
/// workflow_file = ".github/workflows/provision.yml"
/// ```
///
/// Both sections are optional. `[github]` is only needed when samples are
/// fetched from the API rather than read from a file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub github: Option<GitHubSection>,

    #[serde(default)]
    pub pipeline: PipelineSection,
}

/// Validated configuration. Construct via `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub github: Option<GitHubSection>,
    pub pipeline: PipelineSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(github: Option<GitHubSection>, pipeline: PipelineSection) -> Self {
        Self { github, pipeline }
    }
}

/// `[github]` section: where historical runs are fetched from.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubSection {
    pub owner: String,
    pub repo: String,

    /// Runs are kept only if their `name` matches this exactly. The runs
    /// endpoint cannot filter by workflow name server-side.
    pub workflow_name: String,

    /// Number of run-list pages to scan.
    #[serde(default = "default_pages")]
    pub pages: u32,

    /// Page size for both runs and jobs listings (GitHub caps this at 100).
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Environment variable holding the API token. A missing variable means
    /// unauthenticated requests.
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_pages() -> u32 {
    2
}

fn default_per_page() -> u32 {
    100
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl GitHubSection {
    /// A section with every optional field at its default.
    pub fn new(owner: &str, repo: &str, workflow_name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            workflow_name: workflow_name.to_string(),
            pages: default_pages(),
            per_page: default_per_page(),
            api_base: default_api_base(),
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineSection {
    /// Workflow YAML that declares the jobs and their `needs`.
    #[serde(default)]
    pub workflow_file: Option<String>,
}
