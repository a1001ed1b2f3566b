// src/provider/github.rs

//! Historical job timings from the GitHub Actions REST API.
//!
//! Two passes:
//! 1. scan `pages` pages of `/actions/runs`, keeping the ids of runs whose
//!    name equals the configured workflow name;
//! 2. list `/actions/runs/{id}/jobs` for each kept run and turn every job
//!    with both timestamps into one duration sample.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::GitHubSection;
use crate::durations::RawSamples;
use crate::errors::{CritpathError, Result};
use crate::provider::HistorySource;

const USER_AGENT: &str = concat!("critpath/", env!("CARGO_PKG_VERSION"));

/// Page size for `/actions/runs/{id}/jobs`; the API maximum.
pub const JOBS_PER_PAGE: u32 = 100;

/// One page of `GET /repos/{owner}/{repo}/actions/runs`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRunsPage {
    #[serde(default)]
    pub workflow_runs: Vec<WorkflowRun>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

/// One page of `GET /repos/{owner}/{repo}/actions/runs/{id}/jobs`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowJobsPage {
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub jobs: Vec<JobRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobRecord {
    pub name: String,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Ids of the runs that belong to `workflow_name`, in listing order.
pub fn matching_run_ids(runs: &[WorkflowRun], workflow_name: &str) -> Vec<u64> {
    runs.iter()
        .filter(|run| run.name.as_deref() == Some(workflow_name))
        .map(|run| run.id)
        .collect()
}

/// Whole seconds between `started_at` and `completed_at`.
///
/// `None` if either timestamp is missing. A completion before the start
/// (clock skew on the provider side) counts as `0`.
pub fn job_duration_secs(job: &JobRecord) -> Option<u64> {
    let (start, end) = (job.started_at?, job.completed_at?);
    Some(u64::try_from((end - start).num_seconds()).unwrap_or(0))
}

/// Append one sample per timed job to `samples`.
pub fn record_job_samples(samples: &mut RawSamples, jobs: &[JobRecord]) {
    for job in jobs {
        match job_duration_secs(job) {
            Some(secs) => samples.entry(job.name.clone()).or_default().push(secs),
            None => debug!(job = %job.name, "job has no start/end timestamps; no sample"),
        }
    }
}

/// [`HistorySource`] backed by the GitHub Actions API.
#[derive(Debug, Clone)]
pub struct GitHubActionsSource {
    client: reqwest::Client,
    settings: GitHubSection,
    token: Option<String>,
}

impl GitHubActionsSource {
    /// Build a source from config, reading the token from `settings.token_env`.
    pub fn from_settings(settings: &GitHubSection) -> Result<Self> {
        let token = std::env::var(&settings.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty());
        if token.is_none() {
            warn!(
                env = %settings.token_env,
                "no GitHub token found; using unauthenticated requests (low rate limit)"
            );
        }
        Self::with_token(settings, token)
    }

    pub fn with_token(settings: &GitHubSection, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            settings: settings.clone(),
            token,
        })
    }

    fn repo_url(&self) -> String {
        format!(
            "{}/repos/{}/{}",
            self.settings.api_base.trim_end_matches('/'),
            self.settings.owner,
            self.settings.repo
        )
    }

    pub fn runs_url(&self) -> String {
        format!("{}/actions/runs", self.repo_url())
    }

    pub fn jobs_url(&self, run_id: u64) -> String {
        format!("{}/actions/runs/{}/jobs", self.repo_url(), run_id)
    }

    fn get(&self, url: &str, per_page: u32, page: u32) -> RequestBuilder {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .query(&[("per_page", per_page), ("page", page)]);

        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// Ids of recent runs of the configured workflow.
    pub async fn fetch_run_ids(&self) -> Result<Vec<u64>> {
        let url = self.runs_url();
        let mut run_ids = Vec::new();

        for page in 1..=self.settings.pages {
            let response = self.get(&url, self.settings.per_page, page).send().await?;
            if !response.status().is_success() {
                log_failed_response(&response, "failed to retrieve workflow runs page");
                continue;
            }

            let body: WorkflowRunsPage = response.json().await?;
            let matched = matching_run_ids(&body.workflow_runs, &self.settings.workflow_name);
            debug!(
                page,
                runs = body.workflow_runs.len(),
                matched = matched.len(),
                "scanned workflow runs page"
            );
            run_ids.extend(matched);

            if body.workflow_runs.len() < self.settings.per_page as usize {
                break;
            }
        }

        info!(
            workflow = %self.settings.workflow_name,
            runs = run_ids.len(),
            "found matching workflow runs"
        );
        Ok(run_ids)
    }

    /// All jobs of one run, or `None` if GitHub refused the request.
    pub async fn fetch_run_jobs(&self, run_id: u64) -> Result<Option<Vec<JobRecord>>> {
        let url = self.jobs_url(run_id);
        let mut jobs = Vec::new();
        let mut page = 1;

        loop {
            let response = self.get(&url, JOBS_PER_PAGE, page).send().await?;
            if !response.status().is_success() {
                log_failed_response(&response, "failed to retrieve jobs for run; skipping run");
                return Ok(None);
            }

            let body: WorkflowJobsPage = response.json().await?;
            let received = body.jobs.len();
            jobs.extend(body.jobs);

            let reached_total = body
                .total_count
                .is_some_and(|total| jobs.len() as u64 >= total);
            if received < JOBS_PER_PAGE as usize || reached_total {
                break;
            }
            page += 1;
        }

        debug!(run_id, jobs = jobs.len(), "fetched jobs for run");
        Ok(Some(jobs))
    }

    async fn collect_samples(&self) -> Result<RawSamples> {
        let run_ids = self.fetch_run_ids().await?;
        if run_ids.is_empty() {
            warn!(
                workflow = %self.settings.workflow_name,
                "no runs found for workflow; every job will weigh 0"
            );
        }

        let total_runs = run_ids.len();
        let mut samples = RawSamples::new();
        let mut skipped = 0usize;
        for run_id in run_ids {
            match self.fetch_run_jobs(run_id).await? {
                Some(jobs) => record_job_samples(&mut samples, &jobs),
                None => skipped += 1,
            }
        }

        // Runs that answered with only untimed jobs still count as answered.
        if total_runs > 0 && skipped == total_runs {
            return Err(CritpathError::Provider(format!(
                "every job listing request failed ({skipped} runs skipped)"
            )));
        }

        info!(jobs = samples.len(), skipped_runs = skipped, "collected job duration samples");
        Ok(samples)
    }
}

impl HistorySource for GitHubActionsSource {
    fn fetch_samples(&self) -> Pin<Box<dyn Future<Output = Result<RawSamples>> + Send + '_>> {
        Box::pin(self.collect_samples())
    }
}

fn log_failed_response(response: &Response, msg: &str) {
    let status = response.status();
    let rate_limited = matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS)
        && response
            .headers()
            .get("x-ratelimit-remaining")
            .is_some_and(|v| v.as_bytes() == b"0");

    warn!(url = %response.url(), %status, rate_limited, "{msg}");
}
