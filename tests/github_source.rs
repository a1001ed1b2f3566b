use critpath::config::GitHubSection;
use critpath::errors::CritpathError;
use critpath::provider::github::JOBS_PER_PAGE;
use critpath::provider::{GitHubActionsSource, HistorySource};
use critpath_test_utils::builders::SamplesBuilder;
use critpath_test_utils::{init_tracing, with_timeout};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{Value, json};

const RUNS_PATH: &str = "/repos/o/r/actions/runs";

fn jobs_path(run_id: u64) -> String {
    format!("{RUNS_PATH}/{run_id}/jobs")
}

fn settings(server: &ServerGuard, pages: u32, per_page: u32) -> GitHubSection {
    let mut settings = GitHubSection::new("o", "r", "P");
    settings.api_base = server.url();
    settings.pages = pages;
    settings.per_page = per_page;
    settings
}

fn source(settings: &GitHubSection) -> GitHubActionsSource {
    GitHubActionsSource::with_token(settings, None).unwrap()
}

fn page(n: u32) -> Matcher {
    Matcher::UrlEncoded("page".into(), n.to_string())
}

fn runs(ids_and_names: &[(u64, &str)]) -> Value {
    let runs: Vec<Value> = ids_and_names
        .iter()
        .map(|(id, name)| json!({ "id": id, "name": name }))
        .collect();
    json!({ "total_count": runs.len(), "workflow_runs": runs })
}

/// A job named `name` that ran for `secs` seconds.
fn timed_job(name: &str, secs: u64) -> Value {
    json!({
        "name": name,
        "started_at": "2024-05-01T10:00:00Z",
        "completed_at": format!("2024-05-01T10:{:02}:{:02}Z", secs / 60, secs % 60),
    })
}

fn untimed_job(name: &str) -> Value {
    json!({ "name": name, "started_at": null, "completed_at": null })
}

fn jobs(total_count: usize, jobs: Vec<Value>) -> Value {
    json!({ "total_count": total_count, "jobs": jobs })
}

fn json_mock(server: &mut ServerGuard, path: &str, query: Matcher, body: Value) -> Mock {
    server
        .mock("GET", path)
        .match_query(query)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
}

fn status_mock(server: &mut ServerGuard, path: &str, query: Matcher, status: usize) -> Mock {
    server
        .mock("GET", path)
        .match_query(query)
        .with_status(status)
        .with_body(r#"{"message": "nope"}"#)
}

#[tokio::test]
async fn run_listing_stops_on_a_short_page() {
    init_tracing();
    let mut server = Server::new_async().await;
    let first = json_mock(
        &mut server,
        RUNS_PATH,
        Matcher::AllOf(vec![page(1), Matcher::UrlEncoded("per_page".into(), "2".into())]),
        runs(&[(1, "P"), (2, "Lint")]),
    )
    .create_async()
    .await;
    let second = json_mock(&mut server, RUNS_PATH, page(2), runs(&[(3, "P")])).create_async().await;
    let third = json_mock(&mut server, RUNS_PATH, page(3), runs(&[(4, "P")]))
        .expect(0)
        .create_async()
        .await;

    let source = source(&settings(&server, 3, 2));
    let ids = with_timeout(source.fetch_run_ids()).await.unwrap();

    assert_eq!(ids, vec![1, 3]);
    first.assert_async().await;
    second.assert_async().await;
    third.assert_async().await;
}

#[tokio::test]
async fn run_listing_stops_after_the_configured_pages() {
    init_tracing();
    let mut server = Server::new_async().await;
    let first = json_mock(&mut server, RUNS_PATH, page(1), runs(&[(1, "P")])).create_async().await;
    let second = json_mock(&mut server, RUNS_PATH, page(2), runs(&[(2, "P")])).create_async().await;
    let third = json_mock(&mut server, RUNS_PATH, page(3), runs(&[(3, "P")]))
        .expect(0)
        .create_async()
        .await;

    let source = source(&settings(&server, 2, 1));
    let ids = with_timeout(source.fetch_run_ids()).await.unwrap();

    assert_eq!(ids, vec![1, 2]);
    first.assert_async().await;
    second.assert_async().await;
    third.assert_async().await;
}

#[tokio::test]
async fn failed_run_page_is_skipped() {
    init_tracing();
    let mut server = Server::new_async().await;
    let first = status_mock(&mut server, RUNS_PATH, page(1), 500).create_async().await;
    let second = json_mock(&mut server, RUNS_PATH, page(2), runs(&[(7, "P")])).create_async().await;

    let source = source(&settings(&server, 2, 1));
    let ids = with_timeout(source.fetch_run_ids()).await.unwrap();

    assert_eq!(ids, vec![7]);
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn job_pages_are_followed_until_total_count() {
    init_tracing();
    let mut server = Server::new_async().await;
    let full_page: Vec<Value> = (0..JOBS_PER_PAGE)
        .map(|i| timed_job(&format!("job{i}"), 1))
        .collect();
    let first = json_mock(
        &mut server,
        &jobs_path(9),
        Matcher::AllOf(vec![page(1), Matcher::UrlEncoded("per_page".into(), "100".into())]),
        jobs(JOBS_PER_PAGE as usize + 1, full_page),
    )
    .create_async()
    .await;
    let second = json_mock(
        &mut server,
        &jobs_path(9),
        page(2),
        jobs(JOBS_PER_PAGE as usize + 1, vec![timed_job("last", 5)]),
    )
    .create_async()
    .await;

    let source = source(&settings(&server, 1, 10));
    let fetched = with_timeout(source.fetch_run_jobs(9)).await.unwrap().unwrap();

    assert_eq!(fetched.len(), JOBS_PER_PAGE as usize + 1);
    assert_eq!(fetched.last().map(|job| job.name.as_str()), Some("last"));
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn full_job_page_that_reaches_total_count_ends_the_listing() {
    init_tracing();
    let mut server = Server::new_async().await;
    let full_page: Vec<Value> = (0..JOBS_PER_PAGE)
        .map(|i| timed_job(&format!("job{i}"), 1))
        .collect();
    let first = json_mock(
        &mut server,
        &jobs_path(9),
        page(1),
        jobs(JOBS_PER_PAGE as usize, full_page),
    )
    .create_async()
    .await;
    let second = json_mock(&mut server, &jobs_path(9), page(2), jobs(0, Vec::new()))
        .expect(0)
        .create_async()
        .await;

    let source = source(&settings(&server, 1, 10));
    let fetched = with_timeout(source.fetch_run_jobs(9)).await.unwrap().unwrap();

    assert_eq!(fetched.len(), JOBS_PER_PAGE as usize);
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn refused_job_listing_skips_the_run() {
    init_tracing();
    let mut server = Server::new_async().await;
    let refused = status_mock(&mut server, &jobs_path(9), Matcher::Any, 403).create_async().await;

    let source = source(&settings(&server, 1, 10));
    let fetched = with_timeout(source.fetch_run_jobs(9)).await.unwrap();

    assert!(fetched.is_none());
    refused.assert_async().await;
}

#[tokio::test]
async fn samples_are_collected_from_the_runs_that_answered() {
    init_tracing();
    let mut server = Server::new_async().await;
    json_mock(&mut server, RUNS_PATH, page(1), runs(&[(1, "P"), (2, "P"), (3, "Lint")]))
        .create_async()
        .await;
    json_mock(
        &mut server,
        &jobs_path(1),
        page(1),
        jobs(2, vec![timed_job("build", 90), timed_job("test", 30)]),
    )
    .create_async()
    .await;
    status_mock(&mut server, &jobs_path(2), Matcher::Any, 500).create_async().await;
    let other_workflow = json_mock(&mut server, &jobs_path(3), Matcher::Any, jobs(0, Vec::new()))
        .expect(0)
        .create_async()
        .await;

    let source = source(&settings(&server, 1, 10));
    let samples = with_timeout(source.fetch_samples()).await.unwrap();

    assert_eq!(
        samples,
        SamplesBuilder::new().job("build", &[90]).job("test", &[30]).build()
    );
    other_workflow.assert_async().await;
}

#[tokio::test]
async fn answered_run_without_timed_jobs_keeps_the_fetch_alive() {
    init_tracing();
    let mut server = Server::new_async().await;
    json_mock(&mut server, RUNS_PATH, page(1), runs(&[(1, "P"), (2, "P")])).create_async().await;
    json_mock(&mut server, &jobs_path(1), page(1), jobs(1, vec![untimed_job("build")]))
        .create_async()
        .await;
    status_mock(&mut server, &jobs_path(2), Matcher::Any, 500).create_async().await;

    let source = source(&settings(&server, 1, 10));
    let samples = with_timeout(source.fetch_samples()).await.unwrap();

    assert!(samples.is_empty());
}

#[tokio::test]
async fn every_run_refused_is_a_provider_error() {
    init_tracing();
    let mut server = Server::new_async().await;
    json_mock(&mut server, RUNS_PATH, page(1), runs(&[(1, "P"), (2, "P")])).create_async().await;
    status_mock(&mut server, &jobs_path(1), Matcher::Any, 500).create_async().await;
    status_mock(&mut server, &jobs_path(2), Matcher::Any, 502).create_async().await;

    let source = source(&settings(&server, 1, 10));
    match with_timeout(source.fetch_samples()).await {
        Err(CritpathError::Provider(msg)) => assert!(msg.contains("2 runs skipped"), "{msg}"),
        other => panic!("Expected Provider error, got: {:?}", other),
    }
}

#[tokio::test]
async fn no_matching_runs_yields_empty_samples() {
    init_tracing();
    let mut server = Server::new_async().await;
    json_mock(&mut server, RUNS_PATH, page(1), runs(&[(1, "Lint")])).create_async().await;

    let source = source(&settings(&server, 1, 10));
    let samples = with_timeout(source.fetch_samples()).await.unwrap();

    assert!(samples.is_empty());
}

#[tokio::test]
async fn bearer_token_is_sent_when_configured() {
    init_tracing();
    let mut server = Server::new_async().await;
    let authed = server
        .mock("GET", RUNS_PATH)
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer s3cret")
        .match_header("accept", "application/vnd.github+json")
        .with_status(200)
        .with_body(runs(&[]).to_string())
        .create_async()
        .await;

    let settings = settings(&server, 1, 10);
    let source = GitHubActionsSource::with_token(&settings, Some("s3cret".to_string())).unwrap();
    let ids = with_timeout(source.fetch_run_ids()).await.unwrap();

    assert!(ids.is_empty());
    authed.assert_async().await;
}

#[tokio::test]
async fn no_authorization_header_without_a_token() {
    init_tracing();
    let mut server = Server::new_async().await;
    let anonymous = server
        .mock("GET", RUNS_PATH)
        .match_query(Matcher::Any)
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(runs(&[]).to_string())
        .create_async()
        .await;

    let source = source(&settings(&server, 1, 10));
    let ids = with_timeout(source.fetch_run_ids()).await.unwrap();

    assert!(ids.is_empty());
    anonymous.assert_async().await;
}
