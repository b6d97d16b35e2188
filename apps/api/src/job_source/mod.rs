//! External job source client. Runs the LinkedIn job scraper actor on Apify.
//!
//! Each keyword goes through three phases: start a run, poll it until it
//! finishes, then fetch the run's dataset. `JobSource::search` folds every
//! failure into an empty result so one bad keyword never sinks a match request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod types;

pub use types::RawJobListing;
use types::{ApiResponse, JobScraperInput, RunData, RunPhase};

const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum JobSourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Run {run_id} finished with status {status}")]
    RunFailed { run_id: String, status: String },

    #[error("Run {run_id} still unfinished after {attempts} polls")]
    PollExhausted { run_id: String, attempts: u32 },

    #[error("Run {run_id} succeeded without a dataset")]
    MissingDataset { run_id: String },
}

pub type Result<T> = std::result::Result<T, JobSourceError>;

/// Provider settings, passed in explicitly at construction.
#[derive(Debug, Clone)]
pub struct JobSourceConfig {
    pub base_url: String,
    pub actor_id: String,
    pub token: String,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
}

/// Source of raw job listings for a search keyword.
///
/// Implementations never fail: errors are logged and yield an empty list.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn search(&self, keyword: &str) -> Vec<RawJobListing>;
}

#[derive(Clone)]
pub struct ApifyJobSource {
    client: Client,
    config: JobSourceConfig,
}

impl ApifyJobSource {
    pub fn new(config: JobSourceConfig) -> Result<Self> {
        let client = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    /// Starts a scrape run for `keyword`. Returns immediately with run metadata.
    pub async fn start_run(&self, keyword: &str) -> Result<RunData> {
        let url = format!(
            "{}/acts/{}/runs",
            self.config.base_url, self.config.actor_id
        );
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(&JobScraperInput::for_keyword(keyword))
            .send()
            .await?;

        let api_resp: ApiResponse<RunData> = ensure_success(resp).await?.json().await?;
        Ok(api_resp.data)
    }

    /// Polls a run every `poll_interval` until it leaves the pending states,
    /// giving up after `max_poll_attempts` status reads (at least one).
    pub async fn wait_for_run(&self, run_id: &str) -> Result<RunData> {
        let url = format!("{}/actor-runs/{}", self.config.base_url, run_id);
        let max_attempts = self.config.max_poll_attempts.max(1);

        for attempt in 1..=max_attempts {
            let resp = self
                .client
                .get(&url)
                .bearer_auth(&self.config.token)
                .send()
                .await?;
            let api_resp: ApiResponse<RunData> = ensure_success(resp).await?.json().await?;
            let run = api_resp.data;

            match RunPhase::from_status(&run.status) {
                RunPhase::Succeeded => return Ok(run),
                RunPhase::Failed => {
                    return Err(JobSourceError::RunFailed {
                        run_id: run.id,
                        status: run.status,
                    })
                }
                RunPhase::Pending => {
                    debug!(run_id, attempt, status = %run.status, "Run still in progress");
                    if attempt < max_attempts {
                        tokio::time::sleep(self.config.poll_interval).await;
                    }
                }
            }
        }

        Err(JobSourceError::PollExhausted {
            run_id: run_id.to_string(),
            attempts: max_attempts,
        })
    }

    /// Fetches every item of a dataset as a single page.
    pub async fn get_dataset_items(&self, dataset_id: &str) -> Result<Vec<RawJobListing>> {
        let url = format!("{}/datasets/{}/items", self.config.base_url, dataset_id);
        let resp = self
            .client
            .get(&url)
            .query(&[("format", "json")])
            .bearer_auth(&self.config.token)
            .send()
            .await?;

        let items: Vec<RawJobListing> = ensure_success(resp).await?.json().await?;
        Ok(items)
    }

    /// Runs the full trigger -> poll -> fetch cycle for one keyword.
    pub async fn fetch_listings(&self, keyword: &str) -> Result<Vec<RawJobListing>> {
        let run = self.start_run(keyword).await?;
        info!(keyword, run_id = %run.id, "Apify run started, polling for completion");

        let completed = self.wait_for_run(&run.id).await?;
        let dataset_id = completed
            .default_dataset_id
            .ok_or_else(|| JobSourceError::MissingDataset {
                run_id: completed.id.clone(),
            })?;

        let listings = self.get_dataset_items(&dataset_id).await?;
        info!(keyword, dataset_id = %dataset_id, count = listings.len(), "Fetched job listings");
        Ok(listings)
    }
}

#[async_trait]
impl JobSource for ApifyJobSource {
    async fn search(&self, keyword: &str) -> Vec<RawJobListing> {
        match self.fetch_listings(keyword).await {
            Ok(listings) => listings,
            Err(e) => {
                warn!(keyword, "Job source lookup failed, treating as no results: {e}");
                Vec::new()
            }
        }
    }
}

async fn ensure_success(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(JobSourceError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    const ACTOR: &str = "test-actor";
    const TOKEN: &str = "test-token";

    fn source_for(server: &mockito::ServerGuard, max_poll_attempts: u32) -> ApifyJobSource {
        ApifyJobSource::new(JobSourceConfig {
            base_url: server.url(),
            actor_id: ACTOR.to_string(),
            token: TOKEN.to_string(),
            poll_interval: Duration::from_millis(5),
            max_poll_attempts,
        })
        .unwrap()
    }

    fn run_body(status: &str) -> String {
        json!({ "data": { "id": "run-1", "status": status, "defaultDatasetId": "abc123" } })
            .to_string()
    }

    async fn mock_start(server: &mut mockito::ServerGuard) -> mockito::Mock {
        server
            .mock("POST", format!("/acts/{ACTOR}/runs").as_str())
            .match_header("authorization", format!("Bearer {TOKEN}").as_str())
            .match_body(Matcher::PartialJson(json!({
                "query": "rust",
                "location": ["Worldwide"],
                "maxJobs": 10
            })))
            .with_status(201)
            .with_body(run_body("READY"))
            .create_async()
            .await
    }

    async fn mock_status(server: &mut mockito::ServerGuard, status: &str) -> mockito::Mock {
        server
            .mock("GET", "/actor-runs/run-1")
            .with_status(200)
            .with_body(run_body(status))
            .expect(1)
            .create_async()
            .await
    }

    fn dataset_items() -> serde_json::Value {
        json!([
            {
                "title": "Rust Developer",
                "company": "Acme",
                "location": "Remote",
                "url": "https://jobs.example/1",
                "description": "Build services in rust",
                "salary": "competitive"
            },
            { "title": "Backend Engineer", "link": "https://jobs.example/2" }
        ])
    }

    #[tokio::test]
    async fn test_queued_running_succeeded_returns_dataset_items_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let start = mock_start(&mut server).await;
        let queued = mock_status(&mut server, "READY").await;
        let running = mock_status(&mut server, "RUNNING").await;
        let succeeded = mock_status(&mut server, "SUCCEEDED").await;
        let dataset = server
            .mock("GET", "/datasets/abc123/items")
            .match_query(Matcher::UrlEncoded("format".into(), "json".into()))
            .with_status(200)
            .with_body(dataset_items().to_string())
            .create_async()
            .await;

        let listings = source_for(&server, 10).search("rust").await;

        start.assert_async().await;
        queued.assert_async().await;
        running.assert_async().await;
        succeeded.assert_async().await;
        dataset.assert_async().await;

        let expected: Vec<RawJobListing> = serde_json::from_value(dataset_items()).unwrap();
        assert_eq!(listings, expected);
        assert_eq!(listings[0].0["salary"], "competitive");
        assert_eq!(listings[1].link(), Some("https://jobs.example/2"));
    }

    #[tokio::test]
    async fn test_failed_run_yields_no_results_and_skips_fetch() {
        let mut server = mockito::Server::new_async().await;
        let _start = mock_start(&mut server).await;
        let _failed = mock_status(&mut server, "FAILED").await;
        let dataset = server
            .mock("GET", "/datasets/abc123/items")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let source = source_for(&server, 10);
        let err = source.wait_for_run("run-1").await.unwrap_err();
        assert!(matches!(err, JobSourceError::RunFailed { ref status, .. } if status == "FAILED"));

        let _failed_again = mock_status(&mut server, "FAILED").await;
        assert!(source.search("rust").await.is_empty());
        dataset.assert_async().await;
    }

    #[tokio::test]
    async fn test_start_error_is_absorbed_by_search() {
        let mut server = mockito::Server::new_async().await;
        let _start = server
            .mock("POST", format!("/acts/{ACTOR}/runs").as_str())
            .with_status(401)
            .with_body(r#"{"error":{"type":"user-or-token-not-found"}}"#)
            .expect(2)
            .create_async()
            .await;

        let source = source_for(&server, 10);
        let err = source.fetch_listings("rust").await.unwrap_err();
        assert!(matches!(err, JobSourceError::Api { status: 401, .. }));
        assert!(source.search("rust").await.is_empty());
    }

    #[tokio::test]
    async fn test_status_server_error_is_absorbed_by_search() {
        let mut server = mockito::Server::new_async().await;
        let _start = mock_start(&mut server).await;
        let status = server
            .mock("GET", "/actor-runs/run-1")
            .with_status(500)
            .with_body("internal error")
            .expect(1)
            .create_async()
            .await;
        let dataset = server
            .mock("GET", "/datasets/abc123/items")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        assert!(source_for(&server, 10).search("rust").await.is_empty());
        status.assert_async().await;
        dataset.assert_async().await;
    }

    #[tokio::test]
    async fn test_dataset_server_error_is_absorbed_by_search() {
        let mut server = mockito::Server::new_async().await;
        let _start = mock_start(&mut server).await;
        let _succeeded = mock_status(&mut server, "SUCCEEDED").await;
        let dataset = server
            .mock("GET", "/datasets/abc123/items")
            .match_query(Matcher::UrlEncoded("format".into(), "json".into()))
            .with_status(500)
            .with_body("dataset unavailable")
            .expect(1)
            .create_async()
            .await;

        let source = source_for(&server, 10);
        assert!(source.search("rust").await.is_empty());
        dataset.assert_async().await;

        let err = source.get_dataset_items("abc123").await.unwrap_err();
        assert!(matches!(err, JobSourceError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_poll_loop_gives_up_after_max_attempts() {
        let mut server = mockito::Server::new_async().await;
        let running = server
            .mock("GET", "/actor-runs/run-1")
            .with_status(200)
            .with_body(run_body("RUNNING"))
            .expect(3)
            .create_async()
            .await;

        let err = source_for(&server, 3)
            .wait_for_run("run-1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            JobSourceError::PollExhausted { attempts: 3, .. }
        ));
        running.assert_async().await;
    }

    #[tokio::test]
    async fn test_zero_attempt_cap_still_reads_status_once() {
        let mut server = mockito::Server::new_async().await;
        let done = mock_status(&mut server, "SUCCEEDED").await;

        let run = source_for(&server, 0).wait_for_run("run-1").await.unwrap();
        assert_eq!(run.default_dataset_id.as_deref(), Some("abc123"));
        done.assert_async().await;
    }

    #[tokio::test]
    async fn test_succeeded_without_dataset_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _start = mock_start(&mut server).await;
        let _done = server
            .mock("GET", "/actor-runs/run-1")
            .with_status(200)
            .with_body(json!({ "data": { "id": "run-1", "status": "SUCCEEDED" } }).to_string())
            .create_async()
            .await;

        let err = source_for(&server, 10)
            .fetch_listings("rust")
            .await
            .unwrap_err();
        assert!(matches!(err, JobSourceError::MissingDataset { .. }));
    }
}
