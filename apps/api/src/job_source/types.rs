use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Geographic scope sent with every scrape run.
pub const SEARCH_LOCATION: &str = "Worldwide";
/// Maximum listings requested per keyword.
pub const MAX_JOBS_PER_RUN: u32 = 10;

/// Input for the LinkedIn job scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct JobScraperInput {
    pub query: String,
    pub location: Vec<String>,
    #[serde(rename = "maxJobs")]
    pub max_jobs: u32,
    #[serde(rename = "proxyConfiguration")]
    pub proxy_configuration: ProxyConfiguration,
}

impl JobScraperInput {
    pub fn for_keyword(keyword: &str) -> Self {
        Self {
            query: keyword.to_string(),
            location: vec![SEARCH_LOCATION.to_string()],
            max_jobs: MAX_JOBS_PER_RUN,
            proxy_configuration: ProxyConfiguration {
                use_apify_proxy: true,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProxyConfiguration {
    #[serde(rename = "useApifyProxy")]
    pub use_apify_proxy: bool,
}

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId", default)]
    pub default_dataset_id: Option<String>,
}

/// Where a run is in its lifecycle, as far as polling is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Pending,
    Succeeded,
    Failed,
}

impl RunPhase {
    pub fn from_status(status: &str) -> Self {
        match status {
            "READY" | "RUNNING" | "TIMING-OUT" | "ABORTING" => RunPhase::Pending,
            "SUCCEEDED" => RunPhase::Succeeded,
            _ => RunPhase::Failed,
        }
    }
}

/// A single dataset item, kept verbatim. Field access is lenient: a missing or
/// non-string field reads as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawJobListing(pub Value);

impl RawJobListing {
    fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.text("title")
    }

    pub fn company(&self) -> Option<&str> {
        self.text("company")
    }

    pub fn location(&self) -> Option<&str> {
        self.text("location")
    }

    pub fn description(&self) -> Option<&str> {
        self.text("description")
    }

    /// `url`, falling back to `link` when `url` is absent or empty.
    pub fn link(&self) -> Option<&str> {
        self.text("url")
            .filter(|u| !u.is_empty())
            .or_else(|| self.text("link"))
    }
}
