use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::job_source::JobSourceConfig;

const DEFAULT_APIFY_BASE_URL: &str = "https://api.apify.com/v2";
const DEFAULT_APIFY_ACTOR_ID: &str = "forward_dinosaur~linkedin-job-scraper";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub apify_api_token: String,
    pub apify_base_url: String,
    pub apify_actor_id: String,
    pub apify_poll_interval_secs: u64,
    pub apify_max_poll_attempts: u32,
    pub match_timeout_secs: u64,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            apify_api_token: require_env("APIFY_API_TOKEN")?,
            apify_base_url: std::env::var("APIFY_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_APIFY_BASE_URL.to_string()),
            apify_actor_id: std::env::var("APIFY_ACTOR_ID")
                .unwrap_or_else(|_| DEFAULT_APIFY_ACTOR_ID.to_string()),
            apify_poll_interval_secs: parse_env_or("APIFY_POLL_INTERVAL_SECS", 3)?,
            apify_max_poll_attempts: require_nonzero(
                "APIFY_MAX_POLL_ATTEMPTS",
                parse_env_or("APIFY_MAX_POLL_ATTEMPTS", 100)?,
            )?,
            match_timeout_secs: parse_env_or("MATCH_TIMEOUT_SECS", 300)?,
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir()),
            max_upload_bytes: parse_env_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            port: parse_env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Provider settings handed to the job source client at construction.
    pub fn job_source(&self) -> JobSourceConfig {
        JobSourceConfig {
            base_url: self.apify_base_url.clone(),
            actor_id: self.apify_actor_id.clone(),
            token: self.apify_api_token.clone(),
            poll_interval: Duration::from_secs(self.apify_poll_interval_secs),
            max_poll_attempts: self.apify_max_poll_attempts,
        }
    }

    pub fn match_timeout(&self) -> Duration {
        Duration::from_secs(self.match_timeout_secs)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn require_nonzero(key: &str, value: u32) -> Result<u32> {
    if value == 0 {
        anyhow::bail!("{key} must be at least 1");
    }
    Ok(value)
}
