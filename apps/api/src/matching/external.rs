//! External matching: drives the job source once per resume keyword and keeps
//! the listings that score high enough.

use tokio::time::Instant;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::job_source::JobSource;
use crate::matching::keywords::derive_keywords;
use crate::matching::scorer::{score_listing, ExternalJobListing};

/// Keywords are processed one after another; results accumulate in discovery
/// order with no de-duplication across keywords.
///
/// When `deadline` passes, the in-flight lookup is dropped (which cancels its
/// poll loop) and whatever was matched so far is returned.
pub async fn match_external_jobs(
    source: &dyn JobSource,
    skills: &[String],
    education: &[String],
    deadline: Instant,
) -> Result<Vec<ExternalJobListing>, AppError> {
    let keywords = derive_keywords(skills, education)?;
    let mut matched = Vec::new();

    for keyword in &keywords {
        let listings = match tokio::time::timeout_at(deadline, source.search(keyword)).await {
            Ok(listings) => listings,
            Err(_) => {
                warn!(
                    keyword = %keyword,
                    matched = matched.len(),
                    "Match deadline reached, returning partial results"
                );
                break;
            }
        };

        let before = matched.len();
        matched.extend(listings.iter().filter_map(|l| score_listing(skills, l)));
        info!(
            keyword = %keyword,
            fetched = listings.len(),
            retained = matched.len() - before,
            "Scored listings for keyword"
        );
    }

    Ok(matched)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::job_source::RawJobListing;

    /// Records every keyword it is asked for and answers from a fixed table.
    #[derive(Default)]
    pub(crate) struct FakeJobSource {
        pub calls: Mutex<Vec<String>>,
        pub listings: Vec<(String, Vec<RawJobListing>)>,
        pub delay: Option<(String, Duration)>,
    }

    #[async_trait]
    impl JobSource for FakeJobSource {
        async fn search(&self, keyword: &str) -> Vec<RawJobListing> {
            self.calls.lock().unwrap().push(keyword.to_string());
            if let Some((slow, delay)) = &self.delay {
                if slow == keyword {
                    tokio::time::sleep(*delay).await;
                }
            }
            self.listings
                .iter()
                .find(|(k, _)| k == keyword)
                .map(|(_, l)| l.clone())
                .unwrap_or_default()
        }
    }

    fn listing(title: &str, description: &str) -> RawJobListing {
        RawJobListing(json!({ "title": title, "description": description, "url": "https://jobs.example" }))
    }

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn far_deadline() -> Instant {
        Instant::now() + Duration::from_secs(3600)
    }

    #[tokio::test]
    async fn test_no_keywords_fails_before_any_lookup() {
        let source = FakeJobSource::default();
        let result = match_external_jobs(&source, &[], &[], far_deadline()).await;
        assert!(matches!(result, Err(AppError::NoKeywords)));
        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_keywords_searched_in_order_and_capped() {
        let source = FakeJobSource::default();
        let skills = strings(&["React", "Node.js", "MongoDB", "Express"]);
        let education = strings(&["Bachelor of Science", "State University"]);

        let matched = match_external_jobs(&source, &skills, &education, far_deadline())
            .await
            .unwrap();

        assert!(matched.is_empty());
        assert_eq!(
            *source.calls.lock().unwrap(),
            strings(&["React", "Node.js", "MongoDB", "Express", "Bachelor of Science"])
        );
    }

    #[tokio::test]
    async fn test_results_accumulate_without_cross_keyword_dedup() {
        let shared = listing("React Developer", "react and node");
        let source = FakeJobSource {
            listings: vec![
                (
                    "React".to_string(),
                    vec![shared.clone(), listing("Accountant", "spreadsheets")],
                ),
                ("Node".to_string(), vec![shared.clone()]),
            ],
            ..Default::default()
        };
        let skills = strings(&["React", "Node"]);

        let matched = match_external_jobs(&source, &skills, &[], far_deadline())
            .await
            .unwrap();

        assert_eq!(matched.len(), 2);
        assert!(matched.iter().all(|m| m.title == "React Developer"));
        // react: title+desc (3), node: desc (1)
        assert_eq!(matched[0].match_score, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_returns_partial_results() {
        let source = FakeJobSource {
            listings: vec![("Rust".to_string(), vec![listing("Rust Engineer", "")])],
            delay: Some(("Tokio".to_string(), Duration::from_secs(600))),
            ..Default::default()
        };
        let skills = strings(&["Rust", "Tokio", "Axum"]);
        let deadline = Instant::now() + Duration::from_secs(60);

        let matched = match_external_jobs(&source, &skills, &[], deadline)
            .await
            .unwrap();

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "Rust Engineer");
        assert_eq!(*source.calls.lock().unwrap(), strings(&["Rust", "Tokio"]));
    }
}
