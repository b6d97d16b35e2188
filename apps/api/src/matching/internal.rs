//! Internal matching: scores every stored job posting against a resume.

use tracing::info;

use crate::errors::AppError;
use crate::matching::keywords::derive_keywords;
use crate::matching::scorer::{score_posting, InternalJobMatch};
use crate::models::job::JobPostingRow;

/// Postings keep their incoming order. A resume with neither skills nor
/// education is rejected with `NoKeywords` like the external path.
pub fn match_internal_jobs(
    skills: &[String],
    education: &[String],
    postings: Vec<JobPostingRow>,
) -> Result<Vec<InternalJobMatch>, AppError> {
    derive_keywords(skills, education)?;

    let total = postings.len();
    let matched: Vec<InternalJobMatch> = postings
        .into_iter()
        .filter_map(|posting| score_posting(skills, posting))
        .collect();

    info!(total, matched = matched.len(), "Scored internal job postings");
    Ok(matched)
}
