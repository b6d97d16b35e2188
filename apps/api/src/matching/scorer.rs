//! Match scorer: keyword overlap between a resume's skills and a job's text.
//!
//! Each skill adds 2 when it appears in the title and 1 when it appears in the
//! description (case-insensitive substring). A job is kept at score >= 2.

use serde::Serialize;

use crate::job_source::RawJobListing;
use crate::models::job::JobPostingRow;

pub const MIN_MATCH_SCORE: u32 = 2;
const TITLE_WEIGHT: u32 = 2;
const DESCRIPTION_WEIGHT: u32 = 1;

/// An external listing that passed the score threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalJobListing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub link: String,
    pub description: String,
    pub match_score: u32,
}

/// A stored posting that passed the score threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InternalJobMatch {
    #[serde(flatten)]
    pub posting: JobPostingRow,
    pub match_score: u32,
}

pub fn score(skills: &[String], title: &str, description: &str) -> u32 {
    let title = title.to_lowercase();
    let description = description.to_lowercase();

    skills
        .iter()
        .filter(|s| !s.is_empty())
        .map(|skill| {
            let skill = skill.to_lowercase();
            let mut points = 0;
            if title.contains(&skill) {
                points += TITLE_WEIGHT;
            }
            if description.contains(&skill) {
                points += DESCRIPTION_WEIGHT;
            }
            points
        })
        .sum()
}

pub fn is_match(score: u32) -> bool {
    score >= MIN_MATCH_SCORE
}

/// Scores a provider listing; `None` when it falls below the threshold.
pub fn score_listing(skills: &[String], listing: &RawJobListing) -> Option<ExternalJobListing> {
    let title = listing.title().unwrap_or_default();
    let description = listing.description().unwrap_or_default();
    let match_score = score(skills, title, description);
    if !is_match(match_score) {
        return None;
    }

    Some(ExternalJobListing {
        title: title.to_string(),
        company: listing.company().unwrap_or_default().to_string(),
        location: listing.location().unwrap_or_default().to_string(),
        link: listing.link().unwrap_or_default().to_string(),
        description: description.to_string(),
        match_score,
    })
}

/// Scores a stored posting. Its skills and experience text stand in for the
/// description.
pub fn score_posting(skills: &[String], posting: JobPostingRow) -> Option<InternalJobMatch> {
    let description = format!("{} {}", posting.skills.join(" "), posting.experience);
    let match_score = score(skills, &posting.title, &description);
    is_match(match_score).then_some(InternalJobMatch {
        posting,
        match_score,
    })
}
