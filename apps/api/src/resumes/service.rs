//! Merging manually entered resume fields with what the classifier extracted
//! from an uploaded document. A manual value always wins for its field.

use serde::Deserialize;

use crate::errors::AppError;
use crate::extraction::ExtractionResult;

pub const MAX_PROFILE_SUMMARY_CHARS: usize = 2000;

/// Fields typed in by the candidate. Blank input counts as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManualResumeFields {
    pub email: Option<String>,
    pub profile_summary: Option<String>,
    pub skills: Option<Vec<String>>,
    pub education: Option<Vec<String>>,
    pub experience: Option<String>,
}

impl ManualResumeFields {
    /// Records one multipart text field. Unknown names are ignored.
    pub fn set_form_field(&mut self, name: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        match name {
            "email" => self.email = Some(value.to_string()),
            "profileSummary" | "profile_summary" => self.profile_summary = Some(value.to_string()),
            "skills" => self.skills = non_empty(parse_csv_list(value)),
            "education" => self.education = non_empty(parse_csv_list(value)),
            "experience" => self.experience = Some(value.to_string()),
            _ => {}
        }
    }

    pub fn has_any(&self) -> bool {
        self.email.is_some()
            || self.profile_summary.is_some()
            || self.skills.is_some()
            || self.education.is_some()
            || self.experience.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.email.is_some()
            && self.profile_summary.is_some()
            && self.skills.is_some()
            && self.education.is_some()
            && self.experience.is_some()
    }
}

fn non_empty(list: Vec<String>) -> Option<Vec<String>> {
    (!list.is_empty()).then_some(list)
}

/// Splits a comma-separated list, trimming entries and dropping blanks.
pub fn parse_csv_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// A list field in a JSON body, sent either as an array or a CSV string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StringList {
    Items(Vec<String>),
    Csv(String),
}

impl StringList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            StringList::Items(items) => items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            StringList::Csv(csv) => parse_csv_list(&csv),
        }
    }
}

/// Extraction only runs when a document was uploaded and some field still
/// needs a value.
pub fn needs_extraction(manual: &ManualResumeFields, has_file: bool) -> bool {
    has_file && !manual.is_complete()
}

/// Final field values for a new resume record.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeFields {
    pub email: String,
    pub profile_summary: String,
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub experience: String,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates a manually supplied profile summary.
pub fn check_profile_summary(summary: &str) -> Result<(), AppError> {
    if summary.chars().count() > MAX_PROFILE_SUMMARY_CHARS {
        return Err(AppError::Validation(format!(
            "Profile summary must be at most {MAX_PROFILE_SUMMARY_CHARS} characters."
        )));
    }
    Ok(())
}

/// Picks each field from `manual` when present, otherwise from `extracted`.
///
/// The email must come from one side or the other. An extracted profile
/// summary is truncated to the length limit; a manual one over the limit is
/// rejected.
pub fn resolve_fields(
    manual: ManualResumeFields,
    extracted: ExtractionResult,
) -> Result<ResumeFields, AppError> {
    let email = manual
        .email
        .as_deref()
        .map(normalize_email)
        .filter(|e| !e.is_empty())
        .or_else(|| Some(normalize_email(&extracted.email)).filter(|e| !e.is_empty()))
        .ok_or_else(|| AppError::Validation("Email is required.".to_string()))?;

    let profile_summary = match manual.profile_summary {
        Some(summary) => {
            check_profile_summary(&summary)?;
            summary
        }
        None => extracted
            .profile_summary
            .trim()
            .chars()
            .take(MAX_PROFILE_SUMMARY_CHARS)
            .collect(),
    };

    Ok(ResumeFields {
        email,
        profile_summary,
        skills: manual.skills.unwrap_or(extracted.skills),
        education: manual.education.unwrap_or(extracted.education),
        experience: manual
            .experience
            .unwrap_or_else(|| extracted.experience.trim().to_string()),
    })
}
