use serde::Deserialize;

use crate::errors::AppError;
use crate::resumes::service::StringList;

const TITLE_REQUIRED: &str = "Job title is required.";
const SKILLS_REQUIRED: &str = "At least one skill is required.";
const CONTACT_REQUIRED: &str = "Contact number is required.";

#[derive(Debug, Deserialize)]
pub struct NewJobPosting {
    #[serde(default)]
    pub title: String,
    pub skills: Option<StringList>,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub contact: String,
}

/// A posting that passed validation, ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidJobPosting {
    pub title: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub contact: String,
}

impl NewJobPosting {
    /// Checks every required field and reports all failures together.
    pub fn validate(self) -> Result<ValidJobPosting, AppError> {
        let title = self.title.trim().to_string();
        let skills = self.skills.map(StringList::into_vec).unwrap_or_default();
        let contact = self.contact.trim().to_string();

        let mut errors = Vec::new();
        if title.is_empty() {
            errors.push(TITLE_REQUIRED);
        }
        if skills.is_empty() {
            errors.push(SKILLS_REQUIRED);
        }
        if contact.is_empty() {
            errors.push(CONTACT_REQUIRED);
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors.join(" ")));
        }

        Ok(ValidJobPosting {
            title,
            skills,
            experience: self.experience.trim().to_string(),
            contact,
        })
    }
}

/// Partial update. Absent fields keep their stored value; present required
/// fields must still be non-blank.
#[derive(Debug, Default, Deserialize)]
pub struct JobPostingUpdate {
    pub title: Option<String>,
    pub skills: Option<StringList>,
    pub experience: Option<String>,
    pub contact: Option<String>,
}

#[derive(Debug, Default, PartialEq)]
pub struct JobPostingChanges {
    pub title: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<String>,
    pub contact: Option<String>,
}

impl JobPostingUpdate {
    pub fn validate(self) -> Result<JobPostingChanges, AppError> {
        let title = self.title.map(|t| t.trim().to_string());
        let skills = self.skills.map(StringList::into_vec);
        let contact = self.contact.map(|c| c.trim().to_string());

        let mut errors = Vec::new();
        if title.as_deref() == Some("") {
            errors.push(TITLE_REQUIRED);
        }
        if skills.as_ref().is_some_and(Vec::is_empty) {
            errors.push(SKILLS_REQUIRED);
        }
        if contact.as_deref() == Some("") {
            errors.push(CONTACT_REQUIRED);
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors.join(" ")));
        }

        Ok(JobPostingChanges {
            title,
            skills,
            experience: self.experience.map(|e| e.trim().to_string()),
            contact,
        })
    }
}
