use crate::errors::AppError;

/// Maximum number of search keywords derived from one resume.
pub const MAX_KEYWORDS: usize = 5;

/// Search keywords for a resume: skills first, then education, truncated.
/// Fails with `NoKeywords` when the resume has neither.
pub fn derive_keywords(skills: &[String], education: &[String]) -> Result<Vec<String>, AppError> {
    if skills.is_empty() && education.is_empty() {
        return Err(AppError::NoKeywords);
    }

    Ok(skills
        .iter()
        .chain(education)
        .take(MAX_KEYWORDS)
        .cloned()
        .collect())
}
