use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub profile_summary: String,
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub experience: String,
    pub file_name: Option<String>,
    pub file_mime_type: Option<String>,
    pub file_path: Option<String>,
    pub file_storage_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reference to the stored document a resume was created from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeFile {
    pub file_name: String,
    pub mime_type: String,
    pub path: String,
    pub storage_id: Option<String>,
}

/// API shape of a resume: the row with its file columns folded into `resume_file`.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub profile_summary: String,
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub experience: String,
    pub resume_file: Option<ResumeFile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResumeRow {
    pub fn resume_file(&self) -> Option<ResumeFile> {
        Some(ResumeFile {
            file_name: self.file_name.clone()?,
            mime_type: self.file_mime_type.clone()?,
            path: self.file_path.clone()?,
            storage_id: self.file_storage_id.clone(),
        })
    }
}

impl From<ResumeRow> for ResumeRecord {
    fn from(row: ResumeRow) -> Self {
        let resume_file = row.resume_file();
        ResumeRecord {
            id: row.id,
            user_id: row.user_id,
            email: row.email,
            profile_summary: row.profile_summary,
            skills: row.skills,
            education: row.education,
            experience: row.experience,
            resume_file,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_resume(skills: &[&str], education: &[&str]) -> ResumeRow {
        ResumeRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            email: "jane@example.com".to_string(),
            profile_summary: String::new(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            education: education.iter().map(|s| s.to_string()).collect(),
            experience: String::new(),
            file_name: None,
            file_mime_type: None,
            file_path: None,
            file_storage_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_resume_file_requires_name_mime_and_path() {
        let mut row = make_resume(&[], &[]);
        assert!(row.resume_file().is_none());

        row.file_name = Some("cv.pdf".to_string());
        row.file_mime_type = Some("application/pdf".to_string());
        assert!(row.resume_file().is_none());

        row.file_path = Some("s3://resumes/resumes/document/1.pdf".to_string());
        let file = row.resume_file().unwrap();
        assert_eq!(file.file_name, "cv.pdf");
        assert_eq!(file.storage_id, None);
    }

    #[test]
    fn test_record_folds_file_columns() {
        let mut row = make_resume(&["React"], &[]);
        row.file_name = Some("cv.docx".to_string());
        row.file_mime_type = Some("application/zip".to_string());
        row.file_path = Some("s3://b/k".to_string());
        row.file_storage_id = Some("k".to_string());

        let record = ResumeRecord::from(row);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["resume_file"]["storage_id"], "k");
        assert!(json.get("file_name").is_none());
    }
}
