use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_util::io::ReaderStream;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{ExtractionResult, UploadedDocument};
use crate::models::resume::{ResumeFile, ResumeRecord};
use crate::resumes::repo::{self, ResumeChanges};
use crate::resumes::service::{
    check_profile_summary, needs_extraction, normalize_email, resolve_fields, StringList,
};
use crate::resumes::upload::read_resume_form;
use crate::routes::UserIdQuery;
use crate::state::AppState;
use crate::storage::{delete_with_fallback, FileReader, FileStore, StorageClass, StorageError};

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeRecord>), AppError> {
    let form = read_resume_form(multipart, &state.config.upload_dir).await?;
    if !form.manual.has_any() && form.document.is_none() {
        return Err(AppError::Validation(
            "Please provide resume details or upload a file.".to_string(),
        ));
    }

    let extracted = match &form.document {
        Some(doc) if needs_extraction(&form.manual, true) => {
            let text = doc.extract_text().await;
            state.classifier.classify(&text)
        }
        _ => ExtractionResult::default(),
    };
    let fields = resolve_fields(form.manual, extracted)?;

    let stored = match &form.document {
        Some(doc) => Some(store_document(&state, doc).await?),
        None => None,
    };

    let row = match repo::insert_resume(&state.db, params.user_id, &fields, stored.as_ref()).await
    {
        Ok(row) => row,
        Err(e) => {
            if let Some(storage_id) = stored.as_ref().and_then(|f| f.storage_id.as_deref()) {
                if let Err(cleanup) = delete_with_fallback(state.files.as_ref(), storage_id).await {
                    warn!(storage_id, "Failed to remove orphaned upload: {cleanup}");
                }
            }
            return Err(e);
        }
    };

    info!(resume_id = %row.id, user_id = %row.user_id, "Resume created");
    Ok((StatusCode::CREATED, Json(row.into())))
}

async fn store_document(state: &AppState, doc: &UploadedDocument) -> Result<ResumeFile, AppError> {
    let mime_type = doc.kind.mime_type();
    let storage_id = format!("{}.{}", Uuid::new_v4(), doc.kind.extension());
    let path = state
        .files
        .put(
            StorageClass::for_mime(mime_type),
            &storage_id,
            doc.path(),
            mime_type,
        )
        .await?;

    Ok(ResumeFile {
        file_name: doc.file_name.clone(),
        mime_type: mime_type.to_string(),
        path,
        storage_id: Some(storage_id),
    })
}

/// POST /api/v1/resumes/preview
pub async fn handle_preview_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractionResult>, AppError> {
    let form = read_resume_form(multipart, &state.config.upload_dir).await?;
    let doc = form
        .document
        .ok_or_else(|| AppError::Validation("Unsupported file type".to_string()))?;

    let text = doc.extract_text().await;
    Ok(Json(state.classifier.classify(&text)))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ResumeRecord>>, AppError> {
    let rows = repo::list_resumes(&state.db, params.user_id).await?;
    if rows.is_empty() {
        return Err(AppError::NotFound("Resume not found".to_string()));
    }
    Ok(Json(rows.into_iter().map(ResumeRecord::from).collect()))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeRecord>, AppError> {
    let row = repo::get_owned_resume(&state.db, id, params.user_id).await?;
    Ok(Json(row.into()))
}

#[derive(Debug, Default, Deserialize)]
pub struct ResumeUpdate {
    pub email: Option<String>,
    #[serde(alias = "profileSummary")]
    pub profile_summary: Option<String>,
    pub skills: Option<StringList>,
    pub education: Option<StringList>,
    pub experience: Option<String>,
}

impl ResumeUpdate {
    fn into_changes(self) -> Result<ResumeChanges, AppError> {
        let email = match self.email {
            Some(email) => {
                let email = normalize_email(&email);
                if email.is_empty() {
                    return Err(AppError::Validation("Email is required.".to_string()));
                }
                Some(email)
            }
            None => None,
        };

        let profile_summary = self.profile_summary.map(|s| s.trim().to_string());
        if let Some(summary) = &profile_summary {
            check_profile_summary(summary)?;
        }

        Ok(ResumeChanges {
            email,
            profile_summary,
            skills: self.skills.map(StringList::into_vec),
            education: self.education.map(StringList::into_vec),
            experience: self.experience.map(|s| s.trim().to_string()),
        })
    }
}

/// PUT /api/v1/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
    Json(req): Json<ResumeUpdate>,
) -> Result<Json<ResumeRecord>, AppError> {
    let changes = req.into_changes()?;
    repo::get_owned_resume(&state.db, id, params.user_id).await?;
    let row = repo::update_resume(&state.db, id, &changes).await?;
    Ok(Json(row.into()))
}

/// DELETE /api/v1/resumes/:id
///
/// The stored file is removed best-effort; the record is deleted either way.
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Value>, AppError> {
    let row = repo::get_owned_resume(&state.db, id, params.user_id).await?;

    if let Some(storage_id) = row.file_storage_id.as_deref() {
        match delete_with_fallback(state.files.as_ref(), storage_id).await {
            Ok(class) => info!(storage_id, class = class.label(), "Deleted resume file"),
            Err(e) => error!(storage_id, "Failed to delete resume file: {e}"),
        }
    }

    repo::delete_resume(&state.db, id).await?;
    info!(resume_id = %id, "Resume deleted");
    Ok(Json(json!({ "message": "Resume and file deleted successfully" })))
}

/// GET /api/v1/resumes/:id/file
pub async fn handle_download_resume_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Response, AppError> {
    let row = repo::get_owned_resume(&state.db, id, params.user_id).await?;
    let file = row
        .resume_file()
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;
    let reader = open_stored_file(state.files.as_ref(), &file).await?;

    let content_type = HeaderValue::from_str(&file.mime_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_str(&content_disposition(&file.mime_type, &file.file_name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(ReaderStream::new(reader)),
    )
        .into_response())
}

/// Opens the object behind a resume's file reference. An object that is gone
/// from storage is `FileMissing`, not `NotFound`.
async fn open_stored_file(store: &dyn FileStore, file: &ResumeFile) -> Result<FileReader, AppError> {
    let storage_id = file
        .storage_id
        .as_deref()
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    store
        .open(StorageClass::for_mime(&file.mime_type), storage_id)
        .await
        .map_err(|e| match e {
            StorageError::NotFound(_) => AppError::FileMissing("File has been deleted".to_string()),
            other => other.into(),
        })
}

/// PDFs open in the browser; anything else is downloaded.
fn content_disposition(mime_type: &str, file_name: &str) -> String {
    let disposition = if StorageClass::for_mime(mime_type) == StorageClass::Document {
        "inline"
    } else {
        "attachment"
    };
    let file_name: String = file_name
        .chars()
        .map(|c| if c == '"' || c.is_control() { '_' } else { c })
        .collect();
    format!("{disposition}; filename=\"{file_name}\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::document::{DOCX_MIME, PDF_MIME};
    use crate::storage::memory::MemoryFileStore;
    use tokio::io::AsyncReadExt;

    fn stored_pdf(storage_id: Option<&str>) -> ResumeFile {
        ResumeFile {
            file_name: "cv.pdf".to_string(),
            mime_type: PDF_MIME.to_string(),
            path: "memory://resumes/document/cv.pdf".to_string(),
            storage_id: storage_id.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_open_stored_file_streams_object() {
        let store = MemoryFileStore::default();
        store.insert(StorageClass::Document, "abc.pdf", b"%PDF-1.7");

        let mut reader = open_stored_file(&store, &stored_pdf(Some("abc.pdf")))
            .await
            .unwrap();
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await.unwrap();
        assert_eq!(bytes, b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_vanished_object_is_file_missing() {
        let store = MemoryFileStore::default();
        let err = open_stored_file(&store, &stored_pdf(Some("gone.pdf")))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::FileMissing(ref m) if m == "File has been deleted"));
    }

    #[tokio::test]
    async fn test_file_without_storage_id_is_not_found() {
        let store = MemoryFileStore::default();
        let err = open_stored_file(&store, &stored_pdf(None)).await.err().unwrap();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "File not found"));
    }

    #[test]
    fn test_pdf_is_inline_other_types_attachment() {
        assert_eq!(
            content_disposition(PDF_MIME, "cv.pdf"),
            r#"inline; filename="cv.pdf""#
        );
        assert_eq!(
            content_disposition(DOCX_MIME, "cv.docx"),
            r#"attachment; filename="cv.docx""#
        );
    }

    #[test]
    fn test_disposition_sanitizes_file_name() {
        assert_eq!(
            content_disposition(PDF_MIME, "my \"best\"\ncv.pdf"),
            r#"inline; filename="my _best__cv.pdf""#
        );
    }

    #[test]
    fn test_update_accepts_camel_case_and_csv() {
        let req: ResumeUpdate = serde_json::from_value(json!({
            "email": " New@Example.com ",
            "profileSummary": "Updated",
            "skills": "Rust, Go",
            "education": ["MSc"]
        }))
        .unwrap();

        let changes = req.into_changes().unwrap();
        assert_eq!(changes.email.as_deref(), Some("new@example.com"));
        assert_eq!(changes.profile_summary.as_deref(), Some("Updated"));
        assert_eq!(
            changes.skills,
            Some(vec!["Rust".to_string(), "Go".to_string()])
        );
        assert_eq!(changes.education, Some(vec!["MSc".to_string()]));
        assert_eq!(changes.experience, None);
    }

    #[test]
    fn test_update_rejects_blank_email() {
        let req = ResumeUpdate {
            email: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(req.into_changes(), Err(AppError::Validation(_))));
    }
}
