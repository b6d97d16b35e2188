use std::path::Path;

use axum::extract::Multipart;
use tracing::debug;

use crate::errors::AppError;
use crate::extraction::{DocumentKind, UploadedDocument};
use crate::resumes::service::ManualResumeFields;

/// Multipart field carrying the resume document.
pub const FILE_FIELD: &str = "resumeFile";

/// A parsed resume form: typed-in fields plus the spooled document, if any.
pub struct ResumeForm {
    pub manual: ManualResumeFields,
    pub document: Option<UploadedDocument>,
}

/// Reads every multipart field. The document is streamed chunk by chunk into
/// a temp file under `upload_dir`; its declared MIME type must be PDF or DOCX.
pub async fn read_resume_form(
    mut multipart: Multipart,
    upload_dir: &Path,
) -> Result<ResumeForm, AppError> {
    let mut manual = ManualResumeFields::default();
    let mut document = None;

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name != FILE_FIELD {
            let value = field.text().await?;
            manual.set_form_field(&name, &value);
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().trim().to_string();
        if file_name.is_empty() {
            // An empty file input still submits a part with no file name.
            continue;
        }

        let kind = field
            .content_type()
            .and_then(DocumentKind::from_mime)
            .ok_or_else(|| AppError::Validation("Unsupported file type".to_string()))?;

        let mut upload = UploadedDocument::create_in(upload_dir, file_name, kind)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to spool upload: {e}")))?;
        while let Some(chunk) = field.chunk().await? {
            upload
                .append(&chunk)
                .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to spool upload: {e}")))?;
        }
        debug!(
            file_name = %upload.file_name,
            bytes = upload.size(),
            "Spooled resume upload"
        );
        document = Some(upload);
    }

    Ok(ResumeForm { manual, document })
}
