//! Resume file storage.
//!
//! Stored objects live under one of two classifications: `document` for PDFs
//! and `raw` for everything else. Deletion does not trust the recorded MIME
//! type and tries `document` first, then `raw`.

use std::path::Path;
use std::pin::Pin;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncRead;
use tracing::warn;

use crate::extraction::document::PDF_MIME;

#[cfg(test)]
pub mod memory;
pub mod s3;

pub use s3::S3FileStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Classification a stored object is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Document,
    Raw,
}

impl StorageClass {
    pub fn for_mime(mime_type: &str) -> Self {
        if mime_type == PDF_MIME {
            StorageClass::Document
        } else {
            StorageClass::Raw
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StorageClass::Document => "document",
            StorageClass::Raw => "raw",
        }
    }

    /// Object key for `storage_id` under this classification.
    pub fn key_for(self, storage_id: &str) -> String {
        format!("resumes/{}/{}", self.label(), storage_id)
    }
}

pub type FileReader = Pin<Box<dyn AsyncRead + Send>>;

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Uploads the local file and returns the stored object's path.
    async fn put(
        &self,
        class: StorageClass,
        storage_id: &str,
        local_path: &Path,
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Opens a stored object for streaming. `NotFound` when the object is gone.
    async fn open(&self, class: StorageClass, storage_id: &str)
        -> Result<FileReader, StorageError>;

    /// Deletes a stored object. `NotFound` when nothing is stored there.
    async fn delete(&self, class: StorageClass, storage_id: &str) -> Result<(), StorageError>;
}

/// Deletes `storage_id`, trying the `document` classification and then `raw`.
/// Returns the classification the object was deleted from.
pub async fn delete_with_fallback(
    store: &dyn FileStore,
    storage_id: &str,
) -> Result<StorageClass, StorageError> {
    match store.delete(StorageClass::Document, storage_id).await {
        Ok(()) => return Ok(StorageClass::Document),
        Err(e) => warn!(storage_id, "Delete as document failed, trying raw: {e}"),
    }

    store
        .delete(StorageClass::Raw, storage_id)
        .await
        .map(|()| StorageClass::Raw)
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryFileStore;
    use super::*;

    #[test]
    fn test_class_for_mime() {
        assert_eq!(StorageClass::for_mime(PDF_MIME), StorageClass::Document);
        assert_eq!(
            StorageClass::for_mime(crate::extraction::document::DOCX_MIME),
            StorageClass::Raw
        );
    }

    #[test]
    fn test_key_for_includes_classification() {
        assert_eq!(
            StorageClass::Raw.key_for("abc.docx"),
            "resumes/raw/abc.docx"
        );
    }

    #[tokio::test]
    async fn test_delete_prefers_document_classification() {
        let store = MemoryFileStore::default();
        store.insert(StorageClass::Document, "a.pdf", b"pdf");

        let class = delete_with_fallback(&store, "a.pdf").await.unwrap();
        assert_eq!(class, StorageClass::Document);
        assert!(!store.contains(StorageClass::Document, "a.pdf"));
    }

    #[tokio::test]
    async fn test_delete_falls_back_to_raw() {
        let store = MemoryFileStore::default();
        store.insert(StorageClass::Raw, "a.docx", b"docx");

        let class = delete_with_fallback(&store, "a.docx").await.unwrap();
        assert_eq!(class, StorageClass::Raw);
        assert!(!store.contains(StorageClass::Raw, "a.docx"));
    }

    #[tokio::test]
    async fn test_delete_missing_everywhere_reports_last_error() {
        let store = MemoryFileStore::default();
        let err = delete_with_fallback(&store, "gone.pdf").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(ref key) if key == "resumes/raw/gone.pdf"));
    }
}
