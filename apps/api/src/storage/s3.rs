use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::info;

use super::{FileReader, FileStore, StorageClass, StorageError};

/// Resume files in an S3 (or MinIO) bucket.
#[derive(Clone)]
pub struct S3FileStore {
    client: Client,
    bucket: String,
}

impl S3FileStore {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl FileStore for S3FileStore {
    async fn put(
        &self,
        class: StorageClass,
        storage_id: &str,
        local_path: &Path,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let key = class.key_for(storage_id);
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to read upload: {e}")))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("S3 upload failed: {e}")))?;

        info!("Uploaded resume file to s3://{}/{}", self.bucket, key);
        Ok(format!("s3://{}/{}", self.bucket, key))
    }

    async fn open(
        &self,
        class: StorageClass,
        storage_id: &str,
    ) -> Result<FileReader, StorageError> {
        let key = class.key_for(storage_id);
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    StorageError::NotFound(key.clone())
                } else {
                    StorageError::Backend(format!("S3 download failed: {service_error}"))
                }
            })?;

        Ok(Box::pin(output.body.into_async_read()))
    }

    async fn delete(&self, class: StorageClass, storage_id: &str) -> Result<(), StorageError> {
        let key = class.key_for(storage_id);

        // DeleteObject succeeds for absent keys, so probe first to know which
        // classification actually held the object.
        self.client
            .head_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    StorageError::NotFound(key.clone())
                } else {
                    StorageError::Backend(format!("S3 head failed: {service_error}"))
                }
            })?;

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("S3 delete failed: {e}")))?;

        info!("Deleted s3://{}/{}", self.bucket, key);
        Ok(())
    }
}
