//! In-memory `FileStore` used by tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{FileReader, FileStore, StorageClass, StorageError};

#[derive(Default)]
pub struct MemoryFileStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryFileStore {
    pub fn insert(&self, class: StorageClass, storage_id: &str, bytes: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(class.key_for(storage_id), bytes.to_vec());
    }

    pub fn contains(&self, class: StorageClass, storage_id: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&class.key_for(storage_id))
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn put(
        &self,
        class: StorageClass,
        storage_id: &str,
        local_path: &Path,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        let bytes = std::fs::read(local_path).map_err(|e| StorageError::Backend(e.to_string()))?;
        self.insert(class, storage_id, &bytes);
        Ok(format!("memory://{}", class.key_for(storage_id)))
    }

    async fn open(
        &self,
        class: StorageClass,
        storage_id: &str,
    ) -> Result<FileReader, StorageError> {
        let key = class.key_for(storage_id);
        let bytes = self
            .objects
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or(StorageError::NotFound(key))?;
        Ok(Box::pin(std::io::Cursor::new(bytes)))
    }

    async fn delete(&self, class: StorageClass, storage_id: &str) -> Result<(), StorageError> {
        let key = class.key_for(storage_id);
        match self.objects.lock().unwrap().remove(&key) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound(key)),
        }
    }
}
