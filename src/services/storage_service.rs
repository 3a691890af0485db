use crate::errors::{AppError, Result};
use serde::Deserialize;

/// Handle returned by the object store for an uploaded file.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredObject {
    pub url: String,
    pub public_id: String,
}

/// Capability consumed by the verification and listing workflows. The
/// workflows never implement storage themselves; they hold this seam so
/// tests can swap the HTTP client out.
#[axum::async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredObject>;

    async fn delete(&self, public_id: &str) -> Result<()>;
}

/// Client for the external object storage service.
pub struct HttpStorageService {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpStorageService {
    pub fn from_env() -> Self {
        let base_url = std::env::var("STORAGE_API_URL")
            .unwrap_or_else(|_| "http://localhost:9000".to_string());
        let api_key = std::env::var("STORAGE_API_KEY").unwrap_or_default();
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }
}

#[axum::async_trait]
impl ObjectStorage for HttpStorageService {
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredObject> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| AppError::StorageError(format!("Invalid content type: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::StorageError(format!("Upload request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::StorageError(format!(
                "Upload failed with status {}",
                response.status()
            )));
        }

        response
            .json::<StoredObject>()
            .await
            .map_err(|e| AppError::StorageError(format!("Invalid upload response: {}", e)))
    }

    async fn delete(&self, public_id: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/objects/{}", self.base_url, public_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::StorageError(format!("Delete request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::StorageError(format!(
                "Delete failed with status {}",
                response.status()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory stand-in for the object store used by workflow tests.
    #[derive(Default)]
    pub struct MemoryStorage {
        counter: AtomicUsize,
        pub deleted: Mutex<Vec<String>>,
    }

    #[axum::async_trait]
    impl ObjectStorage for MemoryStorage {
        async fn upload(
            &self,
            filename: &str,
            _content_type: &str,
            _bytes: Vec<u8>,
        ) -> Result<StoredObject> {
            let n = self.counter.fetch_add(1, Ordering::SeqCst);
            Ok(StoredObject {
                url: format!("https://cdn.test/{}-{}", n, filename),
                public_id: format!("obj-{}", n),
            })
        }

        async fn delete(&self, public_id: &str) -> Result<()> {
            self.deleted.lock().unwrap().push(public_id.to_string());
            Ok(())
        }
    }
}
