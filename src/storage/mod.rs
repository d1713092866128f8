//! Object storage for detected images
//!
//! Uploads always land in [`UPLOAD_FOLDER`]. The folder is checked before each
//! upload and created only when the backend reports it as missing; any other
//! check failure aborts the upload.

mod dropbox;
mod object;

pub use dropbox::{DropboxBackend, DropboxSettings};
pub use object::ObjectStoreBackend;

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

use crate::config::{StorageConfig, StorageProvider};

/// Fixed destination folder for every upload
pub const UPLOAD_FOLDER: &str = "/honey-badger";

/// Backend failure classified by kind, so callers never inspect provider errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("upload of {file_name} failed: {source}")]
    UploadFailed {
        file_name: String,
        #[source]
        source: BackendError,
    },

    #[error("upload of {file_name} timed out after {after:?}")]
    Timeout { file_name: String, after: Duration },

    #[error("storage misconfigured: {0}")]
    Configuration(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Provider operations the uploader is built from
#[async_trait]
pub trait ObjectBackend: Send + Sync {
    /// Metadata check for a folder path
    async fn check_folder(&self, path: &str) -> std::result::Result<(), BackendError>;

    async fn create_folder(&self, path: &str) -> std::result::Result<(), BackendError>;

    /// Writes a new object, failing with `AlreadyExists` instead of overwriting.
    /// Returns the provider's display path for the stored object.
    async fn upload_new(&self, path: &str, data: Bytes) -> std::result::Result<String, BackendError>;
}

/// Storage uploader over any [`ObjectBackend`]
#[derive(Clone)]
pub struct StorageClient {
    backend: Arc<dyn ObjectBackend>,
    timeout: Duration,
}

impl StorageClient {
    pub fn new(backend: Arc<dyn ObjectBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Build the configured backend
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let backend: Arc<dyn ObjectBackend> = match config.provider {
            StorageProvider::Memory => Arc::new(ObjectStoreBackend::in_memory()),
            StorageProvider::Local => {
                let root = config.root.as_ref().ok_or_else(|| {
                    StorageError::Configuration("local provider requires storage.root".into())
                })?;
                Arc::new(ObjectStoreBackend::local(root).map_err(StorageError::Configuration)?)
            }
            StorageProvider::Dropbox => {
                let access_token = config.access_token.clone().ok_or_else(|| {
                    StorageError::Configuration("dropbox provider requires an access token".into())
                })?;
                Arc::new(
                    DropboxBackend::new(DropboxSettings {
                        api_base: config.api_base.clone(),
                        content_base: config.content_base.clone(),
                        access_token,
                    })
                    .map_err(StorageError::Configuration)?,
                )
            }
        };

        Ok(Self::new(backend, config.timeout()))
    }

    /// Upload an image to `{UPLOAD_FOLDER}/{file_name}`, returning the stored path
    pub async fn upload_image(&self, data: Bytes, file_name: &str) -> Result<String> {
        info!(file_name, size = data.len(), "Uploading image to storage");

        let upload = async {
            self.ensure_folder().await?;
            let path = format!("{}/{}", UPLOAD_FOLDER, file_name);
            self.backend.upload_new(&path, data).await
        };

        let stored = match tokio::time::timeout(self.timeout, upload).await {
            Ok(Ok(stored)) => stored,
            Ok(Err(source)) => {
                error!(file_name, error = %source, "Error uploading image to storage");
                return Err(StorageError::UploadFailed {
                    file_name: file_name.to_string(),
                    source,
                });
            }
            Err(_) => {
                error!(file_name, timeout = ?self.timeout, "Storage upload timed out");
                return Err(StorageError::Timeout {
                    file_name: file_name.to_string(),
                    after: self.timeout,
                });
            }
        };

        info!(path = %stored, "Uploaded image to storage");
        Ok(stored)
    }

    async fn ensure_folder(&self) -> std::result::Result<(), BackendError> {
        match self.backend.check_folder(UPLOAD_FOLDER).await {
            Ok(()) => Ok(()),
            Err(BackendError::NotFound(_)) => {
                info!(folder = UPLOAD_FOLDER, "Creating folder");
                self.backend.create_folder(UPLOAD_FOLDER).await
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBackend {
        check_result: Option<BackendError>,
        upload_result: Option<BackendError>,
        upload_delay: Option<Duration>,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingBackend {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ObjectBackend for RecordingBackend {
        async fn check_folder(&self, path: &str) -> std::result::Result<(), BackendError> {
            self.calls.lock().unwrap().push(format!("check {path}"));
            match &self.check_result {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }

        async fn create_folder(&self, path: &str) -> std::result::Result<(), BackendError> {
            self.calls.lock().unwrap().push(format!("create {path}"));
            Ok(())
        }

        async fn upload_new(
            &self,
            path: &str,
            _data: Bytes,
        ) -> std::result::Result<String, BackendError> {
            self.calls.lock().unwrap().push(format!("upload {path}"));
            if let Some(delay) = self.upload_delay {
                tokio::time::sleep(delay).await;
            }
            match &self.upload_result {
                Some(e) => Err(e.clone()),
                None => Ok(path.to_string()),
            }
        }
    }

    fn client(backend: Arc<RecordingBackend>) -> StorageClient {
        StorageClient::new(backend, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn existing_folder_skips_creation() {
        let backend = Arc::new(RecordingBackend::default());
        let path = client(backend.clone())
            .upload_image(Bytes::from_static(b"img"), "a.jpg")
            .await
            .unwrap();

        assert_eq!(path, "/honey-badger/a.jpg");
        assert_eq!(
            backend.calls(),
            vec!["check /honey-badger", "upload /honey-badger/a.jpg"]
        );
    }

    #[tokio::test]
    async fn missing_folder_is_created_once_before_upload() {
        let backend = Arc::new(RecordingBackend {
            check_result: Some(BackendError::NotFound("/honey-badger".into())),
            ..Default::default()
        });

        client(backend.clone())
            .upload_image(Bytes::from_static(b"img"), "a.jpg")
            .await
            .unwrap();

        assert_eq!(
            backend.calls(),
            vec![
                "check /honey-badger",
                "create /honey-badger",
                "upload /honey-badger/a.jpg"
            ]
        );
    }

    #[tokio::test]
    async fn other_check_failure_aborts_upload() {
        let backend = Arc::new(RecordingBackend {
            check_result: Some(BackendError::Other("permission denied".into())),
            ..Default::default()
        });

        let err = client(backend.clone())
            .upload_image(Bytes::from_static(b"img"), "a.jpg")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StorageError::UploadFailed { source: BackendError::Other(_), .. }
        ));
        assert_eq!(backend.calls(), vec!["check /honey-badger"]);
    }

    #[tokio::test]
    async fn upload_conflict_is_reported() {
        let backend = Arc::new(RecordingBackend {
            upload_result: Some(BackendError::AlreadyExists("/honey-badger/a.jpg".into())),
            ..Default::default()
        });

        let err = client(backend)
            .upload_image(Bytes::from_static(b"img"), "a.jpg")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("a.jpg"));
        assert!(matches!(
            err,
            StorageError::UploadFailed { source: BackendError::AlreadyExists(_), .. }
        ));
    }

    #[tokio::test]
    async fn slow_upload_times_out() {
        let backend = Arc::new(RecordingBackend {
            upload_delay: Some(Duration::from_secs(5)),
            ..Default::default()
        });
        let storage = StorageClient::new(backend, Duration::from_millis(50));

        let err = storage
            .upload_image(Bytes::from_static(b"img"), "a.jpg")
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Timeout { .. }));
    }

    #[tokio::test]
    async fn in_memory_round_trip() {
        let storage = StorageClient::new(
            Arc::new(ObjectStoreBackend::in_memory()),
            Duration::from_secs(60),
        );

        let first = storage
            .upload_image(Bytes::from_static(b"one"), "a.jpg")
            .await
            .unwrap();
        assert_eq!(first, "/honey-badger/a.jpg");

        // "add" mode: a second write to the same name must not overwrite
        let err = storage
            .upload_image(Bytes::from_static(b"two"), "a.jpg")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::UploadFailed { source: BackendError::AlreadyExists(_), .. }
        ));
    }
}
