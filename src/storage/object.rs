//! Backend over the `object_store` crate (in-memory or local filesystem)
//!
//! Object stores have no real folders, so a folder is represented by an empty
//! marker object inside it.

use async_trait::async_trait;
use bytes::Bytes;
use object_store::{
    ObjectStore, PutMode, PutPayload, local::LocalFileSystem, memory::InMemory,
    path::Path as StoragePath,
};
use std::path::Path;
use std::sync::Arc;

use super::{BackendError, ObjectBackend};

const FOLDER_MARKER: &str = ".folder";

#[derive(Clone)]
pub struct ObjectStoreBackend {
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreBackend {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()))
    }

    /// Filesystem-backed store rooted at `root` (created if missing)
    pub fn local(root: &Path) -> Result<Self, String> {
        std::fs::create_dir_all(root)
            .map_err(|e| format!("cannot create {}: {}", root.display(), e))?;
        let store = LocalFileSystem::new_with_prefix(root).map_err(|e| e.to_string())?;
        Ok(Self::new(Arc::new(store)))
    }
}

fn storage_path(path: &str) -> StoragePath {
    StoragePath::from(path.trim_matches('/'))
}

fn marker_path(folder: &str) -> StoragePath {
    storage_path(folder).child(FOLDER_MARKER)
}

fn classify(path: &str, err: object_store::Error) -> BackendError {
    match err {
        object_store::Error::NotFound { .. } => BackendError::NotFound(path.to_string()),
        object_store::Error::AlreadyExists { .. } => BackendError::AlreadyExists(path.to_string()),
        other => BackendError::Other(other.to_string()),
    }
}

#[async_trait]
impl ObjectBackend for ObjectStoreBackend {
    async fn check_folder(&self, path: &str) -> Result<(), BackendError> {
        self.store
            .head(&marker_path(path))
            .await
            .map(|_| ())
            .map_err(|e| classify(path, e))
    }

    async fn create_folder(&self, path: &str) -> Result<(), BackendError> {
        match self
            .store
            .put_opts(&marker_path(path), PutPayload::new(), PutMode::Create.into())
            .await
        {
            Ok(_) => Ok(()),
            // Another request created it first
            Err(object_store::Error::AlreadyExists { .. }) => Ok(()),
            Err(e) => Err(classify(path, e)),
        }
    }

    async fn upload_new(&self, path: &str, data: Bytes) -> Result<String, BackendError> {
        let location = storage_path(path);
        self.store
            .put_opts(&location, PutPayload::from(data), PutMode::Create.into())
            .await
            .map_err(|e| classify(path, e))?;

        Ok(format!("/{}", location))
    }
}
