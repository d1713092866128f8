//! Dropbox HTTP API backend
//!
//! Uses `files/get_metadata` as the folder check, `files/create_folder_v2`
//! and `files/upload` with `mode = add`. Endpoint errors come back as HTTP 409
//! with an `error_summary` such as `path/not_found/..` or `path/conflict/file/..`.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, StatusCode, header::CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{BackendError, ObjectBackend};

const API_ARG_HEADER: &str = "Dropbox-API-Arg";

#[derive(Debug, Clone)]
pub struct DropboxSettings {
    pub api_base: String,
    pub content_base: String,
    pub access_token: String,
}

/// Dropbox client; the connection pool is released when the backend is dropped
pub struct DropboxBackend {
    client: Client,
    api_base: String,
    content_base: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct EndpointError {
    #[serde(default)]
    error_summary: String,
}

#[derive(Debug, Deserialize)]
struct FileMetadata {
    path_display: Option<String>,
}

impl DropboxBackend {
    pub fn new(settings: DropboxSettings) -> Result<Self, String> {
        let client = Client::builder()
            .user_agent(concat!("badgerwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| e.to_string())?;

        Ok(Self {
            client,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            content_base: settings.content_base.trim_end_matches('/').to_string(),
            access_token: settings.access_token,
        })
    }

    fn rpc(&self, route: &str, arg: serde_json::Value) -> RequestBuilder {
        self.client
            .post(format!("{}/2/{}", self.api_base, route))
            .bearer_auth(&self.access_token)
            .json(&arg)
    }

    async fn execute(request: RequestBuilder) -> Result<(StatusCode, Bytes), BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Other(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| BackendError::Other(format!("failed to read body: {}", e)))?;

        Ok((status, body))
    }

    async fn send(request: RequestBuilder, path: &str) -> Result<Bytes, BackendError> {
        let (status, body) = Self::execute(request).await?;

        if status.is_success() {
            return Ok(body);
        }

        Err(classify(status, &body, path))
    }
}

fn error_summary(status: StatusCode, body: &[u8]) -> Option<String> {
    if status != StatusCode::CONFLICT {
        return None;
    }
    serde_json::from_slice::<EndpointError>(body)
        .ok()
        .map(|err| err.error_summary)
}

/// A folder already sitting at the path (not a file) counts as created
fn is_folder_conflict(status: StatusCode, body: &[u8]) -> bool {
    error_summary(status, body).is_some_and(|summary| summary.starts_with("path/conflict/folder"))
}

fn classify(status: StatusCode, body: &[u8], path: &str) -> BackendError {
    if let Some(summary) = error_summary(status, body) {
        if summary.starts_with("path/not_found") {
            return BackendError::NotFound(path.to_string());
        }
        if summary.starts_with("path/conflict") {
            return BackendError::AlreadyExists(path.to_string());
        }
        return BackendError::Other(format!("HTTP 409: {}", summary));
    }

    BackendError::Other(format!(
        "HTTP {}: {}",
        status.as_u16(),
        String::from_utf8_lossy(body)
    ))
}

/// Serialize a header argument, escaping non-ASCII as `\uXXXX`
fn header_safe_json(value: &serde_json::Value) -> String {
    let mut out = String::new();
    for c in value.to_string().chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut buf = [0u16; 2];
            for unit in c.encode_utf16(&mut buf) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

#[async_trait]
impl ObjectBackend for DropboxBackend {
    async fn check_folder(&self, path: &str) -> Result<(), BackendError> {
        let request = self.rpc("files/get_metadata", json!({ "path": path }));
        Self::send(request, path).await.map(|_| ())
    }

    async fn create_folder(&self, path: &str) -> Result<(), BackendError> {
        let request = self.rpc(
            "files/create_folder_v2",
            json!({ "path": path, "autorename": false }),
        );
        let (status, body) = Self::execute(request).await?;

        if status.is_success() {
            debug!(path, "Folder created");
            return Ok(());
        }

        // Another request created it between our check and this call
        if is_folder_conflict(status, &body) {
            debug!(path, "Folder already exists");
            return Ok(());
        }

        Err(classify(status, &body, path))
    }

    async fn upload_new(&self, path: &str, data: Bytes) -> Result<String, BackendError> {
        let arg = json!({
            "path": path,
            "mode": "add",
            "autorename": false,
            "mute": false,
        });

        let request = self
            .client
            .post(format!("{}/2/files/upload", self.content_base))
            .bearer_auth(&self.access_token)
            .header(API_ARG_HEADER, header_safe_json(&arg))
            .header(CONTENT_TYPE, mime::APPLICATION_OCTET_STREAM.as_ref())
            .body(data);

        let body = Self::send(request, path).await?;
        let metadata: FileMetadata = serde_json::from_slice(&body)
            .map_err(|e| BackendError::Other(format!("invalid upload response: {}", e)))?;

        Ok(metadata.path_display.unwrap_or_else(|| path.to_string()))
    }
}
