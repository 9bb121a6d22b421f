/// API request handlers
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::Multipart;
use axum::Json;
use tracing::debug;

use crate::api::types::ApiError;
use crate::api::types::ApiResponse;
use crate::api::types::HealthResponse;
use crate::documents::TextExtractor;
use crate::documents::UploadedFile;
use crate::rag::LegalRagEngine;

pub mod chat;
pub mod documents;

pub use chat::*;
pub use documents::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<LegalRagEngine>,
    pub extractor: Arc<dyn TextExtractor>,
    pub upload_dir: Option<PathBuf>,
}

impl AppState {
    #[must_use]
    pub fn new(
        engine: Arc<LegalRagEngine>,
        extractor: Arc<dyn TextExtractor>,
        upload_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            engine,
            extractor,
            upload_dir,
        }
    }

    /// Persist an upload to a temp file, extract its text, and delete the file
    ///
    /// Runs on the blocking pool; the temp file is removed on every path.
    pub async fn extract_upload(&self, upload: FileUpload) -> Result<String, ApiError> {
        let upload_dir = self.upload_dir.clone();
        let extractor = self.extractor.clone();

        tokio::task::spawn_blocking(move || {
            let stored = UploadedFile::store(upload_dir.as_deref(), &upload.filename, &upload.bytes)?;
            stored.extract_text(extractor.as_ref())
        })
        .await
        .map_err(|e| ApiError::internal(format!("document extraction task failed: {e}")))?
        .map_err(ApiError::from)
    }
}

/// A file field read from a multipart body
#[derive(Debug)]
pub struct FileUpload {
    pub filename: String,
    pub bytes: Bytes,
}

/// The `file` and `message` fields of a multipart form
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<FileUpload>,
    pub message: Option<String>,
}

impl UploadForm {
    /// Read all fields; unknown fields are skipped
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::new(e.status(), format!("invalid multipart body: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    let filename = field.file_name().unwrap_or("document").to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::new(e.status(), format!("failed to read file data: {e}")))?;
                    debug!("Received upload '{}' ({} bytes)", filename, bytes.len());
                    form.file = Some(FileUpload { filename, bytes });
                }
                "message" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| ApiError::new(e.status(), format!("failed to read message: {e}")))?;
                    form.message = Some(text);
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// The file field, or 400 when it is missing
    pub fn require_file(self) -> Result<FileUpload, ApiError> {
        self.file
            .ok_or_else(|| ApiError::bad_request("No file provided"))
    }
}

/// Health check handler
pub async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.engine.generation().model_name().to_string(),
    }))
}
