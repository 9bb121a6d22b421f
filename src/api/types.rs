//! API request and response types

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::NyayaError;
use crate::models::Confidence;
use crate::models::ResponseEnvelope;
use crate::models::ResponseMode;
use crate::models::SourceRecord;

/// Standard API response wrapper: `{status, data}` or `{status, message}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
}

/// JSON chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Chat answer, flattened from the response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub status: String,
    pub response: String,
    pub sources: Vec<SourceRecord>,
    pub confidence: Confidence,
    pub note: String,
    pub mode: ResponseMode,
    pub has_uploaded_context: bool,
    pub format: String,
}

impl ChatResponse {
    #[must_use]
    pub fn from_envelope(envelope: ResponseEnvelope, has_uploaded_context: bool) -> Self {
        Self {
            status: "success".to_string(),
            response: envelope.response,
            sources: envelope.sources,
            confidence: envelope.confidence,
            note: envelope.note,
            mode: envelope.mode,
            has_uploaded_context,
            format: "markdown".to_string(),
        }
    }
}

/// Error returned from a handler as `{status: "error", message}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<NyayaError> for ApiError {
    fn from(err: NyayaError) -> Self {
        let status = match &err {
            NyayaError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            NyayaError::ExtractionError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            NyayaError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            NyayaError::GenerationError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = match err {
            NyayaError::InvalidRequest(message) => message,
            other => other.to_string(),
        };
        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.message))).into_response()
    }
}
