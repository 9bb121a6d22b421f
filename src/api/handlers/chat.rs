/// Chat handler: JSON questions or multipart questions with an uploaded document
use axum::extract::FromRequest;
use axum::extract::Multipart;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use tracing::info;
use uuid::Uuid;

use super::AppState;
use super::UploadForm;
use crate::api::types::ApiError;
use crate::api::types::ChatRequest;
use crate::api::types::ChatResponse;
use crate::documents::DocumentKind;
use crate::errors::NyayaError;

/// Chat (POST /api/chat/)
pub async fn chat(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<ChatResponse>, ApiError> {
    let request_id = Uuid::new_v4();

    let (message, upload) = if is_multipart(&request) {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
        let form = UploadForm::read(multipart).await?;
        (form.message.unwrap_or_default(), form.file)
    } else {
        let Json(req) = Json::<ChatRequest>::from_request(request, &state)
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
        (req.message, None)
    };

    let message = message.trim();
    if message.is_empty() {
        return Err(NyayaError::InvalidRequest("Message is required".to_string()).into());
    }

    let evidence = match upload {
        Some(upload) => {
            DocumentKind::from_filename(&upload.filename)?;
            info!(%request_id, "POST /api/chat/ with upload '{}'", upload.filename);
            Some(state.extract_upload(upload).await?)
        }
        None => {
            info!(%request_id, "POST /api/chat/");
            None
        }
    };

    let envelope = state.engine.process(message, evidence.as_deref()).await;
    info!(
        %request_id,
        confidence = envelope.confidence.as_str(),
        sources = envelope.sources.len(),
        "Chat answered"
    );

    Ok(Json(ChatResponse::from_envelope(envelope, evidence.is_some())))
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}
