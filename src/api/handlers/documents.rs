/// Document analysis and contract verification handlers
use axum::extract::Multipart;
use axum::extract::State;
use axum::Json;
use tracing::error;
use tracing::info;

use super::AppState;
use super::UploadForm;
use crate::analysis::ComplianceReport;
use crate::analysis::ContractVerifier;
use crate::analysis::DocumentAnalyzer;
use crate::analysis::DocumentReport;
use crate::api::types::ApiError;
use crate::api::types::ApiResponse;
use crate::documents::DocumentKind;

/// Analyze a document (POST /api/analyze/)
pub async fn analyze_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<DocumentReport>>, ApiError> {
    let upload = UploadForm::read(multipart).await?.require_file()?;
    DocumentKind::from_filename(&upload.filename)?;
    info!("POST /api/analyze/: {}", upload.filename);

    let text = state.extract_upload(upload).await?;
    let analyzer = DocumentAnalyzer::new(
        state.engine.generation(),
        state.engine.config().analysis_char_budget,
    );

    match analyzer.analyze(&text).await {
        Ok(report) => Ok(Json(ApiResponse::success(report))),
        Err(e) => {
            error!("Error analyzing document: {}", e);
            Err(e.into())
        }
    }
}

/// Verify a contract (POST /api/verify-contract/)
pub async fn verify_contract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ComplianceReport>>, ApiError> {
    let upload = UploadForm::read(multipart).await?.require_file()?;
    DocumentKind::from_filename(&upload.filename)?;
    info!("POST /api/verify-contract/: {}", upload.filename);

    let text = state.extract_upload(upload).await?;
    let report = ContractVerifier::new(&state.engine).verify(&text).await;

    Ok(Json(ApiResponse::success(report)))
}
