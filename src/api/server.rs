//! HTTP server implementation

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::documents::DocumentTextExtractor;
use crate::rag::LegalRagEngine;
use crate::Result;

/// Start the API server
pub async fn serve_api(config: &AppConfig, host: String, port: u16, enable_cors: bool) -> Result<()> {
    info!("🚀 Starting NyayaRAG API server...");

    // One engine for the whole process, shared by every request
    let engine = Arc::new(LegalRagEngine::new(config)?);
    let state = AppState::new(
        engine,
        Arc::new(DocumentTextExtractor),
        config.server.upload_dir.as_ref().map(PathBuf::from),
    );

    let mut server_config = config.server.clone();
    server_config.enable_cors = enable_cors;
    if enable_cors {
        info!("✅ CORS enabled");
    }
    let app = routes::build_router(state, &server_config);

    // Start server
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET  /api/health            - Health check");
    info!("  POST /api/chat/             - Legal question (JSON or multipart with document)");
    info!("  POST /api/analyze/          - Structured document analysis");
    info!("  POST /api/verify-contract/  - Clause-by-clause contract compliance");

    axum::serve(listener, app).await?;

    Ok(())
}
