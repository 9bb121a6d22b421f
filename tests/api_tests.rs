//! HTTP surface tests driven through the router without a listener

mod common;

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use common::*;
use http_body_util::BodyExt;
use nyayarag::api::build_router;
use nyayarag::api::handlers::AppState;
use nyayarag::config::ServerConfig;
use nyayarag::documents::DocumentTextExtractor;
use serde_json::json;
use serde_json::Value;
use tower::ServiceExt;

const BOUNDARY: &str = "nyaya-test-boundary";

fn scripted_generator() -> Arc<ScriptedGenerator> {
    ScriptedGenerator::with(|prompt| {
        if prompt.contains("Provide a JSON object") {
            Ok(json!({
                "summary": "A residential lease between two parties.",
                "key_clauses": ["Monthly rent", "Security deposit"],
                "risks": ["Deposit forfeiture"],
                "verdict": "Review the deposit clause."
            })
            .to_string())
        } else if prompt.contains("STATUS: COMPLIANT | NON-COMPLIANT | UNCLEAR") {
            Ok("STATUS: COMPLIANT\nISSUES: NONE\nRISK: NONE\nRECOMMENDATION: No change needed".to_string())
        } else {
            Ok("Based on the uploaded document, the monthly rent is Rs. 20,000.".to_string())
        }
    })
}

fn app(upload_dir: &Path) -> Router {
    app_with(upload_dir, &ServerConfig::default())
}

fn app_with(upload_dir: &Path, config: &ServerConfig) -> Router {
    let engine = engine(None, scripted_generator(), None);
    let state = AppState::new(
        Arc::new(engine),
        Arc::new(DocumentTextExtractor),
        Some(upload_dir.to_path_buf()),
    );
    build_router(state, config)
}

fn json_request(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Multipart request with an optional file part and an optional message part
fn multipart_request(uri: &str, file: Option<(&str, &[u8])>, message: Option<&str>) -> Request<Body> {
    let mut body = Vec::new();
    if let Some((filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    if let Some(message) = message {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"message\"\r\n\r\n{message}\r\n")
                .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn lease_docx() -> Vec<u8> {
    build_docx(&[
        "RENTAL AGREEMENT",
        "1. The tenant shall pay monthly rent of Rs. 20,000 to the landlord.",
        "2. The landlord shall refund the security deposit within 30 days of vacating.",
    ])
}

fn upload_dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder().uri("/api/health").body(Body::empty()).unwrap();

    let (status, body) = send(app(dir.path()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["model"], "scripted");
}

#[tokio::test]
async fn test_json_chat_returns_grounded_answer() {
    let dir = tempfile::tempdir().unwrap();
    let request = json_request(
        "/api/chat/",
        &json!({ "message": "What happens if my landlord won't return my security deposit?" }),
    );

    let (status, body) = send(app(dir.path()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["confidence"], "high");
    assert_eq!(body["format"], "markdown");
    assert_eq!(body["mode"], "standard");
    assert_eq!(body["has_uploaded_context"], false);
    assert_eq!(body["sources"][0]["document"], "Transfer of Property Act, 1882");
    assert_eq!(body["sources"][0]["page"], "Section 108");
}

#[tokio::test]
async fn test_chat_without_trailing_slash() {
    let dir = tempfile::tempdir().unwrap();
    let request = json_request("/api/chat", &json!({ "message": "My cheque bounced" }));

    let (status, body) = send(app(dir.path()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sources"][0]["document"], "Negotiable Instruments Act, 1881");
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let request = json_request("/api/chat/", &json!({ "message": "   " }));

    let (status, body) = send(app(dir.path()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Message is required");
}

#[tokio::test]
async fn test_chat_with_unsupported_upload() {
    let dir = tempfile::tempdir().unwrap();
    let request = multipart_request(
        "/api/chat/",
        Some(("notes.txt", &b"plain text notes"[..])),
        Some("Summarize my notes"),
    );

    let (status, body) = send(app(dir.path()), request).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["status"], "error");
    assert!(upload_dir_is_empty(dir.path()));
}

#[tokio::test]
async fn test_chat_with_uploaded_docx_uses_local_context() {
    let dir = tempfile::tempdir().unwrap();
    let docx = lease_docx();
    let request = multipart_request(
        "/api/chat/",
        Some(("lease.docx", docx.as_slice())),
        Some("What is the monthly rent?"),
    );

    let (status, body) = send(app(dir.path()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_uploaded_context"], true);
    assert_eq!(body["mode"], "local_context_priority");
    assert_eq!(body["sources"][0]["document"], "Uploaded Document");
    assert_eq!(body["sources"][0]["relevance"], 1.0);
    assert!(body["note"].as_str().unwrap().starts_with("LOCAL CONTEXT MODE"));
    assert!(upload_dir_is_empty(dir.path()));
}

#[tokio::test]
async fn test_corrupt_pdf_upload_is_unprocessable() {
    let dir = tempfile::tempdir().unwrap();
    let request = multipart_request(
        "/api/chat/",
        Some(("lease.pdf", &b"this is not a pdf"[..])),
        Some("What is the monthly rent?"),
    );

    let (status, body) = send(app(dir.path()), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "error");
    assert!(upload_dir_is_empty(dir.path()));
}

#[tokio::test]
async fn test_analyze_requires_file() {
    let dir = tempfile::tempdir().unwrap();
    let request = multipart_request("/api/analyze/", None, Some("no file here"));

    let (status, body) = send(app(dir.path()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No file provided");
}

#[tokio::test]
async fn test_oversized_upload_is_payload_too_large() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        max_upload_bytes: 1024,
        ..ServerConfig::default()
    };
    let oversized = vec![b'x'; 4096];
    let request = multipart_request("/api/analyze/", Some(("lease.docx", oversized.as_slice())), None);

    let (status, body) = send(app_with(dir.path(), &config), request).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["status"], "error");
    assert!(upload_dir_is_empty(dir.path()));
}

#[tokio::test]
async fn test_oversized_json_chat_is_payload_too_large() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        max_upload_bytes: 1024,
        ..ServerConfig::default()
    };
    let request = json_request("/api/chat/", &json!({ "message": "a".repeat(4096) }));

    let (status, _) = send(app_with(dir.path(), &config), request).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_analyze_returns_structured_report() {
    let dir = tempfile::tempdir().unwrap();
    let docx = lease_docx();
    let request = multipart_request("/api/analyze/", Some(("lease.docx", docx.as_slice())), None);

    let (status, body) = send(app(dir.path()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["summary"], "A residential lease between two parties.");
    assert_eq!(body["data"]["key_clauses"][1], "Security deposit");
}

#[tokio::test]
async fn test_verify_contract_reports_compliance() {
    let dir = tempfile::tempdir().unwrap();
    let docx = lease_docx();
    let request = multipart_request("/api/verify-contract/", Some(("lease.docx", docx.as_slice())), None);

    let (status, body) = send(app(dir.path()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["overall_compliance"], "COMPLIANT");
    assert_eq!(body["data"]["contract_type"], "Rental/Lease Agreement");
    assert_eq!(body["data"]["total_clauses_analyzed"], 2);
    assert_eq!(body["data"]["clause_analysis"][0]["status"], "COMPLIANT");
}
