//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the `NyayaRAG` CLI

use crate::analysis::ComplianceReport;
use crate::analysis::DocumentReport;
use crate::models::Confidence;
use crate::models::ResponseEnvelope;
use crate::AppConfig;

/// Safely truncate a string at character boundary (not byte boundary)
///
/// Truncated output gets a "..." suffix.
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Show only the tail of a secret
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count == 0 {
        return "(not set)".to_string();
    }
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("****{tail}")
}

fn confidence_badge(confidence: Confidence) -> &'static str {
    match confidence {
        Confidence::High => "🟢 high",
        Confidence::Medium => "🟡 medium",
        Confidence::MediumWeb => "🟠 medium-web",
        Confidence::Low => "🔴 low",
        Confidence::Error => "❌ error",
    }
}

/// Print an answer with its citations
pub fn print_envelope(envelope: &ResponseEnvelope) {
    println!("{}", envelope.response);
    println!();
    println!("─────────────────────────────────────────");
    println!("Confidence: {}", confidence_badge(envelope.confidence));
    println!("Note: {}", envelope.note);

    if envelope.sources.is_empty() {
        println!("Sources: none");
        return;
    }
    println!("Sources ({}):", envelope.sources.len());
    for (idx, source) in envelope.sources.iter().enumerate() {
        match source.relevance {
            Some(relevance) => println!(
                "  {}. {} | {} (relevance: {:.2})",
                idx + 1,
                source.document,
                truncate_str(&source.page, 80),
                relevance
            ),
            None => println!(
                "  {}. {} | {}",
                idx + 1,
                source.document,
                truncate_str(&source.page, 80)
            ),
        }
    }
}

/// Print a document analysis
pub fn print_document_report(report: &DocumentReport) {
    match report {
        DocumentReport::Structured(analysis) => {
            println!("📄 Document Analysis");
            println!();
            for (label, value) in [
                ("Summary", &analysis.summary),
                ("Key clauses", &analysis.key_clauses),
                ("Risks", &analysis.risks),
                ("Verdict", &analysis.verdict),
            ] {
                println!("{label}:");
                print_json_value(value, 1);
                println!();
            }
        }
        DocumentReport::Raw { raw_text } => {
            print_warning("Model output was not structured; showing it as is");
            println!("{raw_text}");
        }
    }
}

fn print_json_value(value: &serde_json::Value, indent: usize) {
    let pad = "  ".repeat(indent);
    match value {
        serde_json::Value::String(s) => println!("{pad}{s}"),
        serde_json::Value::Array(items) => {
            for item in items {
                match item {
                    serde_json::Value::String(s) => println!("{pad}• {s}"),
                    other => println!("{pad}• {other}"),
                }
            }
        }
        serde_json::Value::Object(map) => {
            for (key, val) in map {
                println!("{pad}{key}: {}", val.as_str().map_or_else(|| val.to_string(), ToString::to_string));
            }
        }
        other => println!("{pad}{other}"),
    }
}

/// Print a contract compliance report
pub fn print_compliance_report(report: &ComplianceReport) {
    println!("📑 Contract Verification: {}", report.contract_type);
    println!("Overall: {}", report.overall_compliance);
    println!(
        "Clauses analyzed: {} | Issues: {} | Risks: {}",
        report.total_clauses_analyzed, report.issues_found, report.risks_identified
    );
    println!();

    for (idx, clause) in report.clause_analysis.iter().enumerate() {
        let status = serde_json::to_value(clause.status)
            .ok()
            .and_then(|v| v.as_str().map(ToString::to_string))
            .unwrap_or_default();
        println!("{}. [{}] {}", idx + 1, status, truncate_str(&clause.clause, 100));
        println!("   → {}", clause.recommendation);
    }

    if !report.discrepancies.is_empty() {
        println!();
        println!("Discrepancies:");
        for discrepancy in &report.discrepancies {
            println!("  • {}", truncate_str(&discrepancy.clause, 60));
            for issue in &discrepancy.issues {
                println!("      - {issue}");
            }
        }
    }
}

/// Print configuration with secrets masked
pub fn print_config(config: &AppConfig) {
    println!("📋 NyayaRAG Configuration:");
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Directory: {}", config.logging.log_dir);
    println!();

    println!("🤖 LLM:");
    println!("  Endpoint: {}", config.llm_endpoint());
    println!("  Model: {}", config.llm_model());
    println!("  Key: {}", mask_secret(config.llm_key()));
    println!();

    println!("🔎 Search index:");
    if config.search_index.is_configured() {
        println!("  Endpoint: {}", config.search_index.api_endpoint());
        println!("  Project: {}", config.search_index.project_id);
        println!(
            "  Data store: {}",
            config.search_index.data_store_id.as_deref().unwrap_or_default()
        );
    } else {
        println!("  Not configured (static catalog and web fallbacks only)");
    }
    println!();

    println!("🌐 Web search:");
    println!("  Provider: {}", config.web_search.provider);
    println!("  Endpoint: {}", config.web_search_endpoint().unwrap_or("(disabled)"));
    println!(
        "  Restricted: {} ({})",
        config.web_search.restricted.enabled,
        config.web_search.restricted.domains.join(", ")
    );
    println!("  Open fallback: {}", config.web_search.open.enabled);
    println!();

    println!("⚙️  Pipeline:");
    println!("  top_k: {}", config.pipeline.top_k);
    println!("  Evidence budget: {} chars", config.pipeline.evidence_char_budget);
    println!("  Max contract clauses: {}", config.pipeline.max_contract_clauses);
    println!();

    println!("🖥️  Server:");
    println!("  Address: {}:{}", config.server.host, config.server.port);
    println!("  CORS: {}", config.server.enable_cors);
    println!("  Max upload: {} bytes", config.server.max_upload_bytes);
}

pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}

pub fn print_error(msg: &str) {
    eprintln!("❌ {msg}");
}
