//! Document analysis and contract verification handlers

use std::path::Path;

use crate::analysis::ContractVerifier;
use crate::analysis::DocumentAnalyzer;
use crate::cli::output::*;
use crate::documents::extract_file;
use crate::documents::DocumentTextExtractor;
use crate::rag::LegalRagEngine;
use crate::AppConfig;
use crate::Result;

pub async fn handle_analyze_command(config: &AppConfig, file: &Path) -> Result<()> {
    let engine = LegalRagEngine::new(config)?;
    let text = extract_file(&DocumentTextExtractor, file)?;
    print_info(&format!(
        "Analyzing {} ({} chars)",
        file.display(),
        text.chars().count()
    ));

    let report = DocumentAnalyzer::new(engine.generation(), config.pipeline.analysis_char_budget)
        .analyze(&text)
        .await?;
    print_document_report(&report);
    Ok(())
}

pub async fn handle_verify_command(config: &AppConfig, file: &Path, json: bool) -> Result<()> {
    let engine = LegalRagEngine::new(config)?;
    let text = extract_file(&DocumentTextExtractor, file)?;

    let report = ContractVerifier::new(&engine).verify(&text).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_compliance_report(&report);
    }
    Ok(())
}
