//! Legal question handler

use std::path::Path;

use tracing::info;

use crate::cli::output::*;
use crate::documents::extract_file;
use crate::documents::DocumentTextExtractor;
use crate::rag::LegalRagEngine;
use crate::AppConfig;
use crate::Result;

pub async fn handle_ask_command(
    config: &AppConfig,
    query: &str,
    evidence: Option<&Path>,
    top_k: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut config = config.clone();
    if let Some(top_k) = top_k {
        config.pipeline.top_k = top_k.max(1);
    }
    let engine = LegalRagEngine::new(&config)?;

    let evidence_text = match evidence {
        Some(path) => {
            info!("Reading evidence from {}", path.display());
            let text = extract_file(&DocumentTextExtractor, path)?;
            if !json {
                print_info(&format!(
                    "Using {} as primary evidence ({} chars)",
                    path.display(),
                    text.chars().count()
                ));
            }
            Some(text)
        }
        None => None,
    };

    let envelope = engine.process(query, evidence_text.as_deref()).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else {
        print_envelope(&envelope);
    }

    Ok(())
}
