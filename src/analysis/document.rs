//! Structured analysis of an uploaded legal document

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use tracing::info;

use crate::errors::Result;
use crate::llm::GenerationClient;
use crate::llm::LegalPrompts;
use crate::rag::hybrid::truncate_chars;

/// The four fields requested from the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredAnalysis {
    pub summary: Value,
    pub key_clauses: Value,
    pub risks: Value,
    pub verdict: Value,
}

/// Parsed analysis, or the raw model output when it was not valid JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentReport {
    Structured(StructuredAnalysis),
    Raw { raw_text: String },
}

pub struct DocumentAnalyzer<'a> {
    generation: &'a GenerationClient,
    char_budget: usize,
}

impl<'a> DocumentAnalyzer<'a> {
    #[must_use]
    pub const fn new(generation: &'a GenerationClient, char_budget: usize) -> Self {
        Self {
            generation,
            char_budget,
        }
    }

    /// # Errors
    /// `GenerationError` when the model call fails
    pub async fn analyze(&self, document_text: &str) -> Result<DocumentReport> {
        let document = truncate_chars(document_text, self.char_budget);
        info!(
            "Analyzing document ({} of {} chars)",
            document.chars().count(),
            document_text.chars().count()
        );

        let prompt = LegalPrompts::document_analysis().render(&HashMap::from([("document", document)]));
        let output = self.generation.generate_analysis(&prompt).await?;
        Ok(parse_report(&output))
    }
}

/// Parse model output, tolerating a surrounding markdown code fence
#[must_use]
pub fn parse_report(output: &str) -> DocumentReport {
    let body = strip_code_fence(output);
    match serde_json::from_str::<StructuredAnalysis>(body) {
        Ok(analysis) => DocumentReport::Structured(analysis),
        Err(e) => {
            debug!("Analysis output is not structured JSON: {}", e);
            DocumentReport::Raw {
                raw_text: body.to_string(),
            }
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) on the opening fence line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
