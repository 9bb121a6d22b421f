//! Merging of uploaded-document evidence with supplementary legal provisions

use std::collections::HashMap;

use crate::llm::LegalPrompts;
use crate::models::dedup_sources;
use crate::models::SourceRecord;

/// Citation attached to every hybrid answer, ahead of any retrieved source
pub const UPLOADED_DOCUMENT: &str = "Uploaded Document";
pub const UPLOADED_DOCUMENT_PAGE: &str = "User Upload (Local Context)";

const NO_PROVISIONS: &str =
    "No additional legal provisions found in database. Answer using the uploaded document only.";

/// Builds the local-context-priority prompt and its source list
#[derive(Debug, Clone, Copy)]
pub struct HybridContextMerger {
    evidence_char_budget: usize,
}

impl HybridContextMerger {
    #[must_use]
    pub const fn new(evidence_char_budget: usize) -> Self {
        Self {
            evidence_char_budget,
        }
    }

    /// Secondary retrieval query derived from the user's question
    #[must_use]
    pub fn legal_query(query: &str) -> String {
        format!("What laws, acts, and legal provisions are relevant to: {query}")
    }

    /// Evidence cut to the budget, counted in characters
    #[must_use]
    pub fn truncate_evidence<'a>(&self, evidence: &'a str) -> &'a str {
        truncate_chars(evidence, self.evidence_char_budget)
    }

    /// Render the prompt; evidence is truncated, empty provisions get a placeholder
    #[must_use]
    pub fn build_prompt(&self, evidence: &str, provisions: &str, query: &str) -> String {
        let provisions = if provisions.trim().is_empty() {
            NO_PROVISIONS
        } else {
            provisions
        };
        let values = HashMap::from([
            ("evidence", self.truncate_evidence(evidence)),
            ("provisions", provisions),
            ("query", query),
        ]);
        LegalPrompts::local_context_answer().render(&values)
    }

    /// Uploaded document first with relevance 1.0, then retrieved sources, deduplicated
    #[must_use]
    pub fn merge_sources(retrieved: &[SourceRecord]) -> Vec<SourceRecord> {
        let uploaded = SourceRecord::new(UPLOADED_DOCUMENT, UPLOADED_DOCUMENT_PAGE, Some(1.0));
        dedup_sources(std::iter::once(uploaded).chain(retrieved.iter().cloned()))
    }
}

/// Longest prefix of `text` holding at most `max_chars` characters
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
