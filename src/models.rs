//! Shared data shapes for retrieval, generation and response assembly

use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Separator placed between chunks in a combined context string
pub const CHUNK_SEPARATOR: &str = "\n\n---\n\n";

/// A piece of evidence produced by a retrieval tier
#[derive(Debug, Clone, PartialEq)]
pub struct ContextChunk {
    pub text: String,
    pub source_filename: String,
    pub source_page: String,
    pub relevance: Option<f64>,
}

impl ContextChunk {
    pub fn new(
        text: impl Into<String>,
        source_filename: impl Into<String>,
        source_page: impl Into<String>,
        relevance: Option<f64>,
    ) -> Self {
        Self {
            text: text.into(),
            source_filename: source_filename.into(),
            source_page: source_page.into(),
            relevance,
        }
    }

    /// Provenance of this chunk as a citation
    #[must_use]
    pub fn source_record(&self) -> SourceRecord {
        SourceRecord {
            document: self.source_filename.clone(),
            page: self.source_page.clone(),
            relevance: self.relevance,
        }
    }
}

/// Citation metadata surfaced to the caller, unique by `(document, page)` within a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub document: String,
    pub page: String,
    pub relevance: Option<f64>,
}

impl SourceRecord {
    pub fn new(document: impl Into<String>, page: impl Into<String>, relevance: Option<f64>) -> Self {
        Self {
            document: document.into(),
            page: page.into(),
            relevance,
        }
    }

    fn key(&self) -> (&str, &str) {
        (&self.document, &self.page)
    }
}

/// Remove records sharing `(document, page)`, keeping the first occurrence in order
#[must_use]
pub fn dedup_sources(sources: impl IntoIterator<Item = SourceRecord>) -> Vec<SourceRecord> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut unique = Vec::new();
    for source in sources {
        let (document, page) = source.key();
        if seen.insert((document.to_string(), page.to_string())) {
            unique.push(source);
        }
    }
    unique
}

/// Retrieval cascade stage that produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RetrievalTier {
    Primary,
    StaticFallback,
    WebRestricted,
    None,
}

impl fmt::Display for RetrievalTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Primary => "PRIMARY",
            Self::StaticFallback => "STATIC_FALLBACK",
            Self::WebRestricted => "WEB_RESTRICTED",
            Self::None => "NONE",
        };
        f.write_str(name)
    }
}

/// Evidence gathered for one query
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalResult {
    pub combined_context: String,
    pub sources: Vec<SourceRecord>,
    pub tier: RetrievalTier,
}

impl RetrievalResult {
    /// Result when every tier came up empty
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            combined_context: String::new(),
            sources: Vec::new(),
            tier: RetrievalTier::None,
        }
    }

    /// Join chunks from the winning tier; an empty chunk list yields [`RetrievalResult::empty`]
    #[must_use]
    pub fn from_chunks(chunks: &[ContextChunk], tier: RetrievalTier) -> Self {
        if chunks.is_empty() {
            return Self::empty();
        }
        let combined_context = chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(CHUNK_SEPARATOR);
        Self {
            combined_context,
            sources: dedup_sources(chunks.iter().map(ContextChunk::source_record)),
            tier,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.combined_context.trim().is_empty()
    }
}

/// Generated answer plus the grounding verdict on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub text: String,
    pub is_grounding_failure: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    #[serde(rename = "high")]
    High,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "medium-web")]
    MediumWeb,
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "error")]
    Error,
}

impl Confidence {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::MediumWeb => "medium-web",
            Self::Low => "low",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    Standard,
    LocalContextPriority,
    Error,
}

/// The answer returned to the caller; built once per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub response: String,
    pub sources: Vec<SourceRecord>,
    pub confidence: Confidence,
    pub note: String,
    pub mode: ResponseMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, doc: &str, page: &str, relevance: f64) -> ContextChunk {
        ContextChunk::new(text, doc, page, Some(relevance))
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_in_order() {
        let sources = vec![
            SourceRecord::new("IPC", "Section 420", Some(0.8)),
            SourceRecord::new("CrPC", "Section 41", Some(0.7)),
            SourceRecord::new("IPC", "Section 420", Some(0.5)),
            SourceRecord::new("IPC", "Section 406", Some(0.4)),
        ];
        let unique = dedup_sources(sources);
        assert_eq!(unique.len(), 3);
        assert_eq!(unique[0].relevance, Some(0.8));
        assert_eq!(unique[1].document, "CrPC");
        assert_eq!(unique[2].page, "Section 406");
    }

    #[test]
    fn test_from_chunks_joins_with_separator() {
        let chunks = vec![
            chunk("first", "A", "1", 0.9),
            chunk("second", "A", "1", 0.8),
            chunk("third", "B", "2", 0.7),
        ];
        let result = RetrievalResult::from_chunks(&chunks, RetrievalTier::Primary);
        assert_eq!(result.combined_context, "first\n\n---\n\nsecond\n\n---\n\nthird");
        assert_eq!(result.sources.len(), 2);
        assert_eq!(result.tier, RetrievalTier::Primary);
    }

    #[test]
    fn test_from_no_chunks_is_empty_tier_none() {
        let result = RetrievalResult::from_chunks(&[], RetrievalTier::WebRestricted);
        assert!(result.is_empty());
        assert_eq!(result.tier, RetrievalTier::None);
    }

    #[test]
    fn test_confidence_serializes_to_wire_labels() {
        let json = serde_json::to_string(&Confidence::MediumWeb).unwrap();
        assert_eq!(json, "\"medium-web\"");
        let mode = serde_json::to_string(&ResponseMode::LocalContextPriority).unwrap();
        assert_eq!(mode, "\"local_context_priority\"");
    }

    #[test]
    fn test_source_without_relevance_serializes_null() {
        let value = serde_json::to_value(SourceRecord::new("Web", "External Web Search", None)).unwrap();
        assert!(value["relevance"].is_null());
    }
}
