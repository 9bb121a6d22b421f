//! Final response envelopes

use crate::models::dedup_sources;
use crate::models::Confidence;
use crate::models::GenerationOutcome;
use crate::models::ResponseEnvelope;
use crate::models::ResponseMode;
use crate::models::RetrievalResult;
use crate::models::SourceRecord;
use crate::rag::hybrid::HybridContextMerger;

/// Assigns confidence and notes, and deduplicates citations
pub struct ResponseComposer;

impl ResponseComposer {
    /// Envelope for a generated answer over retrieved evidence
    #[must_use]
    pub fn compose_grounded(retrieval: &RetrievalResult, outcome: GenerationOutcome) -> ResponseEnvelope {
        let sources = dedup_sources(retrieval.sources.iter().cloned());
        let confidence = if !sources.is_empty() && !outcome.is_grounding_failure {
            Confidence::High
        } else {
            Confidence::Low
        };
        let note = format!("Response grounded in {} retrieved document(s)", sources.len());

        ResponseEnvelope {
            response: outcome.text,
            sources,
            confidence,
            note,
            mode: ResponseMode::Standard,
        }
    }

    /// Envelope when the generator call itself failed
    #[must_use]
    pub fn compose_generation_error(error: &str) -> ResponseEnvelope {
        ResponseEnvelope {
            response: format!(
                "An error occurred while generating the legal analysis: {error}. \
                 Please try again or consult a qualified lawyer."
            ),
            sources: Vec::new(),
            confidence: Confidence::Error,
            note: "Generation error".to_string(),
            mode: ResponseMode::Standard,
        }
    }

    /// Envelope for an answer over an uploaded document
    ///
    /// Confidence is `high` when retrieved provisions supplemented the
    /// document and `medium` when the document stood alone.
    #[must_use]
    pub fn compose_hybrid(
        text: String,
        provisions: &[SourceRecord],
        evidence_chars: usize,
    ) -> ResponseEnvelope {
        let sources = HybridContextMerger::merge_sources(provisions);
        let confidence = if sources.len() > 1 {
            Confidence::High
        } else {
            Confidence::Medium
        };

        ResponseEnvelope {
            response: text,
            sources,
            confidence,
            note: format!("LOCAL CONTEXT MODE: Answered from uploaded document ({evidence_chars} chars)"),
            mode: ResponseMode::LocalContextPriority,
        }
    }

    /// Envelope when hybrid generation failed
    #[must_use]
    pub fn compose_hybrid_error(error: &str) -> ResponseEnvelope {
        ResponseEnvelope {
            response: format!(
                "**ERROR ANALYZING UPLOADED DOCUMENT**\n\n\
                 An error occurred while analyzing your document: {error}\n\n\
                 Please try again or consult a qualified lawyer."
            ),
            sources: HybridContextMerger::merge_sources(&[]),
            confidence: Confidence::Error,
            note: "Error in local context processing".to_string(),
            mode: ResponseMode::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RetrievalTier;

    fn retrieval(sources: Vec<SourceRecord>) -> RetrievalResult {
        RetrievalResult {
            combined_context: "context".to_string(),
            sources,
            tier: RetrievalTier::Primary,
        }
    }

    fn outcome(failure: bool) -> GenerationOutcome {
        GenerationOutcome {
            text: "**CONCLUSION**".to_string(),
            is_grounding_failure: failure,
        }
    }

    #[test]
    fn test_grounded_answer_is_high_and_deduplicated() {
        let result = retrieval(vec![
            SourceRecord::new("IPC", "Section 420", Some(0.8)),
            SourceRecord::new("IPC", "Section 420", Some(0.6)),
        ]);
        let envelope = ResponseComposer::compose_grounded(&result, outcome(false));
        assert_eq!(envelope.confidence, Confidence::High);
        assert_eq!(envelope.sources.len(), 1);
        assert_eq!(envelope.note, "Response grounded in 1 retrieved document(s)");
        assert_eq!(envelope.mode, ResponseMode::Standard);
    }

    #[test]
    fn test_grounded_without_sources_or_with_failure_is_low() {
        let envelope = ResponseComposer::compose_grounded(&retrieval(Vec::new()), outcome(false));
        assert_eq!(envelope.confidence, Confidence::Low);

        let result = retrieval(vec![SourceRecord::new("IPC", "Section 420", None)]);
        let envelope = ResponseComposer::compose_grounded(&result, outcome(true));
        assert_eq!(envelope.confidence, Confidence::Low);
    }

    #[test]
    fn test_generation_error_envelope() {
        let envelope = ResponseComposer::compose_generation_error("quota exceeded");
        assert_eq!(envelope.confidence, Confidence::Error);
        assert!(envelope.response.contains("quota exceeded"));
        assert!(envelope.sources.is_empty());
        assert_eq!(envelope.note, "Generation error");
    }

    #[test]
    fn test_hybrid_confidence_depends_on_provisions() {
        let alone = ResponseComposer::compose_hybrid("answer".to_string(), &[], 120);
        assert_eq!(alone.confidence, Confidence::Medium);
        assert_eq!(alone.sources.len(), 1);
        assert_eq!(alone.note, "LOCAL CONTEXT MODE: Answered from uploaded document (120 chars)");

        let provisions = [SourceRecord::new("Indian Contract Act, 1872", "Section 73", Some(0.7))];
        let supplemented = ResponseComposer::compose_hybrid("answer".to_string(), &provisions, 120);
        assert_eq!(supplemented.confidence, Confidence::High);
        assert_eq!(supplemented.sources[1].document, "Indian Contract Act, 1872");
        assert_eq!(supplemented.mode, ResponseMode::LocalContextPriority);
    }

    #[test]
    fn test_hybrid_error_keeps_uploaded_source() {
        let envelope = ResponseComposer::compose_hybrid_error("timeout");
        assert_eq!(envelope.mode, ResponseMode::Error);
        assert_eq!(envelope.confidence, Confidence::Error);
        assert_eq!(envelope.sources[0].document, "Uploaded Document");
    }
}
