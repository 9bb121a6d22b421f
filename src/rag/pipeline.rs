//! Complete legal RAG pipeline: Retrieve -> Generate -> Verify -> Respond

use std::sync::Arc;

use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::config::AppConfig;
use crate::config::PipelineConfig;
use crate::errors::Result;
use crate::llm::GeminiClient;
use crate::llm::GenerationClient;
use crate::llm::LegalPrompts;
use crate::models::GenerationOutcome;
use crate::models::ResponseEnvelope;
use crate::models::RetrievalResult;
use crate::rag::catalog::StaticFallbackCatalog;
use crate::rag::composer::ResponseComposer;
use crate::rag::grounding::GroundingVerifier;
use crate::rag::hybrid::HybridContextMerger;
use crate::rag::index::PrimaryIndexClient;
use crate::rag::retriever::RetrievalOrchestrator;
use crate::rag::web::web_search_from_config;
use crate::rag::web::OpenWebFallback;
use crate::rag::web::RestrictedWebFallback;

/// Legal question answering over the retrieval cascade
///
/// Built once at startup and shared behind an `Arc`; holds no per-request state.
pub struct LegalRagEngine {
    orchestrator: RetrievalOrchestrator,
    generation: GenerationClient,
    verifier: GroundingVerifier,
    open_web: OpenWebFallback,
    merger: HybridContextMerger,
    config: PipelineConfig,
}

impl LegalRagEngine {
    /// Create the engine with every capability built from configuration
    ///
    /// Absent index or web search configuration disables the matching tier;
    /// only a missing generation key is fatal.
    ///
    /// # Errors
    /// - `ConfigError` when the LLM key is missing or an endpoint is invalid
    /// - HTTP client build errors
    pub fn new(config: &AppConfig) -> Result<Self> {
        let index = PrimaryIndexClient::from_config(&config.search_index)?;
        let web = web_search_from_config(&config.web_search)?;
        let generation = GenerationClient::new(Arc::new(GeminiClient::new(&config.llm)?));

        let orchestrator = RetrievalOrchestrator::new(
            index,
            StaticFallbackCatalog::default(),
            RestrictedWebFallback::new(web.clone(), config.web_search.restricted.clone()),
        );
        let open_web = OpenWebFallback::new(web, config.web_search.open.clone());

        info!(
            "Legal RAG engine ready (model={}, index={}, web_search={})",
            generation.model_name(),
            if config.search_index.is_configured() { "configured" } else { "absent" },
            if config.web_search_endpoint().is_some() { "configured" } else { "absent" },
        );

        Ok(Self::from_parts(
            orchestrator,
            generation,
            open_web,
            config.pipeline.clone(),
        ))
    }

    /// Create from already-built capabilities
    #[must_use]
    pub fn from_parts(
        orchestrator: RetrievalOrchestrator,
        generation: GenerationClient,
        open_web: OpenWebFallback,
        config: PipelineConfig,
    ) -> Self {
        Self {
            orchestrator,
            generation,
            verifier: GroundingVerifier::new(config.grounding_failure_phrases.clone()),
            open_web,
            merger: HybridContextMerger::new(config.evidence_char_budget),
            config,
        }
    }

    /// Answer `query`, in hybrid mode when non-blank `evidence` is supplied
    pub async fn process(&self, query: &str, evidence: Option<&str>) -> ResponseEnvelope {
        match evidence.filter(|e| !e.trim().is_empty()) {
            Some(evidence) => self.process_query_with_evidence(query, evidence).await,
            None => self.process_query(query).await,
        }
    }

    /// Standard path: cascade retrieval, strict generation, grounding check
    ///
    /// Never fails; degraded outcomes are expressed through the envelope's
    /// confidence and note.
    pub async fn process_query(&self, query: &str) -> ResponseEnvelope {
        info!("Processing legal query: {}", query);

        debug!("Step 1: Retrieving evidence");
        let retrieval = self.orchestrator.retrieve(query, self.config.top_k).await;
        if retrieval.is_empty() {
            info!("No evidence from any tier, using open web fallback");
            return self.open_web.respond(query).await;
        }

        debug!("Step 2: Generating grounded answer from {} tier", retrieval.tier);
        let outcome = match self.generate_grounded(query, &retrieval).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Generation failed: {}", e);
                return ResponseComposer::compose_generation_error(&e.to_string());
            }
        };

        debug!("Step 3: Verifying grounding");
        if outcome.is_grounding_failure {
            warn!("Grounding failure: generator reported insufficient context, using open web fallback");
            return self.open_web.respond(query).await;
        }

        info!("Legal query answered from {} tier", retrieval.tier);
        ResponseComposer::compose_grounded(&retrieval, outcome)
    }

    /// Hybrid path: the uploaded document leads, retrieved provisions supplement
    pub async fn process_query_with_evidence(&self, query: &str, evidence: &str) -> ResponseEnvelope {
        let evidence_chars = evidence.chars().count();
        info!(
            "Processing legal query with uploaded evidence ({} chars): {}",
            evidence_chars, query
        );

        let legal_query = HybridContextMerger::legal_query(query);
        let provisions = self
            .orchestrator
            .retrieve(&legal_query, self.config.hybrid_top_k)
            .await;
        if provisions.is_empty() {
            debug!("No supplementary provisions found; answering from the document alone");
        }

        let prompt = self
            .merger
            .build_prompt(evidence, &provisions.combined_context, query);

        match self.generation.generate_interpretive(&prompt).await {
            Ok(text) => ResponseComposer::compose_hybrid(text, &provisions.sources, evidence_chars),
            Err(e) => {
                error!("Generation over uploaded evidence failed: {}", e);
                ResponseComposer::compose_hybrid_error(&e.to_string())
            }
        }
    }

    /// Retrieve only, without generation
    pub async fn retrieve(&self, query: &str, top_k: usize) -> RetrievalResult {
        self.orchestrator.retrieve(query, top_k).await
    }

    async fn generate_grounded(&self, query: &str, retrieval: &RetrievalResult) -> Result<GenerationOutcome> {
        let prompt = LegalPrompts::render_grounded(&retrieval.combined_context, query);
        let text = self.generation.generate_strict(&prompt).await?;
        let is_grounding_failure = self.verifier.is_grounding_failure(&text);
        Ok(GenerationOutcome {
            text,
            is_grounding_failure,
        })
    }

    #[must_use]
    pub const fn orchestrator(&self) -> &RetrievalOrchestrator {
        &self.orchestrator
    }

    #[must_use]
    pub const fn generation(&self) -> &GenerationClient {
        &self.generation
    }

    #[must_use]
    pub const fn verifier(&self) -> &GroundingVerifier {
        &self.verifier
    }

    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
