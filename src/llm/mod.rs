//! Text generation: the capability trait, a Gemini REST client, and prompt templates
//!
//! Call sites never choose decoding parameters ad hoc. Each one goes through
//! [`GenerationClient`], which pins the sampling preset for its purpose:
//! strict legal grounding, document interpretation, or structured analysis.

pub mod client;
pub mod prompts;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

pub use client::GeminiClient;
pub use prompts::LegalPrompts;
pub use prompts::PromptTemplate;

use crate::errors::Result;

/// Decoding parameters passed with each generation call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl SamplingConfig {
    /// Minimum randomness for answers that must stay inside retrieved context
    pub const STRICT: Self = Self {
        temperature: 0.0,
        top_p: 0.8,
        top_k: 20,
        max_output_tokens: 2048,
    };

    /// Slightly looser decoding for reading a user-supplied document
    pub const INTERPRETIVE: Self = Self {
        temperature: 0.1,
        top_p: 0.2,
        top_k: 1,
        max_output_tokens: 2048,
    };

    /// Structured JSON summaries of uploaded documents
    pub const ANALYSIS: Self = Self {
        temperature: 0.2,
        top_p: 0.8,
        top_k: 40,
        max_output_tokens: 2048,
    };
}

/// A backend able to turn a prompt into text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// # Errors
    /// `NyayaError::GenerationError` on transport, auth, quota or malformed responses
    async fn generate(&self, prompt: &str, sampling: &SamplingConfig) -> Result<String>;

    fn model_name(&self) -> &str;
}

/// Generation entry point used by the pipeline, one method per fixed sampling preset
#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn TextGenerator>,
}

impl GenerationClient {
    #[must_use]
    pub fn new(backend: Arc<dyn TextGenerator>) -> Self {
        Self { backend }
    }

    /// Grounded legal answer from retrieved provisions
    pub async fn generate_strict(&self, prompt: &str) -> Result<String> {
        self.generate(prompt, &SamplingConfig::STRICT).await
    }

    /// Answer about an uploaded document (hybrid mode)
    pub async fn generate_interpretive(&self, prompt: &str) -> Result<String> {
        self.generate(prompt, &SamplingConfig::INTERPRETIVE).await
    }

    /// Structured document analysis
    pub async fn generate_analysis(&self, prompt: &str) -> Result<String> {
        self.generate(prompt, &SamplingConfig::ANALYSIS).await
    }

    async fn generate(&self, prompt: &str, sampling: &SamplingConfig) -> Result<String> {
        debug!(
            model = self.backend.model_name(),
            temperature = sampling.temperature,
            prompt_chars = prompt.len(),
            "Calling text generation"
        );
        self.backend.generate(prompt, sampling).await
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct RecordingGenerator {
        seen: Mutex<Vec<SamplingConfig>>,
    }

    #[async_trait]
    impl TextGenerator for RecordingGenerator {
        async fn generate(&self, _prompt: &str, sampling: &SamplingConfig) -> Result<String> {
            self.seen.lock().unwrap().push(*sampling);
            Ok("ok".to_string())
        }

        fn model_name(&self) -> &str {
            "recording"
        }
    }

    #[tokio::test]
    async fn test_each_call_site_uses_its_preset() {
        let backend = Arc::new(RecordingGenerator {
            seen: Mutex::new(Vec::new()),
        });
        let client = GenerationClient::new(backend.clone());

        client.generate_strict("a").await.unwrap();
        client.generate_interpretive("b").await.unwrap();
        client.generate_analysis("c").await.unwrap();

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen[0], SamplingConfig::STRICT);
        assert_eq!(seen[1], SamplingConfig::INTERPRETIVE);
        assert_eq!(seen[2], SamplingConfig::ANALYSIS);
        assert!(seen[0].temperature < seen[1].temperature);
    }
}
