//! Gemini `generateContent` REST client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;
use tracing::debug;

use super::SamplingConfig;
use super::TextGenerator;
use crate::config::LlmConfig;
use crate::errors::NyayaError;
use crate::errors::Result;

/// Client for the Gemini generative language API
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// # Errors
    /// - Missing API key
    /// - HTTP client build errors
    pub fn new(config: &LlmConfig) -> Result<Self> {
        if config.llm_key.trim().is_empty() {
            return Err(NyayaError::ConfigError(
                "llm.llm_key is not set (NYAYA__LLM__LLM_KEY)".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NyayaError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.llm_endpoint.trim_end_matches('/').to_string(),
            api_key: config.llm_key.clone(),
            model: config.llm_model.clone(),
        })
    }

    fn endpoint_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    fn build_request_body(prompt: &str, sampling: &SamplingConfig) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": sampling.temperature,
                "topP": sampling.top_p,
                "topK": sampling.top_k,
                "maxOutputTokens": sampling.max_output_tokens,
            }
        })
    }

    /// Concatenate the text parts of the first candidate
    fn parse_response(body: &Value) -> Result<String> {
        let candidate = body["candidates"]
            .as_array()
            .and_then(|c| c.first())
            .ok_or_else(|| {
                let reason = body["promptFeedback"]["blockReason"]
                    .as_str()
                    .unwrap_or("no candidates returned");
                NyayaError::GenerationError(format!("Empty generation: {reason}"))
            })?;

        let parts = candidate["content"]["parts"].as_array().ok_or_else(|| {
            let reason = candidate["finishReason"].as_str().unwrap_or("missing parts");
            NyayaError::GenerationError(format!("Candidate has no content: {reason}"))
        })?;

        let text: String = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .collect();

        Ok(text)
    }

    fn map_http_error(status: StatusCode, body_text: &str) -> NyayaError {
        match status.as_u16() {
            401 | 403 => NyayaError::GenerationError(format!(
                "Authentication with the generation API failed (HTTP {status})"
            )),
            429 => NyayaError::GenerationError("Generation quota exceeded (HTTP 429)".to_string()),
            _ => NyayaError::GenerationError(format!("HTTP {status} from generation API: {body_text}")),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, sampling: &SamplingConfig) -> Result<String> {
        let url = self.endpoint_url();
        debug!(model = self.model.as_str(), "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::build_request_body(prompt, sampling))
            .send()
            .await
            .map_err(|e| NyayaError::GenerationError(format!("Request to generation API failed: {e}")))?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|e| NyayaError::GenerationError(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(Self::map_http_error(status, &body_text));
        }

        let body: Value = serde_json::from_str(&body_text)
            .map_err(|e| NyayaError::GenerationError(format!("Invalid JSON in response: {e}")))?;

        Self::parse_response(&body)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
