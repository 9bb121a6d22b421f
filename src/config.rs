use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: "logs".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub llm_endpoint: String,
    pub llm_key: String,
    pub llm_model: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            llm_endpoint: default_llm_endpoint(),
            llm_key: String::new(),
            llm_model: default_llm_model(),
            timeout_secs: 120,
        }
    }
}

fn default_llm_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_llm_model() -> String {
    "gemini-pro-latest".to_string()
}

/// Structured search index (Vertex AI Search style data store)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchIndexConfig {
    pub project_id: String,
    pub location: String,
    /// Absent or empty means the index is unconfigured
    pub data_store_id: Option<String>,
    pub access_token: Option<String>,
    /// Overrides the endpoint derived from `location`
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SearchIndexConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            location: "global".to_string(),
            data_store_id: None,
            access_token: None,
            endpoint: None,
            timeout_secs: 30,
        }
    }
}

impl SearchIndexConfig {
    /// Whether every field needed to issue a search is present
    #[must_use]
    pub fn is_configured(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.data_store_id) && present(&self.access_token) && !self.project_id.is_empty()
    }

    /// Base URL of the search API
    #[must_use]
    pub fn api_endpoint(&self) -> String {
        if let Some(endpoint) = self.endpoint.as_deref().filter(|e| !e.is_empty()) {
            return endpoint.trim_end_matches('/').to_string();
        }
        if self.location == "global" {
            "https://discoveryengine.googleapis.com".to_string()
        } else {
            format!("https://{}-discoveryengine.googleapis.com", self.location)
        }
    }
}

/// Upper bound on restricted web results; relevance is defined for ranks 1 to 3
pub const MAX_RESTRICTED_RESULTS: usize = 3;

/// Domain-restricted web search used when index and catalog come up empty
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestrictedWebConfig {
    pub enabled: bool,
    pub domains: Vec<String>,
    pub max_results: usize,
}

impl Default for RestrictedWebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            domains: vec![
                "gov.in".to_string(),
                "indiankanoon.org".to_string(),
                "legislative.gov.in".to_string(),
            ],
            max_results: 3,
        }
    }
}

/// Unrestricted web search used after a grounding failure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenWebConfig {
    pub enabled: bool,
    /// `{query}` is replaced with the user's question
    pub query_template: String,
    pub max_results: usize,
    pub display_results: usize,
}

impl Default for OpenWebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            query_template: "Indian law {query} legal penalty provisions sections".to_string(),
            max_results: 5,
            display_results: 3,
        }
    }
}

/// Backend behind both web fallbacks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebSearchProvider {
    /// Google Programmable Search JSON API; needs `api_key` and `engine_id`
    #[default]
    GoogleCse,
    /// SearxNG instance with the JSON output format enabled; needs `endpoint`
    Searxng,
    /// DuckDuckGo instant answers. Returns topic summaries only and does not
    /// honor `site:` filters, so restricted results may come from any domain.
    #[serde(rename = "duckduckgo")]
    DuckDuckGo,
}

impl WebSearchProvider {
    /// Endpoint used when `web_search.endpoint` is unset
    #[must_use]
    pub fn default_endpoint(self) -> Option<&'static str> {
        match self {
            Self::GoogleCse => Some("https://www.googleapis.com/customsearch/v1"),
            Self::Searxng => None,
            Self::DuckDuckGo => Some("https://api.duckduckgo.com/"),
        }
    }
}

impl std::fmt::Display for WebSearchProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GoogleCse => write!(f, "google_cse"),
            Self::Searxng => write!(f, "searxng"),
            Self::DuckDuckGo => write!(f, "duckduckgo"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSearchConfig {
    pub provider: WebSearchProvider,
    /// Overrides the provider's default endpoint; an empty string disables web search
    pub endpoint: Option<String>,
    /// Google Programmable Search API key
    pub api_key: Option<String>,
    /// Google Programmable Search engine id (`cx`)
    pub engine_id: Option<String>,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub restricted: RestrictedWebConfig,
    pub open: OpenWebConfig,
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            provider: WebSearchProvider::default(),
            endpoint: None,
            api_key: None,
            engine_id: None,
            user_agent: concat!("nyayarag/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
            restricted: RestrictedWebConfig::default(),
            open: OpenWebConfig::default(),
        }
    }
}

impl WebSearchConfig {
    /// Explicit endpoint, else the provider default
    #[must_use]
    pub fn endpoint_url(&self) -> Option<&str> {
        match self.endpoint.as_deref() {
            Some(endpoint) => Some(endpoint.trim()).filter(|e| !e.is_empty()),
            None => self.provider.default_endpoint(),
        }
    }

    /// Check whether the provider has everything it needs
    #[must_use]
    pub fn is_configured(&self) -> bool {
        let has = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());
        match self.provider {
            WebSearchProvider::GoogleCse => {
                self.endpoint_url().is_some() && has(&self.api_key) && has(&self.engine_id)
            }
            WebSearchProvider::Searxng | WebSearchProvider::DuckDuckGo => self.endpoint_url().is_some(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub top_k: usize,
    pub hybrid_top_k: usize,
    /// Characters of uploaded evidence passed to generation
    pub evidence_char_budget: usize,
    /// Characters of an uploaded document passed to the analysis prompt
    pub analysis_char_budget: usize,
    pub max_contract_clauses: usize,
    pub grounding_failure_phrases: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            hybrid_top_k: 2,
            evidence_char_budget: 6000,
            analysis_char_budget: 12000,
            max_contract_clauses: 12,
            grounding_failure_phrases: default_failure_phrases(),
        }
    }
}

pub(crate) fn default_failure_phrases() -> Vec<String> {
    [
        "OUT OF SCOPE",
        "outside the scope of the indexed",
        "I do not have enough information",
        "insufficient information in the context",
        "not found in the retrieved context",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    /// Directory for upload temp files; system temp dir when unset
    pub upload_dir: Option<String>,
    pub max_upload_bytes: usize,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            enable_cors: true,
            upload_dir: None,
            max_upload_bytes: 20 * 1024 * 1024,
            request_timeout_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub llm: LlmConfig,
    pub search_index: SearchIndexConfig,
    pub web_search: WebSearchConfig,
    pub pipeline: PipelineConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `config.toml` (optional) overlaid with `NYAYA__*` env vars
    ///
    /// `NYAYA__LLM__LLM_KEY=...` sets `llm.llm_key`.
    pub fn load() -> crate::Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    /// Same as [`AppConfig::load`] with an explicit file path
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix("NYAYA")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("web_search.restricted.domains")
                    .with_list_parse_key("pipeline.grounding_failure_phrases")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the pipeline misbehave
    pub fn validate(&self) -> crate::Result<()> {
        if self.pipeline.top_k == 0 {
            return Err(crate::NyayaError::ConfigError(
                "pipeline.top_k must be at least 1".to_string(),
            ));
        }
        if self.pipeline.evidence_char_budget == 0 {
            return Err(crate::NyayaError::ConfigError(
                "pipeline.evidence_char_budget must be at least 1".to_string(),
            ));
        }
        if !(1..=MAX_RESTRICTED_RESULTS).contains(&self.web_search.restricted.max_results) {
            return Err(crate::NyayaError::ConfigError(format!(
                "web_search.restricted.max_results must be between 1 and {MAX_RESTRICTED_RESULTS}"
            )));
        }
        if self.pipeline.grounding_failure_phrases.iter().any(|p| p.trim().is_empty()) {
            return Err(crate::NyayaError::ConfigError(
                "pipeline.grounding_failure_phrases must not contain empty phrases".to_string(),
            ));
        }
        Ok(())
    }

    /// Get LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.llm_endpoint
    }

    /// Get LLM key
    pub fn llm_key(&self) -> &str {
        &self.llm.llm_key
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.llm_model
    }

    /// Get web search endpoint, if web search is enabled
    pub fn web_search_endpoint(&self) -> Option<&str> {
        self.web_search.endpoint_url().filter(|_| self.web_search.is_configured())
    }
}
