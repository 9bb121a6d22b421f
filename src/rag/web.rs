//! Web-search based evidence fallbacks
//!
//! Two strategies share one [`WebSearch`] capability but are reached from
//! different pipeline states:
//! - [`RestrictedWebFallback`] is the last retrieval tier when index and
//!   catalog are empty. It yields context chunks for generation.
//! - [`OpenWebFallback`] runs after the generator admits it could not ground
//!   an answer. It renders a response envelope directly, without generation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use tracing::info;
use tracing::warn;
use url::Url;

use crate::config::OpenWebConfig;
use crate::config::RestrictedWebConfig;
use crate::config::WebSearchConfig;
use crate::config::WebSearchProvider;
use crate::config::MAX_RESTRICTED_RESULTS;
use crate::errors::NyayaError;
use crate::errors::Result;
use crate::models::dedup_sources;
use crate::models::Confidence;
use crate::models::ContextChunk;
use crate::models::ResponseEnvelope;
use crate::models::ResponseMode;
use crate::models::SourceRecord;

const RULE: &str = "═══════════════════════════════════════════════════════════";

/// One web search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebHit {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

/// A general web search backend
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// # Errors
    /// `RetrievalUnavailable` on transport or response errors
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<WebHit>>;
}

/// Build the shared web search capability, or `None` when it is disabled
///
/// # Errors
/// - `ConfigError` for an invalid endpoint URL
pub fn web_search_from_config(config: &WebSearchConfig) -> Result<Option<Arc<dyn WebSearch>>> {
    let Some(endpoint) = config.endpoint_url().filter(|_| config.is_configured()) else {
        debug!(
            "Web search provider {} not configured; web fallbacks disabled",
            config.provider
        );
        return Ok(None);
    };

    let client = http_client(&config.user_agent, config.timeout_secs)?;
    let endpoint = Url::parse(endpoint)
        .map_err(|e| NyayaError::ConfigError(format!("invalid web_search.endpoint: {e}")))?;
    info!("Web search provider: {} ({})", config.provider, endpoint.host_str().unwrap_or_default());

    let search: Arc<dyn WebSearch> = match config.provider {
        WebSearchProvider::GoogleCse => Arc::new(GoogleCustomSearch {
            client,
            endpoint,
            api_key: config.api_key.clone().unwrap_or_default(),
            engine_id: config.engine_id.clone().unwrap_or_default(),
        }),
        WebSearchProvider::Searxng => Arc::new(SearxngSearch { client, endpoint }),
        WebSearchProvider::DuckDuckGo => {
            warn!("DuckDuckGo instant answers ignore site: filters; restricted results are not domain scoped");
            Arc::new(DuckDuckGoSearch { client, endpoint })
        }
    };
    Ok(Some(search))
}

fn http_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(user_agent)
        .build()
        .map_err(|e| NyayaError::HttpError(e.to_string()))
}

async fn fetch_json(client: &Client, url: Url) -> Result<Value> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| NyayaError::RetrievalUnavailable(format!("web search request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(NyayaError::RetrievalUnavailable(format!(
            "web search returned HTTP {status}"
        )));
    }

    response.json().await.map_err(|e| {
        NyayaError::RetrievalUnavailable(format!("failed to parse web search response: {e}"))
    })
}

/// Google Programmable Search JSON API client
pub struct GoogleCustomSearch {
    client: Client,
    endpoint: Url,
    api_key: String,
    engine_id: String,
}

/// The API rejects `num` above this
const GOOGLE_MAX_NUM: usize = 10;

impl GoogleCustomSearch {
    fn request_url(&self, query: &str, max_results: usize) -> Url {
        let num = max_results.clamp(1, GOOGLE_MAX_NUM);
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("cx", &self.engine_id)
            .append_pair("q", query)
            .append_pair("num", &num.to_string());
        url
    }
}

#[async_trait]
impl WebSearch for GoogleCustomSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<WebHit>> {
        let body = fetch_json(&self.client, self.request_url(query, max_results)).await?;
        Ok(parse_custom_search_items(&body, max_results))
    }
}

/// Map `items[]` of a Programmable Search response; a response without `items` has no hits
#[must_use]
pub fn parse_custom_search_items(body: &Value, max_results: usize) -> Vec<WebHit> {
    body["items"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|item| {
            let url = item["link"].as_str().filter(|l| !l.is_empty())?;
            Some(WebHit {
                title: item["title"].as_str().unwrap_or_default().to_string(),
                snippet: item["snippet"].as_str().unwrap_or_default().replace('\n', " "),
                url: url.to_string(),
            })
        })
        .take(max_results)
        .collect()
}

/// SearxNG metasearch client (`format=json`)
pub struct SearxngSearch {
    client: Client,
    endpoint: Url,
}

impl SearxngSearch {
    fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("safesearch", "1");
        url
    }
}

#[async_trait]
impl WebSearch for SearxngSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<WebHit>> {
        let body = fetch_json(&self.client, self.request_url(query)).await?;
        Ok(parse_searxng_results(&body, max_results))
    }
}

/// Map `results[]` of a SearxNG JSON response
#[must_use]
pub fn parse_searxng_results(body: &Value, max_results: usize) -> Vec<WebHit> {
    body["results"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|result| {
            let url = result["url"].as_str().filter(|u| !u.is_empty())?;
            Some(WebHit {
                title: result["title"].as_str().unwrap_or_default().to_string(),
                snippet: result["content"].as_str().unwrap_or_default().to_string(),
                url: url.to_string(),
            })
        })
        .take(max_results)
        .collect()
}

/// DuckDuckGo instant-answer API client
///
/// Topic summaries only; `site:` operators in the query are not applied.
pub struct DuckDuckGoSearch {
    client: Client,
    endpoint: Url,
}

impl DuckDuckGoSearch {
    fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("no_html", "1")
            .append_pair("skip_disambig", "1");
        url
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<WebHit>> {
        let body = fetch_json(&self.client, self.request_url(query)).await?;
        Ok(parse_instant_answers(&body, max_results))
    }
}

/// Flatten abstract, results and related topics (including grouped topics) into hits
#[must_use]
pub fn parse_instant_answers(body: &Value, max_results: usize) -> Vec<WebHit> {
    let mut hits = Vec::new();

    if let Some(text) = body["AbstractText"].as_str().filter(|t| !t.is_empty()) {
        hits.push(WebHit {
            title: body["Heading"]
                .as_str()
                .or_else(|| body["AbstractSource"].as_str())
                .unwrap_or("Legal Resource")
                .to_string(),
            snippet: text.to_string(),
            url: body["AbstractURL"].as_str().unwrap_or_default().to_string(),
        });
    }

    let mut topics: Vec<&Value> = Vec::new();
    for key in ["Results", "RelatedTopics"] {
        for item in body[key].as_array().into_iter().flatten() {
            match item["Topics"].as_array() {
                Some(group) => topics.extend(group.iter()),
                None => topics.push(item),
            }
        }
    }

    for topic in topics {
        let Some(text) = topic["Text"].as_str().filter(|t| !t.is_empty()) else {
            continue;
        };
        let title = text.split(" - ").next().unwrap_or(text).to_string();
        hits.push(WebHit {
            title,
            snippet: text.to_string(),
            url: topic["FirstURL"].as_str().unwrap_or_default().to_string(),
        });
    }

    hits.truncate(max_results);
    hits
}

/// Domain-restricted search producing context chunks (retrieval tier 3)
#[derive(Clone)]
pub struct RestrictedWebFallback {
    search: Option<Arc<dyn WebSearch>>,
    config: RestrictedWebConfig,
}

impl RestrictedWebFallback {
    #[must_use]
    pub fn new(search: Option<Arc<dyn WebSearch>>, config: RestrictedWebConfig) -> Self {
        Self { search, config }
    }

    /// Query with `site:` filters for the configured domains
    #[must_use]
    pub fn scoped_query(&self, query: &str) -> String {
        let sites = self
            .config
            .domains
            .iter()
            .map(|d| format!("site:{d}"))
            .collect::<Vec<_>>()
            .join(" OR ");
        if sites.is_empty() {
            query.to_string()
        } else {
            format!("{query} {sites}")
        }
    }

    /// Configured result count, capped at [`MAX_RESTRICTED_RESULTS`]
    #[must_use]
    pub fn result_limit(&self) -> usize {
        self.config.max_results.clamp(1, MAX_RESTRICTED_RESULTS)
    }

    /// One chunk per result URL, relevance decreasing with rank
    ///
    /// # Errors
    /// - `CapabilityUnavailable` when disabled or no web search is installed
    /// - `RetrievalUnavailable` when the search fails
    pub async fn search(&self, query: &str) -> Result<Vec<ContextChunk>> {
        let search = self.search.as_ref().filter(|_| self.config.enabled).ok_or_else(|| {
            NyayaError::CapabilityUnavailable("restricted web search is disabled".to_string())
        })?;

        let limit = self.result_limit();
        let scoped = self.scoped_query(query);
        info!("Restricted web fallback: {}", scoped);
        let hits = search.search(&scoped, limit).await?;

        Ok(hits
            .into_iter()
            .filter(|hit| !hit.url.is_empty())
            .take(limit)
            .enumerate()
            .map(|(idx, hit)| build_restricted_chunk(idx + 1, query, &hit))
            .collect())
    }
}

/// Relevance for the n-th (1-based) restricted web result
#[must_use]
pub fn restricted_relevance(rank: usize) -> f64 {
    // Ranks are capped by `MAX_RESTRICTED_RESULTS`, so the conversion is lossless.
    #[allow(clippy::cast_precision_loss)]
    let rank = rank as f64;
    ((0.7 - rank * 0.1) * 100.0).round() / 100.0
}

fn build_restricted_chunk(rank: usize, query: &str, hit: &WebHit) -> ContextChunk {
    let text = format!(
        "[Web Search Result {rank} - Verifiable Legal Source]\n\n\
         **DISCLAIMER:** The following information is sourced from external legal databases. \
         For definitive legal advice, consult a qualified advocate.\n\n\
         **Query:** {query}\n\
         **Title:** {}\n\
         **Summary:** {}\n\
         **URL:** {}",
        hit.title, hit.snippet, hit.url
    );
    ContextChunk::new(
        text,
        format!("External Source {rank}"),
        hit.url.clone(),
        Some(restricted_relevance(rank)),
    )
}

/// Unrestricted search producing a final response (post grounding failure)
#[derive(Clone)]
pub struct OpenWebFallback {
    search: Option<Arc<dyn WebSearch>>,
    config: OpenWebConfig,
}

impl OpenWebFallback {
    #[must_use]
    pub fn new(search: Option<Arc<dyn WebSearch>>, config: OpenWebConfig) -> Self {
        Self { search, config }
    }

    #[must_use]
    pub fn expanded_query(&self, query: &str) -> String {
        self.config.query_template.replace("{query}", query)
    }

    /// Search and render a disclaimer-annotated envelope
    ///
    /// Never fails: an absent or failing capability yields a `low` envelope.
    pub async fn respond(&self, query: &str) -> ResponseEnvelope {
        let Some(search) = self.search.as_ref().filter(|_| self.config.enabled) else {
            warn!("Open web fallback requested but web search is unavailable");
            return unavailable_envelope(
                "This query is outside the scope of the indexed legal documents, and web search is unavailable.",
                "Out of scope - web search unavailable: capability not configured".to_string(),
            );
        };

        let expanded = self.expanded_query(query);
        info!("Open web fallback: {}", expanded);

        match search.search(&expanded, self.config.max_results).await {
            Ok(hits) if hits.is_empty() => unavailable_envelope(
                "This query is not covered in the indexed legal documents, and external search yielded no results.",
                "Out of scope - no web results found".to_string(),
            ),
            Ok(hits) => {
                let shown: Vec<WebHit> = hits.into_iter().take(self.config.display_results).collect();
                render_web_envelope(&shown)
            }
            Err(e) => {
                warn!("Open web fallback failed: {}", e);
                unavailable_envelope(
                    "This query is outside the scope of the indexed legal documents, and the fallback web search encountered an error.",
                    format!("Out of scope - web search unavailable: {e}"),
                )
            }
        }
    }
}

fn unavailable_envelope(lead: &str, note: String) -> ResponseEnvelope {
    ResponseEnvelope {
        response: format!(
            "⚠️ **INFORMATION UNAVAILABLE**\n\n{lead}\n\n**RECOMMENDATION:** Consult a qualified legal professional for accurate guidance."
        ),
        sources: Vec::new(),
        confidence: Confidence::Low,
        note,
        mode: ResponseMode::Standard,
    }
}

fn render_web_envelope(hits: &[WebHit]) -> ResponseEnvelope {
    let mut response = String::from("⚠️ **NOTE: EXTERNAL SOURCES**\n\n");
    response.push_str(
        "The indexed legal documents do not contain relevant provisions for this query. \
         Information sourced from external legal resources:\n\n",
    );
    response.push_str(RULE);
    response.push_str("\n\n");

    for (idx, hit) in hits.iter().enumerate() {
        let title = if hit.title.is_empty() { "Legal Resource" } else { hit.title.as_str() };
        let snippet = if hit.snippet.is_empty() { "No description available" } else { hit.snippet.as_str() };
        response.push_str(&format!("**Source {}: {}**\n{}\n🔗 {}\n\n", idx + 1, title, snippet, hit.url));
    }

    response.push_str(RULE);
    response.push_str(
        "\n\n⚠️ **DISCLAIMER:** These results are from external sources and should be verified with a legal professional.",
    );

    let sources = dedup_sources(hits.iter().enumerate().map(|(idx, hit)| {
        let document = if hit.title.is_empty() {
            format!("Web Source {}", idx + 1)
        } else {
            hit.title.clone()
        };
        SourceRecord::new(document, "External Web Search", None)
    }));

    ResponseEnvelope {
        response,
        sources,
        confidence: Confidence::MediumWeb,
        note: "Fallback: Retrieved from web search (not indexed documents)".to_string(),
        mode: ResponseMode::Standard,
    }
}
