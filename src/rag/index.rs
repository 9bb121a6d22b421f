//! Primary structured search index
//!
//! [`DiscoveryEngineIndex`] talks to a Vertex AI Search style data store and
//! flattens its result shapes into [`IndexHit`]s. [`PrimaryIndexClient`] turns
//! hits into [`ContextChunk`]s with a citation header.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use serde_json::Value;
use tracing::debug;

use crate::config::SearchIndexConfig;
use crate::errors::NyayaError;
use crate::errors::Result;
use crate::models::ContextChunk;

const DEFAULT_TITLE: &str = "Legal Document";
const DEFAULT_PAGE: &str = "N/A";

/// One normalized search index result
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    pub document_title: String,
    pub page_or_section: String,
    pub text: String,
    pub relevance_score: Option<f64>,
}

/// A structured search backend
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// # Errors
    /// - `CapabilityUnavailable` when the index is not configured
    /// - `RetrievalUnavailable` on transport or response errors
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<IndexHit>>;
}

/// Retrieval tier backed by the primary search index
#[derive(Clone)]
pub struct PrimaryIndexClient {
    index: Option<Arc<dyn SearchIndex>>,
}

impl PrimaryIndexClient {
    #[must_use]
    pub fn new(index: Option<Arc<dyn SearchIndex>>) -> Self {
        Self { index }
    }

    /// Client with no index behind it; every search reports `CapabilityUnavailable`
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { index: None }
    }

    /// Build from configuration, leaving the index absent when it is unconfigured
    pub fn from_config(config: &SearchIndexConfig) -> Result<Self> {
        if !config.is_configured() {
            debug!("Search index not configured; primary tier disabled");
            return Ok(Self::unconfigured());
        }
        let index = DiscoveryEngineIndex::new(config)?;
        Ok(Self::new(Some(Arc::new(index))))
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.index.is_some()
    }

    /// Query the index and wrap each hit with a `[Source: ..., Page ...]` header
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<ContextChunk>> {
        let index = self.index.as_ref().ok_or_else(|| {
            NyayaError::CapabilityUnavailable("search index is not configured".to_string())
        })?;

        let hits = index.search(query, top_k).await?;
        Ok(hits.into_iter().map(hit_to_chunk).collect())
    }
}

fn hit_to_chunk(hit: IndexHit) -> ContextChunk {
    let text = format!(
        "[Source: {}, Page {}]\n{}",
        hit.document_title, hit.page_or_section, hit.text
    );
    ContextChunk::new(text, hit.document_title, hit.page_or_section, hit.relevance_score)
}

/// REST client for a Discovery Engine data store
pub struct DiscoveryEngineIndex {
    client: Client,
    search_url: String,
    access_token: String,
}

impl DiscoveryEngineIndex {
    /// # Errors
    /// - `CapabilityUnavailable` when data store, project or token is missing
    /// - HTTP client build errors
    pub fn new(config: &SearchIndexConfig) -> Result<Self> {
        if !config.is_configured() {
            return Err(NyayaError::CapabilityUnavailable(
                "search_index requires project_id, data_store_id and access_token".to_string(),
            ));
        }
        let data_store = config.data_store_id.as_deref().unwrap_or_default();
        let access_token = config.access_token.clone().unwrap_or_default();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NyayaError::HttpError(e.to_string()))?;

        let search_url = format!(
            "{}/v1beta/projects/{}/locations/{}/collections/default_collection/dataStores/{}/servingConfigs/default_config:search",
            config.api_endpoint(),
            config.project_id,
            config.location,
            data_store
        );

        Ok(Self {
            client,
            search_url,
            access_token,
        })
    }

    fn build_request_body(query: &str, top_k: usize) -> Value {
        json!({
            "query": query,
            "pageSize": top_k,
            "contentSearchSpec": {
                "snippetSpec": { "returnSnippet": true, "maxSnippetCount": 5 },
                "extractiveContentSpec": {
                    "maxExtractiveSegmentCount": 3,
                    "maxExtractiveAnswerCount": 1
                }
            },
            "queryExpansionSpec": { "condition": "AUTO" },
            "spellCorrectionSpec": { "mode": "AUTO" }
        })
    }
}

#[async_trait]
impl SearchIndex for DiscoveryEngineIndex {
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<IndexHit>> {
        debug!("Searching primary index (top_k={}): {}", top_k, query);

        let response = self
            .client
            .post(&self.search_url)
            .bearer_auth(&self.access_token)
            .json(&Self::build_request_body(query, top_k))
            .send()
            .await
            .map_err(|e| NyayaError::RetrievalUnavailable(format!("index request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NyayaError::RetrievalUnavailable(format!(
                "index returned HTTP {status}: {body}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| NyayaError::RetrievalUnavailable(format!("invalid index response: {e}")))?;

        Ok(parse_search_response(&body))
    }
}

/// Flatten a `:search` response into hits
///
/// Per result, content is taken from the first shape present: extractive
/// answers, then snippets, then a `content`/`text`/`description` field of the
/// structured data. Results with none of these are skipped.
#[must_use]
pub fn parse_search_response(body: &Value) -> Vec<IndexHit> {
    let Some(results) = body["results"].as_array() else {
        return Vec::new();
    };

    let mut hits = Vec::new();
    for result in results {
        let document = &result["document"];
        let derived = &document["derivedStructData"];
        let structured = &document["structData"];

        let title = extract_title(derived, structured);
        let page = extract_page(derived, structured);
        let relevance = result["relevanceScore"]
            .as_f64()
            .or_else(|| result["modelScores"]["relevance_score"]["values"][0].as_f64());

        let texts = extract_texts(derived, structured);
        for text in texts {
            hits.push(IndexHit {
                document_title: title.clone(),
                page_or_section: page.clone(),
                text,
                relevance_score: relevance,
            });
        }
    }
    hits
}

fn extract_title(derived: &Value, structured: &Value) -> String {
    let title = [derived, structured]
        .iter()
        .find_map(|data| data["title"].as_str().filter(|t| !t.is_empty()));
    if let Some(title) = title {
        return title.to_string();
    }
    derived["link"]
        .as_str()
        .and_then(|link| link.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_TITLE)
        .to_string()
}

fn extract_page(derived: &Value, structured: &Value) -> String {
    let candidates = [
        &derived["page_number"],
        &derived["pageNumber"],
        &derived["extractive_answers"][0]["pageNumber"],
        &structured["page_number"],
        &structured["section"],
    ];
    for value in candidates {
        match value {
            Value::String(s) if !s.is_empty() => return s.clone(),
            Value::Number(n) => return n.to_string(),
            _ => {}
        }
    }
    DEFAULT_PAGE.to_string()
}

fn extract_texts(derived: &Value, structured: &Value) -> Vec<String> {
    let collect = |key: &str, field: &str| -> Vec<String> {
        derived[key]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item[field].as_str())
                    .filter(|s| !s.trim().is_empty())
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default()
    };

    let answers = collect("extractive_answers", "content");
    if !answers.is_empty() {
        return answers;
    }
    let snippets = collect("snippets", "snippet");
    if !snippets.is_empty() {
        return snippets;
    }
    ["content", "text", "description"]
        .iter()
        .find_map(|field| structured[*field].as_str().filter(|s| !s.trim().is_empty()))
        .map(|s| vec![s.to_string()])
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extractive_answers_take_precedence() {
        let body = json!({
            "results": [{
                "relevanceScore": 0.82,
                "document": {
                    "derivedStructData": {
                        "title": "Indian Penal Code, 1860",
                        "page_number": 112,
                        "extractive_answers": [{ "content": "Section 420. Cheating and dishonestly inducing delivery of property." }],
                        "snippets": [{ "snippet": "ignored" }]
                    }
                }
            }]
        });
        let hits = parse_search_response(&body);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].document_title, "Indian Penal Code, 1860");
        assert_eq!(hits[0].page_or_section, "112");
        assert!(hits[0].text.starts_with("Section 420"));
        assert_eq!(hits[0].relevance_score, Some(0.82));
    }

    #[test]
    fn test_parse_snippets_and_link_title() {
        let body = json!({
            "results": [{
                "document": {
                    "derivedStructData": {
                        "link": "gs://bare-acts/contract_act_1872.pdf",
                        "snippets": [{ "snippet": "Section 73." }, { "snippet": "Section 74." }]
                    }
                }
            }]
        });
        let hits = parse_search_response(&body);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].document_title, "contract_act_1872.pdf");
        assert_eq!(hits[1].page_or_section, "N/A");
        assert_eq!(hits[1].relevance_score, None);
    }

    #[test]
    fn test_parse_structured_content_fallback_and_skip_empty() {
        let body = json!({
            "results": [
                { "document": { "structData": { "description": "Right to Information Act, Section 6" } } },
                { "document": { "structData": { "unrelated": true } } }
            ]
        });
        let hits = parse_search_response(&body);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].document_title, "Legal Document");
        assert_eq!(hits[0].text, "Right to Information Act, Section 6");
    }

    #[test]
    fn test_parse_missing_results() {
        assert!(parse_search_response(&json!({})).is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_client_reports_capability_unavailable() {
        let client = PrimaryIndexClient::from_config(&SearchIndexConfig::default()).unwrap();
        assert!(!client.is_configured());
        let err = client.search("bail", 3).await.unwrap_err();
        assert!(matches!(err, NyayaError::CapabilityUnavailable(_)));
    }

    #[test]
    fn test_hit_to_chunk_adds_citation_header() {
        let chunk = hit_to_chunk(IndexHit {
            document_title: "CrPC".to_string(),
            page_or_section: "Section 437".to_string(),
            text: "Bail in non-bailable offences".to_string(),
            relevance_score: Some(0.5),
        });
        assert_eq!(chunk.text, "[Source: CrPC, Page Section 437]\nBail in non-bailable offences");
        assert_eq!(chunk.source_page, "Section 437");
    }
}
