//! Stub capabilities shared by the integration tests
#![allow(dead_code)]

use std::io::Cursor;
use std::io::Write;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use nyayarag::config::OpenWebConfig;
use nyayarag::config::PipelineConfig;
use nyayarag::config::RestrictedWebConfig;
use nyayarag::llm::GenerationClient;
use nyayarag::llm::SamplingConfig;
use nyayarag::llm::TextGenerator;
use nyayarag::rag::index::IndexHit;
use nyayarag::rag::web::WebHit;
use nyayarag::rag::LegalRagEngine;
use nyayarag::rag::OpenWebFallback;
use nyayarag::rag::PrimaryIndexClient;
use nyayarag::rag::RestrictedWebFallback;
use nyayarag::rag::RetrievalOrchestrator;
use nyayarag::rag::SearchIndex;
use nyayarag::rag::StaticFallbackCatalog;
use nyayarag::rag::WebSearch;
use nyayarag::NyayaError;
use nyayarag::Result;

pub const REFUSAL: &str =
    "The query is outside the scope of the indexed legal documents. Professional legal consultation is recommended.";

/// Index returning fixed hits and recording queries
#[derive(Default)]
pub struct StubIndex {
    pub hits: Vec<IndexHit>,
    pub queries: Mutex<Vec<String>>,
}

impl StubIndex {
    pub fn with(hits: Vec<IndexHit>) -> Arc<Self> {
        Arc::new(Self {
            hits,
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchIndex for StubIndex {
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<IndexHit>> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.hits.iter().take(top_k).cloned().collect())
    }
}

/// Index that is configured but unreachable
pub struct FailingIndex;

#[async_trait]
impl SearchIndex for FailingIndex {
    async fn search(&self, _query: &str, _top_k: usize) -> Result<Vec<IndexHit>> {
        Err(NyayaError::RetrievalUnavailable("connection refused".to_string()))
    }
}

pub fn hit(document: &str, page: &str, text: &str) -> IndexHit {
    IndexHit {
        document_title: document.to_string(),
        page_or_section: page.to_string(),
        text: text.to_string(),
        relevance_score: Some(0.8),
    }
}

/// Web search returning fixed hits and counting calls
#[derive(Default)]
pub struct StubWeb {
    pub hits: Vec<WebHit>,
    pub calls: AtomicUsize,
}

impl StubWeb {
    pub fn with(hits: Vec<WebHit>) -> Arc<Self> {
        Arc::new(Self {
            hits,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebSearch for StubWeb {
    async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<WebHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.hits.iter().take(max_results).cloned().collect())
    }
}

pub fn web_hit(n: usize) -> WebHit {
    WebHit {
        title: format!("Indian Kanoon result {n}"),
        snippet: format!("Relevant judgment {n}"),
        url: format!("https://indiankanoon.org/doc/{n}/"),
    }
}

type Reply = dyn Fn(&str) -> std::result::Result<String, String> + Send + Sync;

/// Generator answering through a closure and recording every call
pub struct ScriptedGenerator {
    reply: Box<Reply>,
    pub prompts: Mutex<Vec<String>>,
    pub samplings: Mutex<Vec<SamplingConfig>>,
}

impl ScriptedGenerator {
    pub fn with(reply: impl Fn(&str) -> std::result::Result<String, String> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            reply: Box::new(reply),
            prompts: Mutex::new(Vec::new()),
            samplings: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        let text = text.to_string();
        Self::with(move |_| Ok(text.clone()))
    }

    pub fn failing(message: &str) -> Arc<Self> {
        let message = message.to_string();
        Self::with(move |_| Err(message.clone()))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn samplings(&self) -> Vec<SamplingConfig> {
        self.samplings.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, sampling: &SamplingConfig) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.samplings.lock().unwrap().push(*sampling);
        (self.reply)(prompt).map_err(NyayaError::GenerationError)
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Engine over stub capabilities with default pipeline settings
pub fn engine(
    index: Option<Arc<dyn SearchIndex>>,
    generator: Arc<ScriptedGenerator>,
    web: Option<Arc<dyn WebSearch>>,
) -> LegalRagEngine {
    let orchestrator = RetrievalOrchestrator::new(
        PrimaryIndexClient::new(index),
        StaticFallbackCatalog::default(),
        RestrictedWebFallback::new(web.clone(), RestrictedWebConfig::default()),
    );
    LegalRagEngine::from_parts(
        orchestrator,
        GenerationClient::new(generator),
        OpenWebFallback::new(web, OpenWebConfig::default()),
        PipelineConfig::default(),
    )
}

/// Minimal DOCX with one paragraph per entry
pub fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}</w:body></w:document>"
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    writer.start_file("word/document.xml", options).unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}
