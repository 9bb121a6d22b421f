//! Legal retrieval-augmented generation
//!
//! A query flows through a fixed cascade:
//! - Retrieval: primary search index, then the static topic catalog, then a
//!   domain-restricted web search. The first non-empty tier wins.
//! - Generation with strict sampling over the retrieved context.
//! - Grounding verification. An answer that admits missing context is
//!   replaced by an open web search response.
//!
//! When the caller supplies an uploaded document, the document becomes the
//! primary evidence and retrieval only supplements it.
//!
//! # Examples
//!
//! ```rust,no_run
//! use nyayarag::rag::LegalRagEngine;
//! use nyayarag::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let engine = LegalRagEngine::new(&config)?;
//!
//!     let envelope = engine.process_query("Is bail available for murder charges?").await;
//!     println!("{} ({})", envelope.response, envelope.confidence);
//!     println!("Sources: {}", envelope.sources.len());
//!
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod composer;
pub mod grounding;
pub mod hybrid;
pub mod index;
pub mod pipeline;
pub mod retriever;
pub mod web;

pub use catalog::StaticFallbackCatalog;
pub use composer::ResponseComposer;
pub use grounding::GroundingVerifier;
pub use hybrid::HybridContextMerger;
pub use index::PrimaryIndexClient;
pub use index::SearchIndex;
pub use pipeline::LegalRagEngine;
pub use retriever::RetrievalOrchestrator;
pub use web::OpenWebFallback;
pub use web::RestrictedWebFallback;
pub use web::WebSearch;
