//! Citation-grounded legal question answering over Indian statutes
//!
//! The [`rag::LegalRagEngine`] answers a question from a tiered retrieval
//! cascade (search index, static topic catalog, restricted web search),
//! verifies that the generated answer is grounded, and falls back to an open
//! web search response when it is not.

pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod documents;
pub mod errors;
pub mod llm;
pub mod logging;
pub mod models;
pub mod rag;

#[cfg(test)]
mod config_tests;

pub use config::AppConfig;
pub use errors::*;
