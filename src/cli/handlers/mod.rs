//! CLI command handlers module
//!
//! This module is organized by functional domains:
//! - ask: Legal questions, optionally over an uploaded document
//! - document: Document analysis and contract verification
//! - serve: API server
//! - info: Configuration display

pub mod ask;
pub mod document;
pub mod info;
pub mod serve;

// Re-export all public handlers
pub use ask::*;
pub use document::*;
pub use info::*;
pub use serve::*;
