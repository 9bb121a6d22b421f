//! Whole-document services on top of the legal RAG engine
//!
//! - [`DocumentAnalyzer`] summarizes a document into clauses, risks and a verdict.
//! - [`ContractVerifier`] checks each contract clause against retrieved provisions.

pub mod contract;
pub mod document;

pub use contract::ComplianceReport;
pub use contract::ContractVerifier;
pub use contract::OverallCompliance;
pub use document::DocumentAnalyzer;
pub use document::DocumentReport;
