//! Clause-by-clause compliance check of a contract against retrieved provisions

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::llm::LegalPrompts;
use crate::models::SourceRecord;
use crate::rag::hybrid::truncate_chars;
use crate::rag::LegalRagEngine;

const MIN_CLAUSE_CHARS: usize = 20;
const CLAUSE_QUERY_CHARS: usize = 500;
const CLAUSE_PREVIEW_CHARS: usize = 150;
const CLAUSE_TOP_K: usize = 2;

/// Verdict on a single clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClauseStatus {
    #[serde(rename = "COMPLIANT")]
    Compliant,
    #[serde(rename = "NON-COMPLIANT")]
    NonCompliant,
    #[serde(rename = "UNCLEAR")]
    Unclear,
}

/// Verdict on the whole contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallCompliance {
    #[serde(rename = "COMPLIANT")]
    Compliant,
    #[serde(rename = "NON-COMPLIANT")]
    NonCompliant,
    #[serde(rename = "NEEDS REVIEW")]
    NeedsReview,
}

impl fmt::Display for OverallCompliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Compliant => "COMPLIANT",
            Self::NonCompliant => "NON-COMPLIANT",
            Self::NeedsReview => "NEEDS REVIEW",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub clause: String,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseRisk {
    pub clause: String,
    pub risk: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseAnalysis {
    pub clause: String,
    pub status: ClauseStatus,
    pub recommendation: String,
    pub sources: Vec<SourceRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub overall_compliance: OverallCompliance,
    pub contract_type: String,
    pub total_clauses_analyzed: usize,
    pub issues_found: usize,
    pub risks_identified: usize,
    pub discrepancies: Vec<Discrepancy>,
    pub risks: Vec<ClauseRisk>,
    pub clause_analysis: Vec<ClauseAnalysis>,
}

/// Parsed `STATUS / ISSUES / RISK / RECOMMENDATION` reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseVerdict {
    pub status: ClauseStatus,
    pub issues: Vec<String>,
    pub risk: Option<String>,
    pub recommendation: String,
}

impl ClauseVerdict {
    fn unclear(recommendation: impl Into<String>) -> Self {
        Self {
            status: ClauseStatus::Unclear,
            issues: Vec::new(),
            risk: None,
            recommendation: recommendation.into(),
        }
    }
}

pub struct ContractVerifier<'a> {
    engine: &'a LegalRagEngine,
    max_clauses: usize,
}

impl<'a> ContractVerifier<'a> {
    #[must_use]
    pub fn new(engine: &'a LegalRagEngine) -> Self {
        Self {
            engine,
            max_clauses: engine.config().max_contract_clauses,
        }
    }

    /// Check every extracted clause in order and aggregate the verdicts
    pub async fn verify(&self, contract_text: &str) -> ComplianceReport {
        let contract_type = detect_contract_type(contract_text);
        let clauses = extract_clauses(contract_text, self.max_clauses);
        info!(
            "Verifying {} clause(s) of a {}",
            clauses.len(),
            contract_type
        );

        let mut discrepancies = Vec::new();
        let mut risks = Vec::new();
        let mut clause_analysis = Vec::new();

        for clause in &clauses {
            let (verdict, sources) = self.check_clause(clause, contract_type).await;
            let preview = clause_preview(clause);
            debug!("Clause verdict {:?}: {}", verdict.status, preview);

            if !verdict.issues.is_empty() {
                discrepancies.push(Discrepancy {
                    clause: preview.clone(),
                    issues: verdict.issues,
                });
            }
            if let Some(risk) = verdict.risk {
                risks.push(ClauseRisk {
                    clause: preview.clone(),
                    risk,
                });
            }
            clause_analysis.push(ClauseAnalysis {
                clause: preview,
                status: verdict.status,
                recommendation: verdict.recommendation,
                sources,
            });
        }

        let overall_compliance = aggregate(clause_analysis.iter().map(|c| c.status));
        info!("Contract verification complete: {}", overall_compliance);

        ComplianceReport {
            overall_compliance,
            contract_type: contract_type.to_string(),
            total_clauses_analyzed: clause_analysis.len(),
            issues_found: discrepancies.iter().map(|d| d.issues.len()).sum(),
            risks_identified: risks.len(),
            discrepancies,
            risks,
            clause_analysis,
        }
    }

    async fn check_clause(&self, clause: &str, contract_type: &str) -> (ClauseVerdict, Vec<SourceRecord>) {
        let excerpt = truncate_chars(clause, CLAUSE_QUERY_CHARS);
        let retrieval = self.engine.retrieve(excerpt, CLAUSE_TOP_K).await;
        if retrieval.is_empty() {
            return (
                ClauseVerdict::unclear("No relevant legal provisions found; have a lawyer review this clause."),
                Vec::new(),
            );
        }

        let values = HashMap::from([
            ("contract_type", contract_type),
            ("context", retrieval.combined_context.as_str()),
            ("clause", clause),
        ]);
        let prompt = LegalPrompts::clause_verification().render(&values);

        let verdict = match self.engine.generation().generate_strict(&prompt).await {
            Ok(text) if self.engine.verifier().is_grounding_failure(&text) => ClauseVerdict::unclear(
                "Retrieved provisions do not address this clause; have a lawyer review it.",
            ),
            Ok(text) => parse_verdict(&text),
            Err(e) => {
                warn!("Clause check failed: {}", e);
                ClauseVerdict::unclear(format!("Automated review failed: {e}"))
            }
        };
        (verdict, retrieval.sources)
    }
}

/// Any non-compliant clause decides; otherwise any unclear clause, or none at all, needs review
#[must_use]
pub fn aggregate(statuses: impl IntoIterator<Item = ClauseStatus>) -> OverallCompliance {
    let mut any = false;
    let mut unclear = false;
    for status in statuses {
        any = true;
        match status {
            ClauseStatus::NonCompliant => return OverallCompliance::NonCompliant,
            ClauseStatus::Unclear => unclear = true,
            ClauseStatus::Compliant => {}
        }
    }
    if unclear || !any {
        OverallCompliance::NeedsReview
    } else {
        OverallCompliance::Compliant
    }
}

/// Parse the four-line verdict; a missing or unknown status is `UNCLEAR`
#[must_use]
pub fn parse_verdict(text: &str) -> ClauseVerdict {
    let mut verdict = ClauseVerdict::unclear("Have a lawyer review this clause.");
    for line in text.lines() {
        let line = line.trim().trim_start_matches(['-', '*', '•', ' ']);
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim_matches('*').trim().to_ascii_uppercase();
        let value = value.trim_matches('*').trim();

        match key.as_str() {
            "STATUS" => verdict.status = parse_status(value),
            "ISSUES" => {
                verdict.issues = value
                    .split(';')
                    .map(str::trim)
                    .filter(|s| !is_none(s))
                    .map(ToString::to_string)
                    .collect();
            }
            "RISK" => verdict.risk = Some(value.to_string()).filter(|r| !is_none(r)),
            "RECOMMENDATION" if !value.is_empty() => verdict.recommendation = value.to_string(),
            _ => {}
        }
    }
    verdict
}

fn parse_status(value: &str) -> ClauseStatus {
    let upper = value.to_ascii_uppercase();
    if upper.contains("NON-COMPLIANT") || upper.contains("NON COMPLIANT") || upper.contains("NONCOMPLIANT") {
        ClauseStatus::NonCompliant
    } else if upper.contains("UNCLEAR") {
        ClauseStatus::Unclear
    } else if upper.contains("COMPLIANT") {
        ClauseStatus::Compliant
    } else {
        ClauseStatus::Unclear
    }
}

fn is_none(value: &str) -> bool {
    let v = value.trim().trim_end_matches('.');
    v.is_empty() || v.eq_ignore_ascii_case("none") || v.eq_ignore_ascii_case("n/a")
}

/// Split a contract into clauses
///
/// Lines opening with a numbered marker (`1.`, `2)`, `12.3`) or with
/// `Clause`, `Section` or `Article` start a clause; text before the first
/// such line is ignored. Without any marker, blank-line separated paragraphs
/// are the clauses. Fragments under 20 characters are dropped.
#[must_use]
pub fn extract_clauses(text: &str, max_clauses: usize) -> Vec<String> {
    let mut clauses: Vec<String> = Vec::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        let line = line.trim();
        if is_clause_heading(line) {
            clauses.extend(current.take());
            current = Some(line.to_string());
        } else if let Some(clause) = current.as_mut() {
            if !line.is_empty() {
                clause.push(' ');
                clause.push_str(line);
            }
        }
    }
    clauses.extend(current);

    if clauses.is_empty() {
        clauses = text
            .split("\n\n")
            .map(|p| p.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect();
    }

    clauses
        .into_iter()
        .filter(|c| c.chars().count() >= MIN_CLAUSE_CHARS)
        .take(max_clauses)
        .collect()
}

fn is_clause_heading(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    for word in ["clause", "section", "article"] {
        if let Some(rest) = lower.strip_prefix(word) {
            if rest.starts_with(|c: char| c.is_whitespace() || c.is_ascii_digit()) {
                return true;
            }
        }
    }

    let marker_len = line
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(line.len());
    let marker = &line[..marker_len];
    if !marker.starts_with(|c: char| c.is_ascii_digit()) {
        return false;
    }
    let next = line[marker_len..].chars().next();
    marker.ends_with('.')
        || next == Some(')')
        || (marker.contains('.') && next.is_some_and(char::is_whitespace))
}

/// Contract category from keywords, first match wins
#[must_use]
pub fn detect_contract_type(text: &str) -> &'static str {
    let words: Vec<String> = text
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    let has = |candidates: &[&str]| words.iter().any(|w| candidates.contains(&w.as_str()));

    if has(&["rent", "rental", "lease", "lessee", "lessor", "tenant", "landlord"]) {
        "Rental/Lease Agreement"
    } else if has(&["employment", "employee", "employer", "salary"]) {
        "Employment Contract"
    } else if has(&["sale", "purchase", "buyer", "seller"]) {
        "Sale/Purchase Agreement"
    } else if has(&["service", "services"]) {
        "Service Agreement"
    } else if has(&["loan", "borrower", "lender"]) {
        "Loan Agreement"
    } else if has(&["non-disclosure", "nda", "confidentiality"]) {
        "Non-Disclosure Agreement"
    } else {
        "General Contract"
    }
}

fn clause_preview(clause: &str) -> String {
    let preview = truncate_chars(clause, CLAUSE_PREVIEW_CHARS);
    if preview.len() < clause.len() {
        format!("{preview}...")
    } else {
        preview.to_string()
    }
}
