//! Prompt templates for grounded legal answers, document reading and contract checks

use std::collections::HashMap;

const RULE: &str = "═══════════════════════════════════════════════════════════════════";

/// Template with `{{name}}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    /// Create a new prompt template
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let variables = extract_variables(&template);
        Self {
            template,
            variables,
        }
    }

    /// Substitute placeholders in one pass over the template
    ///
    /// Values are inserted verbatim, so a value that itself contains `{{x}}`
    /// is never expanded. Placeholders without a value are left in place.
    #[must_use]
    pub fn render(&self, values: &HashMap<&str, &str>) -> String {
        let mut output = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find("{{") {
            output.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];
            match after_open.find("}}") {
                Some(end) => {
                    let name = &after_open[..end];
                    match values.get(name) {
                        Some(value) => output.push_str(value),
                        None => {
                            output.push_str("{{");
                            output.push_str(name);
                            output.push_str("}}");
                        }
                    }
                    rest = &after_open[end + 2..];
                }
                None => {
                    output.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        output.push_str(rest);
        output
    }

    /// Get required variables
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

/// Extract variable names from template
fn extract_variables(template: &str) -> Vec<String> {
    let mut variables = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            break;
        };
        let name = after_open[..end].trim().to_string();
        if !name.is_empty() && !variables.contains(&name) {
            variables.push(name);
        }
        rest = &after_open[end + 2..];
    }

    variables
}

/// Prompt builders for every generation call site
pub struct LegalPrompts;

impl LegalPrompts {
    /// Persona and grounding rules for answers drawn from retrieved provisions
    #[must_use]
    pub fn system_prompt() -> String {
        format!(
            r#"You are a Senior Legal Counsel specializing in Indian Law. Respond in a crisp, lawyer-like manner.

{RULE}
GROUNDING RULES
{RULE}

1. Answer ONLY from [RETRIEVED CONTEXT] below. Treat pre-trained knowledge as non-existent.
2. If the context is insufficient, respond EXACTLY: "The query is outside the scope of the indexed legal documents. Professional legal consultation is recommended."
3. No conversational filler.
4. Every claim cites its source: "Pursuant to Section X of [Act Name]..."

{RULE}
RESPONSE FORMAT
{RULE}

**LEGAL ISSUE**
• [Single-sentence statement of the legal question]

**APPLICABLE PROVISIONS**
• Section X of [Act Name]: "[Exact text from context]"

**ANALYSIS**
• [Application of law to facts]
• [Legal interpretation]

**CONCLUSION**
• [Definitive conclusion in 1-2 sentences]

Tone: terse, direct, authoritative. Maximum brevity. Legal precision."#
        )
    }

    /// Strict retrieval-grounded answer
    #[must_use]
    pub fn grounded_answer() -> PromptTemplate {
        PromptTemplate::new(
            r"{{system}}

[RETRIEVED CONTEXT FROM BARE ACTS]:
{{context}}

[END OF CONTEXT]

User Query: {{query}}

Respond in the mandatory format (bullet points, legal terminology, no filler):",
        )
    }

    /// Answer about an uploaded document, with optional legal provisions
    #[must_use]
    pub fn local_context_answer() -> PromptTemplate {
        PromptTemplate::new(format!(
            r#"You are a senior legal expert analyzing a document uploaded by the user.

{RULE}
PRIORITY: LOCAL CONTEXT FIRST
{RULE}

**PRIMARY SOURCE (USER UPLOADED DOCUMENT):**

{{{{evidence}}}}

{RULE}

**SUPPLEMENTARY (LEGAL PROVISIONS FROM DATABASE):**
{{{{provisions}}}}

{RULE}
INSTRUCTIONS
{RULE}

1. READ THE UPLOADED DOCUMENT FIRST. It is the user's private evidence.
2. ANSWER DIRECTLY from the uploaded document when the question can be answered from it
   (dates, parties, amounts, obligations stated in the document).
3. Use the legal provisions ONLY when the question asks about validity, legality or compliance.
4. DO NOT say the question is "out of scope": the user's document is always available to you.

FORMAT:
- Cite the uploaded document: "Based on the uploaded document..."
- Quote relevant parts: "The document states: '[exact quote]'..."
- Use bullet points
- Cite any legal provision you rely on

**USER'S QUESTION:**
{{{{query}}}}
"#
        ))
    }

    /// Structured JSON analysis of an uploaded document
    #[must_use]
    pub fn document_analysis() -> PromptTemplate {
        PromptTemplate::new(
            r"You are a legal expert AI. Analyze the legal document below.

[DOCUMENT]
{{document}}
[END OF DOCUMENT]

Provide a JSON object with exactly these fields:
- summary: a brief summary of the document
- key_clauses: a list of important clauses found
- risks: potential legal risks or liabilities
- verdict: a probabilistic success score (0-100) and brief reasoning for case viability

Output ONLY the JSON.",
        )
    }

    /// Compliance check of one contract clause against retrieved provisions
    #[must_use]
    pub fn clause_verification() -> PromptTemplate {
        PromptTemplate::new(
            r"You are a legal compliance reviewer for Indian law. Check ONE clause of a {{contract_type}} against the provisions below.
Use only the provisions given. If they do not address the clause, the status is UNCLEAR.

[PROVISIONS]
{{context}}
[END OF PROVISIONS]

[CLAUSE]
{{clause}}
[END OF CLAUSE]

Reply with exactly these four lines:
STATUS: COMPLIANT | NON-COMPLIANT | UNCLEAR
ISSUES: <semicolon-separated conflicts with the provisions, or NONE>
RISK: <main legal risk for the signing party, or NONE>
RECOMMENDATION: <one sentence>",
        )
    }

    /// Render the strict grounded prompt
    #[must_use]
    pub fn render_grounded(context: &str, query: &str) -> String {
        let system = Self::system_prompt();
        let values = HashMap::from([
            ("system", system.as_str()),
            ("context", context),
            ("query", query),
        ]);
        Self::grounded_answer().render(&values)
    }
}
