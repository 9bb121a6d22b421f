//! Detects answers in which the generator admits it could not ground itself

use crate::config::default_failure_phrases;

/// Case-insensitive phrase match over generated text
#[derive(Debug, Clone)]
pub struct GroundingVerifier {
    phrases: Vec<String>,
}

impl Default for GroundingVerifier {
    fn default() -> Self {
        Self::new(default_failure_phrases())
    }
}

impl GroundingVerifier {
    /// Blank phrases are ignored; they would match every answer.
    #[must_use]
    pub fn new(phrases: Vec<String>) -> Self {
        let phrases = phrases
            .into_iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        Self { phrases }
    }

    /// True when any failure phrase occurs in `text`
    #[must_use]
    pub fn is_grounding_failure(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.phrases.iter().any(|p| lowered.contains(p.as_str()))
    }

    #[must_use]
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }
}
