//! Unit tests for configuration module
//!
//! These tests validate configuration parsing, defaults, and validation.

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::config::*;

    // ====== Default Value Tests ======

    #[test]
    fn test_default_pipeline_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.hybrid_top_k, 2);
        assert_eq!(config.evidence_char_budget, 6000);
        assert_eq!(config.grounding_failure_phrases.len(), 5);
    }

    #[test]
    fn test_default_web_strategies_are_separate() {
        let config = WebSearchConfig::default();
        assert_eq!(config.restricted.max_results, 3);
        assert_eq!(config.open.max_results, 5);
        assert_eq!(config.open.display_results, 3);
        assert!(config.open.query_template.contains("{query}"));
        assert!(config.restricted.domains.contains(&"indiankanoon.org".to_string()));
    }

    #[test]
    fn test_default_web_provider_waits_for_credentials() {
        let config = WebSearchConfig::default();
        assert_eq!(config.provider, WebSearchProvider::GoogleCse);
        assert_eq!(config.endpoint_url(), Some("https://www.googleapis.com/customsearch/v1"));
        assert!(!config.is_configured());
        assert!(AppConfig::default().web_search_endpoint().is_none());
    }

    #[test]
    fn test_web_provider_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[web_search]
provider = "google_cse"
api_key = "AIza-test"
engine_id = "cx-test"
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert!(config.web_search.is_configured());
        assert_eq!(
            config.web_search_endpoint(),
            Some("https://www.googleapis.com/customsearch/v1")
        );

        let searxng = WebSearchConfig {
            provider: WebSearchProvider::Searxng,
            ..WebSearchConfig::default()
        };
        assert!(!searxng.is_configured());
        assert_eq!(WebSearchProvider::DuckDuckGo.to_string(), "duckduckgo");
    }

    // ====== Search Index Tests ======

    #[test]
    fn test_search_index_unconfigured_by_default() {
        assert!(!SearchIndexConfig::default().is_configured());
    }

    #[test]
    fn test_search_index_blank_data_store_is_unconfigured() {
        let config = SearchIndexConfig {
            project_id: "legal-project".to_string(),
            data_store_id: Some("   ".to_string()),
            access_token: Some("token".to_string()),
            ..SearchIndexConfig::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn test_search_index_endpoint_from_location() {
        let mut config = SearchIndexConfig::default();
        assert_eq!(config.api_endpoint(), "https://discoveryengine.googleapis.com");

        config.location = "us-central1".to_string();
        assert_eq!(
            config.api_endpoint(),
            "https://us-central1-discoveryengine.googleapis.com"
        );

        config.endpoint = Some("http://localhost:9200/".to_string());
        assert_eq!(config.api_endpoint(), "http://localhost:9200");
    }

    // ====== File Loading Tests ======

    #[test]
    fn test_from_file_with_partial_sections() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[llm]
llm_key = "secret"

[pipeline]
top_k = 5

[web_search]
endpoint = ""
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.llm_key(), "secret");
        assert_eq!(config.llm_model(), "gemini-pro-latest");
        assert_eq!(config.pipeline.top_k, 5);
        assert_eq!(config.pipeline.evidence_char_budget, 6000);
        assert!(config.web_search_endpoint().is_none());
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.logging.level, "info");
        assert!(!config.search_index.is_configured());
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.toml");
        let config = AppConfig::from_file(path).unwrap();
        let defaults = AppConfig::default();
        assert_eq!(config.pipeline.grounding_failure_phrases, defaults.pipeline.grounding_failure_phrases);
        assert_eq!(config.web_search.restricted.domains, defaults.web_search.restricted.domains);
        assert_eq!(config.server.max_upload_bytes, defaults.server.max_upload_bytes);
        assert!(!config.search_index.is_configured());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[pipeline\ntop_k = ").unwrap();
        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, crate::NyayaError::TomlParsing(_)));
    }

    // ====== Validation Tests ======

    #[test]
    fn test_zero_top_k_rejected() {
        let mut config = AppConfig::default();
        config.pipeline.top_k = 0;
        assert!(matches!(
            config.validate(),
            Err(crate::NyayaError::ConfigError(_))
        ));
    }

    #[test]
    fn test_restricted_max_results_bounds() {
        let mut config = AppConfig::default();
        config.web_search.restricted.max_results = 10;
        assert!(matches!(
            config.validate(),
            Err(crate::NyayaError::ConfigError(_))
        ));

        config.web_search.restricted.max_results = 0;
        assert!(config.validate().is_err());

        config.web_search.restricted.max_results = MAX_RESTRICTED_RESULTS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_failure_phrase_rejected() {
        let mut config = AppConfig::default();
        config.pipeline.grounding_failure_phrases.push(" ".to_string());
        assert!(config.validate().is_err());
    }
}
