use thiserror::Error;

#[derive(Error, Debug)]
pub enum NyayaError {
    /// The capability is not installed or not configured (missing endpoint, key, data store).
    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// The capability is configured but the call failed (transport, HTTP status, parse).
    #[error("Retrieval unavailable: {0}")]
    RetrievalUnavailable(String),

    #[error("Generation error: {0}")]
    GenerationError(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction error: {0}")]
    ExtractionError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Custom(String),
}

impl NyayaError {
    /// Whether the error only means "no evidence from this source", so the cascade may advance.
    #[must_use]
    pub const fn is_recoverable_retrieval(&self) -> bool {
        matches!(
            self,
            Self::CapabilityUnavailable(_) | Self::RetrievalUnavailable(_)
        )
    }
}

impl From<reqwest::Error> for NyayaError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NyayaError>;
