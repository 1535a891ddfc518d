use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single translation job; created per trigger and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated_text: String,
    #[serde(default)]
    pub detected_source_lang: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Malformed(String),
    #[error("{0}")]
    Service(String),
    #[error("unsupported language code {0:?}")]
    UnsupportedLanguage(String),
}

/// Translation backend.
#[async_trait]
pub trait TranslateInterface: Send + Sync {
    /// Short backend name for logging.
    fn name(&self) -> &str;

    async fn translate(
        &self,
        request: &TranslateRequest,
    ) -> Result<TranslateResponse, TranslateError>;
}
