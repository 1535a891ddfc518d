use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::interface::{TranslateError, TranslateInterface, TranslateRequest, TranslateResponse};
use crate::config_manager::translate::LibreTranslateConfig;

/// Client for a LibreTranslate server (`POST /translate`).
pub struct LibreTranslateClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct LibreRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

impl LibreTranslateClient {
    pub fn new(config: &LibreTranslateConfig) -> Result<Self, TranslateError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }
}

#[async_trait]
impl TranslateInterface for LibreTranslateClient {
    fn name(&self) -> &str {
        "libretranslate"
    }

    async fn translate(
        &self,
        request: &TranslateRequest,
    ) -> Result<TranslateResponse, TranslateError> {
        let url = format!("{}/translate", self.base_url);
        let body = LibreRequest {
            q: &request.text,
            source: libre_code(&request.source_lang)?,
            target: libre_code(&request.target_lang)?,
            format: "text",
            api_key: self.api_key.as_deref(),
        };
        debug!("Sending LibreTranslate request: {} -> {}", body.source, body.target);

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        let payload: Value = match response.json().await {
            Ok(payload) => payload,
            Err(_) if !status.is_success() => {
                return Err(TranslateError::Status {
                    status: status.as_u16(),
                    body: String::new(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        if !status.is_success() && payload.get("error").is_none() {
            return Err(TranslateError::Status {
                status: status.as_u16(),
                body: payload.to_string(),
            });
        }
        parse_libre_response(&payload)
    }
}

/// LibreTranslate knows `zh`, not `zh-cn`.
fn libre_code(code: &str) -> Result<&str, TranslateError> {
    code.split('-')
        .next()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| TranslateError::UnsupportedLanguage(code.to_string()))
}

pub(crate) fn parse_libre_response(payload: &Value) -> Result<TranslateResponse, TranslateError> {
    if let Some(error) = payload.get("error").and_then(Value::as_str) {
        return Err(TranslateError::Service(error.to_string()));
    }

    let translated_text = payload
        .get("translatedText")
        .and_then(Value::as_str)
        .ok_or_else(|| TranslateError::Malformed("missing translatedText".to_string()))?
        .to_string();

    let detected_source_lang = payload
        .pointer("/detectedLanguage/language")
        .and_then(Value::as_str)
        .map(|s| s.to_string());

    Ok(TranslateResponse {
        translated_text,
        detected_source_lang,
    })
}
