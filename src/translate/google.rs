use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::interface::{TranslateError, TranslateInterface, TranslateRequest, TranslateResponse};
use crate::config_manager::translate::GoogleTranslateConfig;

/// Client for the public `translate_a/single` endpoint (`client=gtx`).
pub struct GoogleTranslateClient {
    client: Client,
    base_url: String,
}

impl GoogleTranslateClient {
    pub fn new(config: &GoogleTranslateConfig) -> Result<Self, TranslateError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TranslateInterface for GoogleTranslateClient {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate(
        &self,
        request: &TranslateRequest,
    ) -> Result<TranslateResponse, TranslateError> {
        let url = format!("{}/translate_a/single", self.base_url);
        debug!(
            "Sending translate request: {} -> {}, {} chars",
            request.source_lang,
            request.target_lang,
            request.text.chars().count()
        );

        // Text goes in the form body so long inputs don't blow the URL limit.
        let response = self
            .client
            .post(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", request.source_lang.as_str()),
                ("tl", request.target_lang.as_str()),
                ("dt", "t"),
            ])
            .form(&[("q", request.text.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json().await?;
        parse_gtx_response(&payload)
    }
}

/// Shape: `[[["Hola","Hello",..], ["mundo","world",..]], null, "en", ...]`.
pub(crate) fn parse_gtx_response(payload: &Value) -> Result<TranslateResponse, TranslateError> {
    let segments = payload
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::Malformed("missing translation segments".to_string()))?;

    let mut translated_text = String::new();
    for segment in segments {
        if let Some(piece) = segment.get(0).and_then(Value::as_str) {
            translated_text.push_str(piece);
        }
    }

    if translated_text.is_empty() && !segments.is_empty() {
        return Err(TranslateError::Malformed(
            "segments carried no translated text".to_string(),
        ));
    }

    let detected_source_lang = payload
        .get(2)
        .and_then(Value::as_str)
        .map(|s| s.to_string());

    Ok(TranslateResponse {
        translated_text,
        detected_source_lang,
    })
}
