//! Google Translate v2 API client

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

const TRANSLATE_BASE_URL: &str = "https://translation.googleapis.com/language/translate/v2";
const USER_AGENT: &str = "evishare/0.1";

/// Translate client errors
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("No translations in response")]
    NoTranslation,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// Google Translate API client
pub struct GoogleTranslateClient {
    http_client: reqwest::Client,
    token: String,
}

impl GoogleTranslateClient {
    pub fn new(token: String) -> Result<Self, TranslateError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TranslateError::NetworkError(e.to_string()))?;

        Ok(Self { http_client, token })
    }

    /// Translate one text between the given language codes.
    ///
    /// Uses format=text so the response carries plain text rather than
    /// HTML-entity-escaped markup.
    pub async fn translate_text(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError> {
        let response = self
            .http_client
            .post(TRANSLATE_BASE_URL)
            .bearer_auth(&self.token)
            .json(&json!({
                "q": [text],
                "source": source_lang,
                "target": target_lang,
                "format": "text",
            }))
            .send()
            .await
            .map_err(|e| TranslateError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranslateError::ApiError(status.as_u16(), error_text));
        }

        let translate_response: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::ParseError(e.to_string()))?;

        translate_response
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or(TranslateError::NoTranslation)
    }
}
