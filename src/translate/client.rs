//! Translation client backed by a MyMemory-compatible HTTP service.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use super::SOURCE_LANGUAGE;

/// Translation collaborator mapping `(text, target language)` to text.
///
/// Failures are expected to be recovered by the caller (fall back to the
/// untranslated text); implementations should not retry internally.
pub trait Translator {
    /// Translate `text` from the source language into `target`.
    ///
    /// # Errors
    /// Returns an error if the translation service is unreachable or
    /// produces an unusable result.
    fn translate(&self, text: &str, target: &str) -> Result<String>;
}

/// Request timeout for the translation service.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Translator calling a MyMemory-compatible HTTP endpoint.
pub struct HttpTranslator {
    client: reqwest::blocking::Client, // HTTP client (blocking; used from the worker thread)
    base_url: String,                  // Service endpoint, e.g. https://api.mymemory.translated.net/get
}

/// Response envelope of the MyMemory translation API.
#[derive(Debug, Deserialize)]
struct TranslationResponse {
    #[serde(rename = "responseData")]
    response_data: TranslationData,
}

#[derive(Debug, Deserialize)]
struct TranslationData {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl HttpTranslator {
    /// Create a new translation client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self> {
        info!("Using translation service at {}", base_url);

        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create translation HTTP client")?;

        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }
}

impl Translator for HttpTranslator {
    fn translate(&self, text: &str, target: &str) -> Result<String> {
        let url = format!("{}?q={}&langpair={}|{}", self.base_url, urlencoding::encode(text), SOURCE_LANGUAGE, target);

        debug!("Requesting translation {} -> {} for \"{}\"", SOURCE_LANGUAGE, target, text);

        let response = self
            .client
            .get(&url)
            .send()
            .context("Translation request failed")?
            .error_for_status()
            .context("Translation service returned an error")?;

        let body: TranslationResponse = response.json().context("Failed to parse translation response")?;

        let translated = body.response_data.translated_text.trim().to_string();
        if translated.is_empty() {
            anyhow::bail!("Translation service returned an empty result");
        }

        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_translation_response() {
        let payload = r#"{
            "responseData": {"translatedText": "BONJOUR", "match": 1},
            "responseStatus": 200,
            "matches": []
        }"#;

        let body: TranslationResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(body.response_data.translated_text, "BONJOUR");
    }
}
