use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::TranslationProvider;
use crate::config::TranslateConfig;
use crate::{Error, Result};

/// Google's public `translate_a/single` endpoint
pub struct GoogleTranslateProvider {
    client: Client,
    endpoint: String,
}

impl GoogleTranslateProvider {
    pub fn new(config: &TranslateConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait::async_trait]
impl TranslationProvider for GoogleTranslateProvider {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source_lang),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| Error::Translate(format!("request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Translate(format!("HTTP {}", status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::Translate(format!("failed to parse response: {}", e.without_url())))?;

        extract_translation(&body)
    }
}

/// The response is `[[["translated", "original", ...], ...], ...]`;
/// the translation is the concatenation of every segment's first element.
fn extract_translation(body: &Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Translate("unexpected response shape".to_string()))?;

    Ok(segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect())
}
