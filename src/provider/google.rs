// src/provider/google.rs — Google Generative AI (Gemini) provider

use async_trait::async_trait;
use std::time::Duration;

use super::{GenerateParams, ModelProvider};
use crate::infra::errors::{GhostquillError, ProviderErrorKind};

#[derive(Debug)]
pub struct GoogleProvider {
    api_key: String,
    client: reqwest::Client,
}

impl GoogleProvider {
    pub fn new(api_key: String, request_timeout: Duration) -> Result<Self, GhostquillError> {
        if api_key.trim().is_empty() {
            return Err(GhostquillError::MissingApiKey);
        }

        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| GhostquillError::Config(e.to_string()))?;

        Ok(Self { api_key, client })
    }

    fn base_url(&self) -> &str {
        "https://generativelanguage.googleapis.com/v1beta"
    }

    fn build_request_body(&self, prompt: &str, params: &GenerateParams) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
            "generationConfig": {
                "maxOutputTokens": params.max_output_tokens,
                "temperature": params.temperature,
            },
        })
    }
}

/// Map an HTTP failure to a typed kind. Quota-vs-throttle on 429 needs the
/// body text since Gemini reports both under the same status.
fn classify_status(status: reqwest::StatusCode, body: &str) -> ProviderErrorKind {
    match status.as_u16() {
        429 => {
            let lower = body.to_lowercase();
            if lower.contains("quota") || lower.contains("daily") || lower.contains("perday") {
                ProviderErrorKind::QuotaExceeded
            } else {
                ProviderErrorKind::RateLimited
            }
        }
        400 | 401 | 403 => ProviderErrorKind::InvalidRequest,
        _ if status.is_server_error() => ProviderErrorKind::Transient,
        _ => ProviderErrorKind::Unknown,
    }
}

#[async_trait]
impl ModelProvider for GoogleProvider {
    fn id(&self) -> &str {
        "google"
    }

    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerateParams,
    ) -> Result<String, GhostquillError> {
        let body = self.build_request_body(prompt, params);

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url(),
            model,
            self.api_key,
        );

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GhostquillError::Provider {
                model: model.to_string(),
                message: e.to_string(),
                kind: if e.is_timeout() {
                    ProviderErrorKind::Timeout
                } else if e.is_connect() {
                    ProviderErrorKind::Transient
                } else {
                    ProviderErrorKind::Unknown
                },
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(GhostquillError::Provider {
                model: model.to_string(),
                message: format!("HTTP {}: {}", status, error_body),
                kind: classify_status(status, &error_body),
            });
        }

        let resp: serde_json::Value =
            response.json().await.map_err(|e| GhostquillError::Provider {
                model: model.to_string(),
                message: format!("Failed to parse response: {}", e),
                kind: ProviderErrorKind::Unknown,
            })?;

        // Concatenate text from candidates[0].content.parts
        let parts = resp["candidates"][0]["content"]["parts"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        let mut content = String::new();
        for part in &parts {
            if let Some(text) = part["text"].as_str() {
                content.push_str(text);
            }
        }

        Ok(content)
    }
}
