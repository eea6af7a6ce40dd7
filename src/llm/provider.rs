use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use super::config::{ProviderConfig, ProviderKind};
use crate::error::RelayError;

const TEMPERATURE: f64 = 0.1;
const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MAX_TOKENS: u32 = 500;

impl ProviderKind {
    pub fn headers(&self, api_key: &str) -> Result<HeaderMap, RelayError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        match self {
            ProviderKind::OpenAi => {
                headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", api_key))?);
            }
            ProviderKind::Anthropic => {
                headers.insert("x-api-key", header_value(api_key)?);
                headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
            }
        }
        Ok(headers)
    }

    pub fn payload(&self, model: &str, prompt: &str) -> Value {
        match self {
            ProviderKind::OpenAi => json!({
                "model": model,
                "messages": [{ "role": "user", "content": prompt }],
                "temperature": TEMPERATURE,
            }),
            ProviderKind::Anthropic => json!({
                "model": model,
                "max_tokens": ANTHROPIC_MAX_TOKENS,
                "messages": [{ "role": "user", "content": prompt }],
                "temperature": TEMPERATURE,
            }),
        }
    }

    /// Pulls the reply text out of the provider's response envelope.
    pub fn extract_text(&self, envelope: &Value) -> Result<String, RelayError> {
        let text = match self {
            ProviderKind::OpenAi => envelope["choices"][0]["message"]["content"].as_str(),
            ProviderKind::Anthropic => envelope["content"][0]["text"].as_str(),
        };
        text.map(|t| t.trim().to_string()).ok_or_else(|| {
            let envelope_str = serde_json::to_string_pretty(envelope)
                .unwrap_or_else(|_| "Failed to format response".to_string());
            error!("Invalid response format. Full response: {}", envelope_str);
            RelayError::InvalidResponse(format!("missing reply text in {} response", self))
        })
    }
}

fn header_value(value: &str) -> Result<HeaderValue, RelayError> {
    HeaderValue::from_str(value).map_err(|_| RelayError::InvalidApiKey)
}

/// Shared client; the configured timeout bounds every provider call.
pub fn build_client(config: &ProviderConfig) -> Result<Client, RelayError> {
    Ok(Client::builder().timeout(config.timeout()).build()?)
}

/// Sends one prompt upstream and returns the trimmed reply text. No retries.
pub async fn call_provider(
    client: &Client,
    kind: ProviderKind,
    prompt: &str,
    config: &ProviderConfig,
) -> Result<String, RelayError> {
    let api_key = config.api_key()?;
    let endpoint = config.endpoint_for(kind);
    debug!("Calling {} at {} with model {}", kind, endpoint, config.model);

    let response = client
        .post(endpoint)
        .headers(kind.headers(api_key)?)
        .json(&kind.payload(&config.model, prompt))
        .send()
        .await
        .map_err(|e| transport_error(e, config))?;

    let status = response.status();
    if status != StatusCode::OK {
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read {} error body: {}", kind, e);
                format!("<failed to read response body: {}>", e)
            }
        };
        error!("{} API returned {}: {}", kind, status.as_u16(), body);
        return Err(RelayError::Provider {
            status: status.as_u16(),
            body,
        });
    }

    let envelope: Value = response.json().await.map_err(|e| {
        if e.is_decode() {
            RelayError::InvalidResponse(format!("{} response is not valid JSON: {}", kind, e))
        } else {
            transport_error(e, config)
        }
    })?;
    kind.extract_text(&envelope)
}

fn transport_error(err: reqwest::Error, config: &ProviderConfig) -> RelayError {
    if err.is_timeout() {
        RelayError::Timeout {
            seconds: config.timeout_seconds,
        }
    } else {
        RelayError::Network(err)
    }
}
