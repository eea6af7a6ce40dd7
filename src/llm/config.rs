use std::fmt;
use std::time::Duration;

use crate::error::RelayError;

pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";

/// Upstream providers this relay knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::OpenAi, ProviderKind::Anthropic];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => OPENAI_ENDPOINT,
            ProviderKind::Anthropic => ANTHROPIC_ENDPOINT,
        }
    }

    pub fn supported() -> String {
        Self::ALL
            .iter()
            .map(|kind| kind.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Process-wide provider settings, built once at startup.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub provider: String,
    pub model: String,
    pub timeout_seconds: u64,
    /// Replaces the provider's default endpoint when set.
    pub endpoint: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: "openai".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            timeout_seconds: 15,
            endpoint: None,
        }
    }
}

impl ProviderConfig {
    pub fn new(api_key: Option<String>, provider: &str, model: String, timeout_seconds: u64) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            provider: provider.trim().to_lowercase(),
            model,
            timeout_seconds,
            endpoint: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.endpoint = endpoint.filter(|url| !url.is_empty());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn api_key(&self) -> Result<&str, RelayError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(RelayError::MissingApiKey)
    }

    pub fn provider_kind(&self) -> Result<ProviderKind, RelayError> {
        ProviderKind::from_name(&self.provider).ok_or_else(|| RelayError::UnknownProvider {
            provider: self.provider.clone(),
        })
    }

    pub fn endpoint_for(&self, kind: ProviderKind) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| kind.default_endpoint())
    }

    /// Checks both configuration requirements, key first.
    pub fn validate(&self) -> Result<ProviderKind, RelayError> {
        self.api_key()?;
        self.provider_kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_name_is_normalized() {
        let config = ProviderConfig::new(Some("k".into()), " Anthropic ", "claude".into(), 15);
        assert_eq!(config.provider_kind().unwrap(), ProviderKind::Anthropic);
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = ProviderConfig::new(Some("   ".into()), "openai", "m".into(), 15);
        assert!(matches!(config.validate(), Err(RelayError::MissingApiKey)));
    }

    #[test]
    fn missing_key_is_reported_before_unknown_provider() {
        let config = ProviderConfig::new(None, "mistral", "m".into(), 15);
        assert!(matches!(config.validate(), Err(RelayError::MissingApiKey)));

        let config = ProviderConfig::new(Some("k".into()), "mistral", "m".into(), 15);
        assert!(matches!(
            config.validate(),
            Err(RelayError::UnknownProvider { provider }) if provider == "mistral"
        ));
    }

    #[test]
    fn endpoint_override_applies_to_every_provider() {
        let config = ProviderConfig::default();
        assert_eq!(config.endpoint_for(ProviderKind::OpenAi), OPENAI_ENDPOINT);

        let config = config.with_endpoint(Some("http://127.0.0.1:9/v1".into()));
        assert_eq!(config.endpoint_for(ProviderKind::Anthropic), "http://127.0.0.1:9/v1");
    }
}
