use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("API key not configured. Please set the API key in environment variables.")]
    MissingApiKey,

    #[error("API key contains characters that cannot be sent in a request header")]
    InvalidApiKey,

    #[error("Unknown API provider: {provider}. Supported providers: {}", crate::llm::ProviderKind::supported())]
    UnknownProvider { provider: String },

    #[error("API Error: {status} - {body}")]
    Provider { status: u16, body: String },

    #[error("Request to provider timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl RelayError {
    /// Configuration problems are the caller's to fix and map to 400.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RelayError::MissingApiKey
                | RelayError::InvalidApiKey
                | RelayError::UnknownProvider { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_message_includes_status_and_body() {
        let err = RelayError::Provider {
            status: 401,
            body: "bad key".to_string(),
        };
        assert_eq!(err.to_string(), "API Error: 401 - bad key");
        assert!(!err.is_configuration());
    }

    #[test]
    fn unknown_provider_lists_supported_set() {
        let err = RelayError::UnknownProvider {
            provider: "cohere".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown API provider: cohere. Supported providers: openai, anthropic"
        );
        assert!(err.is_configuration());
    }
}
