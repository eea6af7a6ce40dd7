pub mod analyzer;
pub mod config;
pub mod prompt;
pub mod provider;

pub use config::{ProviderConfig, ProviderKind};

pub use analyzer::{analyze_message, parse_ai_response};
pub use prompt::build_prompt;
pub use provider::{build_client, call_provider};
