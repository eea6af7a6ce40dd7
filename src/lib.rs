//! HTTP relay that asks an LLM provider to analyze customer messages and
//! recovers a structured result from whatever text the model sends back.

pub mod error;
pub mod llm;
pub mod models;
pub mod server;

pub use error::RelayError;
pub use llm::{ProviderConfig, ProviderKind};
pub use models::{AnalysisOptions, AnalysisRequest, AnalysisResult, RequestError};
