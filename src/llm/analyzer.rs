use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{info, warn};

use super::config::{ProviderConfig, ProviderKind};
use super::prompt::build_prompt;
use super::provider::call_provider;
use crate::error::RelayError;
use crate::models::{
    AnalysisRequest, AnalysisResult, PlainTextAnalysis, Sentiment, StructuredAnalysis,
};

const SUMMARY_FALLBACK_CHARS: usize = 200;

lazy_static! {
    // Greedy on purpose: first `{` through last `}`, braces are not balanced.
    static ref JSON_BLOCK_REGEX: Regex = Regex::new(r"\{[\s\S]*\}").unwrap();
    static ref CODE_FENCE_REGEX: Regex = Regex::new(r"```json|```").unwrap();
}

/// Reads the reply fields as the model sent them. Any decodable object is accepted;
/// `null` or missing fields take their defaults.
fn structured_from_object(reply: &Map<String, Value>) -> StructuredAnalysis {
    StructuredAnalysis {
        sentiment: text_field(reply, "sentiment").unwrap_or_else(|| "neutral".to_string()),
        summary: text_field(reply, "summary").unwrap_or_default(),
        keywords: match reply.get("keywords") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.clone(),
            Some(other) => vec![other.clone()],
        },
        suggestion: text_field(reply, "suggestion").unwrap_or_default(),
    }
}

fn text_field(reply: &Map<String, Value>, key: &str) -> Option<String> {
    match reply.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Runs one message through prompt, provider and parser.
pub async fn analyze_message(
    client: &Client,
    kind: ProviderKind,
    request: &AnalysisRequest,
    config: &ProviderConfig,
) -> Result<AnalysisResult, RelayError> {
    let prompt = build_prompt(&request.message, &request.options);
    let raw = call_provider(client, kind, &prompt, config).await?;
    let result = parse_ai_response(&raw);
    if !result.is_error() {
        info!("Analyzed message with {} ({} chars of reply)", kind, raw.chars().count());
    }
    Ok(result)
}

/// Turns free-form model output into an [`AnalysisResult`]. Never fails.
///
/// A brace-delimited block is decoded as JSON after stripping code fences; if it
/// does not decode, the result is an error carrying the raw text. Text without any
/// braces gets a keyword-based sentiment and a truncated summary instead.
pub fn parse_ai_response(raw: &str) -> AnalysisResult {
    match JSON_BLOCK_REGEX.find(raw) {
        Some(block) => {
            let cleaned = CODE_FENCE_REGEX.replace_all(block.as_str(), "");
            // Duplicate keys resolve last-wins.
            match serde_json::from_str::<Map<String, Value>>(cleaned.trim()) {
                Ok(reply) => AnalysisResult::Structured(structured_from_object(&reply)),
                Err(e) => {
                    warn!("Error parsing AI response: {}", e);
                    warn!("Raw response: {}", raw);
                    AnalysisResult::Failed {
                        message: format!("Error parsing AI response: {}", e),
                        raw_response: raw.to_string(),
                    }
                }
            }
        }
        None => AnalysisResult::PlainText(PlainTextAnalysis {
            sentiment: Sentiment::guess(raw),
            summary: truncate_summary(raw),
            raw_response: raw.to_string(),
        }),
    }
}

fn truncate_summary(text: &str) -> String {
    if text.chars().count() > SUMMARY_FALLBACK_CHARS {
        let head: String = text.chars().take(SUMMARY_FALLBACK_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
