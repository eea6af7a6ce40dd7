use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Which parts of the analysis the caller wants from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub include_sentiment: bool,
    pub include_summary: bool,
    pub include_keywords: bool,
    pub include_suggestion: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            include_sentiment: true,
            include_summary: true,
            include_keywords: true,
            include_suggestion: false,
        }
    }
}

impl AnalysisOptions {
    /// Reads the flags from an `options` object. Each flag is judged by JSON
    /// truthiness, so `1` or `"yes"` enable a task and `0`, `""` or `null` disable it.
    pub fn from_object(options: &serde_json::Map<String, Value>) -> Self {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| options.get(key).map_or(default, is_truthy);
        Self {
            include_sentiment: flag("includeSentiment", defaults.include_sentiment),
            include_summary: flag("includeSummary", defaults.include_summary),
            include_keywords: flag("includeKeywords", defaults.include_keywords),
            include_suggestion: flag("includeSuggestion", defaults.include_suggestion),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Why an analyze body was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("No message provided")]
    MissingMessage,

    #[error("Invalid message: expected a string")]
    InvalidMessage,

    #[error("Invalid options: expected an object with boolean flags")]
    InvalidOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub message: String,
    pub options: AnalysisOptions,
}

impl AnalysisRequest {
    /// Validates the inbound JSON body of `POST /api/analyze`.
    pub fn from_json(body: &Value) -> Result<Self, RequestError> {
        let message = match body.get("message") {
            None | Some(Value::Null) => return Err(RequestError::MissingMessage),
            Some(Value::String(m)) if m.is_empty() => return Err(RequestError::MissingMessage),
            Some(Value::String(m)) => m.clone(),
            Some(_) => return Err(RequestError::InvalidMessage),
        };
        let options = match body.get("options") {
            None | Some(Value::Null) => AnalysisOptions::default(),
            Some(Value::Object(fields)) => AnalysisOptions::from_object(fields),
            Some(_) => return Err(RequestError::InvalidOptions),
        };
        Ok(Self { message, options })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Keyword guess used when the model did not answer with JSON.
    pub fn guess(text: &str) -> Self {
        let lowered = text.to_lowercase();
        if lowered.contains("positive") {
            Sentiment::Positive
        } else if lowered.contains("negative") {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

/// Fields decoded from the JSON object embedded in the model's reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredAnalysis {
    pub sentiment: String,
    pub summary: String,
    pub keywords: Vec<Value>,
    pub suggestion: String,
}

/// Best-effort analysis built from a reply that carried no JSON at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainTextAnalysis {
    pub sentiment: Sentiment,
    pub summary: String,
    pub raw_response: String,
}

/// Outcome of parsing one model reply.
///
/// Consumers of the serialized form must check `error` before reading the
/// analysis fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisResult {
    Structured(StructuredAnalysis),
    PlainText(PlainTextAnalysis),
    Failed { message: String, raw_response: String },
}

impl AnalysisResult {
    pub fn is_error(&self) -> bool {
        matches!(self, AnalysisResult::Failed { .. })
    }
}

impl Serialize for AnalysisResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AnalysisResult::Structured(analysis) => {
                let mut s = serializer.serialize_struct("AnalysisResult", 5)?;
                s.serialize_field("sentiment", &analysis.sentiment)?;
                s.serialize_field("summary", &analysis.summary)?;
                s.serialize_field("keywords", &analysis.keywords)?;
                s.serialize_field("suggestion", &analysis.suggestion)?;
                s.serialize_field("error", &false)?;
                s.end()
            }
            AnalysisResult::PlainText(analysis) => {
                let mut s = serializer.serialize_struct("AnalysisResult", 5)?;
                s.serialize_field("sentiment", &analysis.sentiment)?;
                s.serialize_field("summary", &analysis.summary)?;
                s.serialize_field("keywords", &Vec::<String>::new())?;
                s.serialize_field("error", &false)?;
                s.serialize_field("raw_response", &analysis.raw_response)?;
                s.end()
            }
            AnalysisResult::Failed { message, raw_response } => {
                let mut s = serializer.serialize_struct("AnalysisResult", 3)?;
                s.serialize_field("error", &true)?;
                s.serialize_field("message", message)?;
                s.serialize_field("raw_response", raw_response)?;
                s.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_options_use_defaults() {
        let request = AnalysisRequest::from_json(&json!({ "message": "hi" })).unwrap();
        assert_eq!(request.options, AnalysisOptions::default());
        assert!(!request.options.include_suggestion);
    }

    #[test]
    fn partial_options_keep_per_flag_defaults() {
        let options = AnalysisRequest::from_json(&json!({
            "message": "hi",
            "options": { "includeSuggestion": true, "includeKeywords": false }
        }))
        .unwrap()
        .options;
        assert!(options.include_sentiment);
        assert!(options.include_summary);
        assert!(!options.include_keywords);
        assert!(options.include_suggestion);
    }

    #[test]
    fn non_boolean_flags_use_truthiness() {
        let options = AnalysisRequest::from_json(&json!({
            "message": "hello there",
            "options": {
                "includeSentiment": 1,
                "includeSummary": 0,
                "includeKeywords": "",
                "includeSuggestion": "yes"
            }
        }))
        .unwrap()
        .options;
        assert!(options.include_sentiment);
        assert!(!options.include_summary);
        assert!(!options.include_keywords);
        assert!(options.include_suggestion);
    }

    #[test]
    fn empty_or_missing_message_is_rejected() {
        for body in [json!({}), json!({ "message": "" }), json!({ "message": null }), json!([1])] {
            assert_eq!(
                AnalysisRequest::from_json(&body),
                Err(RequestError::MissingMessage)
            );
        }
    }

    #[test]
    fn badly_typed_fields_name_the_problem() {
        assert_eq!(
            AnalysisRequest::from_json(&json!({ "message": 42 })),
            Err(RequestError::InvalidMessage)
        );
        assert_eq!(
            AnalysisRequest::from_json(&json!({ "message": "hi", "options": [true] })),
            Err(RequestError::InvalidOptions)
        );
    }

    #[test]
    fn sentiment_guess_prefers_positive() {
        assert_eq!(Sentiment::guess("Mostly POSITIVE, a bit negative"), Sentiment::Positive);
        assert_eq!(Sentiment::guess("quite Negative"), Sentiment::Negative);
        assert_eq!(Sentiment::guess("meh"), Sentiment::Neutral);
    }

    #[test]
    fn failed_result_serializes_without_analysis_fields() {
        let result = AnalysisResult::Failed {
            message: "Error parsing AI response: boom".to_string(),
            raw_response: "{oops}".to_string(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "error": true,
                "message": "Error parsing AI response: boom",
                "raw_response": "{oops}"
            })
        );
    }

    #[test]
    fn plain_text_result_carries_raw_response() {
        let result = AnalysisResult::PlainText(PlainTextAnalysis {
            sentiment: Sentiment::Neutral,
            summary: "ok".to_string(),
            raw_response: "ok".to_string(),
        });
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["sentiment"], "neutral");
        assert_eq!(value["keywords"], json!([]));
        assert_eq!(value["error"], false);
        assert_eq!(value["raw_response"], "ok");
        assert!(value.get("suggestion").is_none());
    }
}
