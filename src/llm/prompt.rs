use crate::models::AnalysisOptions;

/// Comma-joined list of the enabled tasks, always in the same order.
pub fn task_list(options: &AnalysisOptions) -> String {
    let mut tasks = Vec::new();
    if options.include_sentiment {
        tasks.push("sentiment (positive, negative, or neutral)");
    }
    if options.include_summary {
        tasks.push("brief summary in 2-3 sentences");
    }
    if options.include_keywords {
        tasks.push("up to 5 key topics or keywords");
    }
    if options.include_suggestion {
        tasks.push("suggested response");
    }
    tasks.join(", ")
}

/// The message is interpolated as-is; the response parser copes with whatever comes back.
pub fn build_prompt(message: &str, options: &AnalysisOptions) -> String {
    format!(
        "Analyze the following customer message for {}.

    Customer message: \"{}\"

    Format your response as JSON:
    {{
      \"sentiment\": \"positive/negative/neutral\",
      \"summary\": \"Brief summary here\",
      \"keywords\": [\"keyword1\", \"keyword2\", \"keyword3\"]
    }}

    Only respond with the JSON object, nothing else.",
        task_list(options),
        message
    )
}
