#![allow(dead_code)]

use sentiment_relay::server::{self, AppState};
use sentiment_relay::ProviderConfig;
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const OPENAI_PATH: &str = "/v1/chat/completions";
pub const ANTHROPIC_PATH: &str = "/v1/messages";

pub fn config(provider: &str, base_url: &str, path: &str) -> ProviderConfig {
    ProviderConfig::new(Some("test-key".to_string()), provider, "test-model".to_string(), 5)
        .with_endpoint(Some(format!("{}{}", base_url, path)))
}

pub fn openai_envelope(content: &str) -> String {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": "test-model",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

pub fn anthropic_envelope(text: &str) -> String {
    json!({
        "id": "msg_123",
        "type": "message",
        "role": "assistant",
        "content": [{ "type": "text", "text": text }],
        "stop_reason": "end_turn"
    })
    .to_string()
}

/// Binds the relay to an ephemeral port and returns its base URL.
pub async fn spawn_app(config: ProviderConfig) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::new(config).unwrap();
    tokio::spawn(async move {
        server::serve(listener, state).await.unwrap();
    });
    format!("http://{}", addr)
}

pub async fn post_json(url: &str, body: Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(url)
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

pub async fn get_json(url: &str) -> (u16, Value) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}
