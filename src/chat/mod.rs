pub mod http;

use crate::models::backend::{ AnswerDetails, ChatAnswer };
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;

pub use self::http::HttpChatClient;

pub const FALLBACK_ANSWER: &str = "Sorry, I couldn't process your request.";

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("invalid backend URL '{0}'")]
    InvalidUrl(String),
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// One best-effort request for `query`. No retry.
    async fn ask(&self, query: &str) -> Result<ChatAnswer, ChatError>;

    async fn health(&self) -> Result<(), ChatError>;

    fn endpoint(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    pub base_url: String,
    pub verbose: bool,
    pub timeout: Option<Duration>,
}

impl Default for ChatClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            verbose: false,
            timeout: None,
        }
    }
}

pub fn new_client(config: &ChatClientConfig) -> Result<Arc<dyn ChatClient>, ChatError> {
    let client = HttpChatClient::from_config(config)?;
    Ok(Arc::new(client))
}

/// Pulls the answer text out of a `/chat` response body.
///
/// `answer` may be a string, or an object wrapping another `answer`. Anything
/// else, `null` included, is stringified; a missing field gives [`FALLBACK_ANSWER`].
pub fn extract_answer(body: &JsonValue) -> String {
    match body.get("answer") {
        Some(JsonValue::String(text)) => text.clone(),
        Some(JsonValue::Object(inner)) if inner.get("answer").is_some_and(is_truthy) => {
            match &inner["answer"] {
                JsonValue::String(text) => text.clone(),
                other => other.to_string(),
            }
        }
        None => FALLBACK_ANSWER.to_string(),
        Some(other) => other.to_string(),
    }
}

pub fn parse_answer(body: &JsonValue) -> ChatAnswer {
    ChatAnswer {
        text: extract_answer(body),
        details: serde_json::from_value::<AnswerDetails>(body.clone()).ok(),
    }
}

fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}
