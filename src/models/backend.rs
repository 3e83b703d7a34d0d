use serde::{ Serialize, Deserialize };

/// Body of `POST /chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub query: String,
    pub verbose: bool,
}

/// Extra fields the backend returns when asked for a verbose answer.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AnswerDetails {
    pub reasoning: String,
    pub thought_process: String,
    pub time_process: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatAnswer {
    pub text: String,
    pub details: Option<AnswerDetails>,
}

impl ChatAnswer {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), details: None }
    }
}
