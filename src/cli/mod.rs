use clap::Parser;
use std::time::Duration;

use crate::chat::ChatClientConfig;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Backend Args ---
    /// Base URL of the answering service; requests go to `<url>/chat`
    #[arg(long, env = "BACKEND_URL", default_value = "http://localhost:8000")]
    pub backend_url: String,

    /// Ask the backend for verbose answers (reasoning and timing are logged, never stored)
    #[arg(long, env = "VERBOSE_ANSWERS", default_value = "false")]
    pub verbose_answers: bool,

    /// Optional request timeout in seconds. Unset means wait for the backend indefinitely.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    // --- Conversation Store Args ---
    /// Conversation store type (file, memory)
    #[arg(long, env = "STORE_TYPE", default_value = "file")]
    pub store_type: String,

    /// Path of the JSON file holding all conversations (file store only)
    #[arg(long, env = "STORE_PATH", default_value = "conversations.json")]
    pub store_path: String,

    /// Identifier scheme for conversations and messages (millis, uuid)
    #[arg(long, env = "ID_SCHEME", default_value = "millis")]
    pub id_scheme: String,

    // --- General App Args ---
    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}

impl Args {
    pub fn chat_client_config(&self) -> ChatClientConfig {
        ChatClientConfig {
            base_url: self.backend_url.clone(),
            verbose: self.verbose_answers,
            timeout: self.request_timeout_secs.filter(|s| *s > 0).map(Duration::from_secs),
        }
    }
}
