mod file;
mod memory;

pub use file::FileConversationStore;
pub use memory::MemoryConversationStore;

use crate::cli::Args;
use crate::models::chat::Conversation;
use log::info;
use serde::{ Deserialize, Serialize };
use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("conversation store IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("conversation store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence port for the full conversation list.
///
/// The list is always read and written as a whole, head first.
pub trait ConversationStore: Send + Sync {
    fn load(&self) -> Result<Vec<Conversation>, StoreError>;

    fn save(&self, conversations: &[Conversation]) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    File,
    Memory,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseStoreTypeError {
    message: String,
}

impl fmt::Display for ParseStoreTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseStoreTypeError {}

impl FromStr for StoreType {
    type Err = ParseStoreTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(StoreType::File),
            "memory" => Ok(StoreType::Memory),
            _ =>
                Err(ParseStoreTypeError {
                    message: format!("Unsupported conversation store type: '{}'", s),
                }),
        }
    }
}

pub fn create_conversation_store(
    args: &Args
) -> Result<Arc<dyn ConversationStore>, Box<dyn Error + Send + Sync>> {
    match args.store_type.parse::<StoreType>()? {
        StoreType::File => {
            info!("Conversations will be stored in: {}", args.store_path);
            Ok(Arc::new(FileConversationStore::new(&args.store_path)))
        }
        StoreType::Memory => {
            info!("Conversations will be kept in memory only");
            Ok(Arc::new(MemoryConversationStore::default()))
        }
    }
}
