use crate::history::{ ConversationStore, StoreError };
use crate::models::chat::Conversation;
use std::sync::Mutex;

/// Keeps the last saved list in process memory.
#[derive(Default)]
pub struct MemoryConversationStore {
    saved: Mutex<Vec<Conversation>>,
    saves: Mutex<usize>,
}

impl MemoryConversationStore {
    pub fn with_conversations(conversations: Vec<Conversation>) -> Self {
        Self {
            saved: Mutex::new(conversations),
            saves: Mutex::new(0),
        }
    }

    pub fn snapshot(&self) -> Vec<Conversation> {
        self.saved.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Number of successful `save` calls so far.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl ConversationStore for MemoryConversationStore {
    fn load(&self) -> Result<Vec<Conversation>, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, conversations: &[Conversation]) -> Result<(), StoreError> {
        let mut saved = self.saved.lock().unwrap_or_else(|p| p.into_inner());
        *saved = conversations.to_vec();
        let mut saves = self.saves.lock().unwrap_or_else(|p| p.into_inner());
        *saves += 1;
        Ok(())
    }
}
