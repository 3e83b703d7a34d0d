use crate::chat::{ ChatClient, ChatError };
use crate::clock::{ Clock, IdGenerator };
use crate::history::ConversationStore;
use crate::models::backend::ChatAnswer;
use crate::models::chat::{ title_from_message, ChatMessage, Conversation, Role };

use log::{ debug, error, info, warn };
use std::sync::Arc;

pub const SEND_ERROR_PREFIX: &str = "Sorry, I encountered an error connecting to the server. Error:";

/// A user message that has been recorded and is waiting for its reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    pub conversation_id: String,
    pub query: String,
}

/// Owns the conversation list and the current selection.
///
/// Every mutation writes the whole list to the store before returning.
/// The current conversation, when set, is always a member of the list.
pub struct ConversationController {
    conversations: Vec<Conversation>,
    current: Option<String>,
    loading: bool,
    store: Arc<dyn ConversationStore>,
    client: Arc<dyn ChatClient>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl ConversationController {
    /// Reads the store once and selects the most recent conversation.
    pub fn load(
        store: Arc<dyn ConversationStore>,
        client: Arc<dyn ChatClient>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>
    ) -> Self {
        let conversations = match store.load() {
            Ok(list) => list,
            Err(e) => {
                error!("Failed to load conversations, starting empty: {}", e);
                Vec::new()
            }
        };
        let current = conversations.first().map(|c| c.id.clone());
        info!("Loaded {} conversations", conversations.len());

        Self {
            conversations,
            current,
            loading: false,
            store,
            client,
            clock,
            ids,
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current(&self) -> Option<&Conversation> {
        let id = self.current.as_deref()?;
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn client(&self) -> &Arc<dyn ChatClient> {
        &self.client
    }

    pub fn create_conversation(&mut self) -> String {
        let conversation = Conversation::new(self.ids.next_id(), self.clock.now());
        let id = conversation.id.clone();
        self.conversations.insert(0, conversation);
        self.current = Some(id.clone());
        debug!("Created conversation {}", id);
        self.persist();
        id
    }

    /// Returns false and leaves the selection alone when `id` is unknown.
    pub fn select_conversation(&mut self, id: &str) -> bool {
        if self.position(id).is_none() {
            debug!("Ignoring selection of unknown conversation {}", id);
            return false;
        }
        self.current = Some(id.to_string());
        true
    }

    pub fn delete_conversation(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            debug!("Ignoring deletion of unknown conversation {}", id);
            return false;
        };
        self.conversations.remove(index);

        if self.current.as_deref() == Some(id) {
            self.current = self.conversations.first().map(|c| c.id.clone());
        }
        debug!("Deleted conversation {}", id);
        self.persist();
        true
    }

    /// Sends `text` in the current conversation and waits for the reply.
    ///
    /// Returns the bot message that was appended, which carries the error
    /// description when the request failed.
    pub async fn send_message(&mut self, text: &str) -> Option<ChatMessage> {
        let pending = self.begin_send(text);
        let client = Arc::clone(&self.client);
        let result = client.ask(&pending.query).await;
        self.finish_send(pending, result)
    }

    /// Records the user message and saves, creating a conversation first when
    /// none is selected.
    pub fn begin_send(&mut self, text: &str) -> PendingTurn {
        let conversation_id = match self.current.clone() {
            Some(id) if self.position(&id).is_some() => id,
            _ => self.create_conversation(),
        };

        let message = self.new_message(Role::User, text.to_string());
        if let Some(index) = self.position(&conversation_id) {
            let conversation = &mut self.conversations[index];
            if conversation.is_empty() {
                conversation.title = title_from_message(text);
            }
            conversation.messages.push(message);
        }

        self.loading = true;
        self.persist();

        PendingTurn {
            conversation_id,
            query: text.to_string(),
        }
    }

    /// Appends the reply (or the failure) for `pending` and saves.
    ///
    /// The reply is dropped if its conversation has been deleted meanwhile.
    pub fn finish_send(
        &mut self,
        pending: PendingTurn,
        result: Result<ChatAnswer, ChatError>
    ) -> Option<ChatMessage> {
        self.loading = false;

        let content = match result {
            Ok(answer) => answer.text,
            Err(e) => {
                error!("Error sending message: {}", e);
                format!("{} {}", SEND_ERROR_PREFIX, e)
            }
        };

        let Some(index) = self.position(&pending.conversation_id) else {
            warn!(
                "Conversation {} no longer exists, dropping reply",
                pending.conversation_id
            );
            return None;
        };

        let message = self.new_message(Role::Bot, content);
        self.conversations[index].messages.push(message.clone());
        self.persist();
        Some(message)
    }

    fn new_message(&self, role: Role, content: String) -> ChatMessage {
        ChatMessage {
            id: self.ids.next_id(),
            role,
            content,
            timestamp: self.clock.now(),
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.conversations.iter().position(|c| c.id == id)
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.conversations) {
            error!("Failed to save conversations: {}", e);
        }
    }
}
