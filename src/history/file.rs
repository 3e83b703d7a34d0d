use crate::history::{ ConversationStore, StoreError };
use crate::models::chat::Conversation;
use log::{ debug, warn };
use std::fs;
use std::io::{ ErrorKind, Write };
use std::path::{ Path, PathBuf };

/// JSON file holding the whole conversation list as one array.
pub struct FileConversationStore {
    path: PathBuf,
}

impl FileConversationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn write_atomic(&self, bytes: &[u8]) -> Result<(), StoreError> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new(""));
        fs::create_dir_all(parent)?;
        let file_name = self.path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("conversations");
        let tmp = parent.join(format!(".{}.tmp.{}", file_name, std::process::id()));
        {
            let mut f = fs::File::create(&tmp)?;
            f.write_all(bytes)?;
            f.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ConversationStore for FileConversationStore {
    /// A missing file is an empty list. Content that does not parse is
    /// also treated as an empty list; it is left on disk until the next save.
    fn load(&self) -> Result<Vec<Conversation>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No conversation file at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e.into());
            }
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Vec<Conversation>>(&raw) {
            Ok(conversations) => {
                debug!(
                    "Loaded {} conversations from {}",
                    conversations.len(),
                    self.path.display()
                );
                Ok(conversations)
            }
            Err(e) => {
                warn!(
                    "Ignoring malformed conversation file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, conversations: &[Conversation]) -> Result<(), StoreError> {
        let json = serde_json::to_vec(conversations)?;
        self.write_atomic(&json)
    }
}
