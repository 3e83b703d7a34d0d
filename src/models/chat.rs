use chrono::{ DateTime, Local, TimeZone, Utc };
use serde::{ Serialize, Deserialize };
use std::fmt;

pub const DEFAULT_TITLE: &str = "New Chat";
pub const TITLE_MAX_CHARS: usize = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Bot => write!(f, "bot"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Serialized as an RFC 3339 instant, e.g. `2025-01-31T09:15:02.123Z`.
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

/// A titled, ordered chat thread.
///
/// `timestamp` holds the display form of the creation date (`M/D/YYYY`),
/// not an instant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub timestamp: String,
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new(id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: DEFAULT_TITLE.to_string(),
            timestamp: display_date(created_at.with_timezone(&Local)),
            messages: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// `M/D/YYYY` in the zone `at` carries.
pub fn display_date<Tz: TimeZone>(at: DateTime<Tz>) -> String
    where Tz::Offset: fmt::Display
{
    at.format("%-m/%-d/%Y").to_string()
}

/// Title for a conversation derived from its first message.
pub fn title_from_message(content: &str) -> String {
    if content.chars().count() > TITLE_MAX_CHARS {
        let head: String = content.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        content.to_string()
    }
}

mod iso_millis {
    use chrono::{ DateTime, SecondsFormat, Utc };
    use serde::{ Deserialize, Deserializer, Serializer };

    pub fn serialize<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
        where D: Deserializer<'de>
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
