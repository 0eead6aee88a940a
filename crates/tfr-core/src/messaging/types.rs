use chrono::{DateTime, Utc};

use crate::domain::{ChatId, TopicId, UserId};

/// Cross-messenger incoming message model.
///
/// Telegram-specific fields live in the Telegram adapter; the core only ever
/// sees this shape. At most one of the five media parts is honored per
/// message (see `files::extract_descriptor`).
#[derive(Clone, Debug)]
pub struct InboundMessage {
    pub chat_id: ChatId,
    pub topic_id: Option<TopicId>,
    pub sender: Option<Sender>,
    pub text: Option<String>,
    pub caption: Option<String>,
    pub document: Option<DocumentPart>,
    /// Photo resolution variants, smallest first (platform order).
    pub photos: Vec<PhotoPart>,
    pub video: Option<VideoPart>,
    pub audio: Option<AudioPart>,
    pub voice: Option<VoicePart>,
    pub sent_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct Sender {
    pub id: UserId,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub is_bot: bool,
}

impl Sender {
    /// First name (plus last name when present), falling back to @username.
    pub fn display_name(&self) -> String {
        if !self.first_name.trim().is_empty() {
            return match &self.last_name {
                Some(last) => format!("{} {last}", self.first_name),
                None => self.first_name.clone(),
            };
        }
        match &self.username {
            Some(u) => format!("@{u}"),
            None => "unknown".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DocumentPart {
    pub file_id: String,
    pub file_unique_id: String,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub mime_type: Option<String>,
}

/// One photo resolution variant.
#[derive(Clone, Debug)]
pub struct PhotoPart {
    pub file_id: String,
    pub file_unique_id: String,
    pub file_size: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct VideoPart {
    pub file_id: String,
    pub file_unique_id: String,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub mime_type: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AudioPart {
    pub file_id: String,
    pub file_unique_id: String,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub mime_type: Option<String>,
}

#[derive(Clone, Debug)]
pub struct VoicePart {
    pub file_id: String,
    pub file_unique_id: String,
    pub file_size: Option<u64>,
    pub mime_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender(first: &str, last: Option<&str>, username: Option<&str>) -> Sender {
        Sender {
            id: UserId(1),
            username: username.map(|s| s.to_string()),
            first_name: first.to_string(),
            last_name: last.map(|s| s.to_string()),
            is_bot: false,
        }
    }

    #[test]
    fn display_name_prefers_full_name() {
        assert_eq!(sender("Ada", Some("Lovelace"), None).display_name(), "Ada Lovelace");
        assert_eq!(sender("Ada", None, Some("ada")).display_name(), "Ada");
    }

    #[test]
    fn display_name_falls_back_to_username_then_unknown() {
        assert_eq!(sender("", None, Some("ada")).display_name(), "@ada");
        assert_eq!(sender("  ", None, None).display_name(), "unknown");
    }
}
