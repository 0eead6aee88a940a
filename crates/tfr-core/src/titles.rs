use chrono::Local;

use crate::{
    files::{strip_extension, FileDescriptor, UNKNOWN_DOCUMENT},
    messaging::types::InboundMessage,
};

/// Derive the display title for a forwarded file.
///
/// Priority, first match wins: the user's caption, the filename without its
/// extension, then a kind + timestamp fallback. Never fails.
pub fn display_title(msg: &InboundMessage, file: &FileDescriptor) -> String {
    if let Some(caption) = &msg.caption {
        let trimmed = caption.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    if file.name != UNKNOWN_DOCUMENT {
        let stem = strip_extension(&file.name);
        if !stem.is_empty() {
            return stem.to_string();
        }
    }

    fallback_title(file)
}

/// `"{kind} - {local timestamp, minute precision}"`.
pub fn fallback_title(file: &FileDescriptor) -> String {
    let now = Local::now().format("%Y-%m-%d %H:%M");
    format!("{} - {now}", file.kind.display_name())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDateTime, Utc};

    use super::*;
    use crate::{
        domain::ChatId,
        files::FileKind,
    };

    fn message_with_caption(caption: Option<&str>) -> InboundMessage {
        InboundMessage {
            chat_id: ChatId(1),
            topic_id: None,
            sender: None,
            text: None,
            caption: caption.map(|s| s.to_string()),
            document: None,
            photos: Vec::new(),
            video: None,
            audio: None,
            voice: None,
            sent_at: Utc::now(),
        }
    }

    fn descriptor(kind: FileKind, name: &str) -> FileDescriptor {
        FileDescriptor {
            file_id: "f".to_string(),
            kind,
            name: name.to_string(),
            size_bytes: 0,
            mime_type: "application/octet-stream".to_string(),
        }
    }

    #[test]
    fn caption_wins_and_is_trimmed() {
        let msg = message_with_caption(Some("  hello  "));
        let file = descriptor(FileKind::Document, "report.pdf");
        assert_eq!(display_title(&msg, &file), "hello");
    }

    #[test]
    fn filename_stem_is_used_without_caption() {
        let msg = message_with_caption(None);
        let file = descriptor(FileKind::Document, "report.pdf");
        assert_eq!(display_title(&msg, &file), "report");
    }

    #[test]
    fn blank_caption_falls_through_to_filename() {
        let msg = message_with_caption(Some("   "));
        let file = descriptor(FileKind::Document, "report.pdf");
        assert_eq!(display_title(&msg, &file), "report");
    }

    #[test]
    fn unknown_document_falls_back_to_kind_and_timestamp() {
        let msg = message_with_caption(None);
        let file = descriptor(FileKind::Document, UNKNOWN_DOCUMENT);

        let title = display_title(&msg, &file);
        let rest = title.strip_prefix("Document - ").unwrap();
        assert!(NaiveDateTime::parse_from_str(rest, "%Y-%m-%d %H:%M").is_ok());
    }

    #[test]
    fn fallback_uses_the_kind_display_name() {
        let file = descriptor(FileKind::Voice, "voice_x.ogg");
        assert!(fallback_title(&file).starts_with("Voice - "));
    }
}
