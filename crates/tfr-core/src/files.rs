use crate::messaging::types::InboundMessage;

// ============== Kinds & Descriptors ==============

/// Placeholder used when a document carries no filename at all. The title
/// generator treats it as "no usable filename".
pub const UNKNOWN_DOCUMENT: &str = "unknown_document";

/// The closed set of media kinds the relay accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    Document,
    Photo,
    Video,
    Audio,
    Voice,
}

impl FileKind {
    pub fn display_name(self) -> &'static str {
        match self {
            FileKind::Document => "Document",
            FileKind::Photo => "Photo",
            FileKind::Video => "Video",
            FileKind::Audio => "Audio",
            FileKind::Voice => "Voice",
        }
    }
}

/// Normalized record describing an inbound file's identity, kind, and
/// metadata. Created per inbound message and discarded after forwarding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileDescriptor {
    pub file_id: String,
    pub kind: FileKind,
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
}

/// Extract a normalized descriptor from an inbound message.
///
/// The five kinds are checked in fixed priority order and the first match
/// wins. Missing sub-fields fall back to kind defaults; `None` means no file
/// is present at all.
pub fn extract_descriptor(msg: &InboundMessage) -> Option<FileDescriptor> {
    if let Some(doc) = &msg.document {
        return Some(FileDescriptor {
            file_id: doc.file_id.clone(),
            kind: FileKind::Document,
            name: doc
                .file_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_DOCUMENT.to_string()),
            size_bytes: doc.file_size.unwrap_or(0),
            mime_type: doc
                .mime_type
                .clone()
                .unwrap_or_else(|| "application/octet-stream".to_string()),
        });
    }

    // The platform supplies multiple photo resolutions; the last is largest.
    if let Some(photo) = msg.photos.last() {
        return Some(FileDescriptor {
            file_id: photo.file_id.clone(),
            kind: FileKind::Photo,
            name: format!("photo_{}.jpg", photo.file_unique_id),
            size_bytes: photo.file_size.unwrap_or(0),
            mime_type: "image/jpeg".to_string(),
        });
    }

    if let Some(video) = &msg.video {
        return Some(FileDescriptor {
            file_id: video.file_id.clone(),
            kind: FileKind::Video,
            name: video
                .file_name
                .clone()
                .unwrap_or_else(|| format!("video_{}.mp4", video.file_unique_id)),
            size_bytes: video.file_size.unwrap_or(0),
            mime_type: video
                .mime_type
                .clone()
                .unwrap_or_else(|| "video/mp4".to_string()),
        });
    }

    if let Some(audio) = &msg.audio {
        return Some(FileDescriptor {
            file_id: audio.file_id.clone(),
            kind: FileKind::Audio,
            name: audio
                .file_name
                .clone()
                .unwrap_or_else(|| format!("audio_{}.mp3", audio.file_unique_id)),
            size_bytes: audio.file_size.unwrap_or(0),
            mime_type: audio
                .mime_type
                .clone()
                .unwrap_or_else(|| "audio/mpeg".to_string()),
        });
    }

    if let Some(voice) = &msg.voice {
        return Some(FileDescriptor {
            file_id: voice.file_id.clone(),
            kind: FileKind::Voice,
            name: format!("voice_{}.ogg", voice.file_unique_id),
            size_bytes: voice.file_size.unwrap_or(0),
            mime_type: voice
                .mime_type
                .clone()
                .unwrap_or_else(|| "audio/ogg".to_string()),
        });
    }

    None
}

// ============== Size Guard ==============

/// `true` when the descriptor fits under the configured ceiling (in MB).
///
/// A zero size means the platform did not report one; such files pass.
/// Deliberate policy.
pub fn within_size_limit(file: &FileDescriptor, max_mb: u64) -> bool {
    if file.size_bytes == 0 {
        return true;
    }
    file.size_bytes <= max_mb * 1024 * 1024
}

// ============== Filename Helpers ==============

/// Filename with its final extension stripped (`report.pdf` -> `report`).
pub fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// Human-readable file size for logs (`"unknown size"` when zero).
pub fn format_file_size(size_bytes: u64) -> String {
    if size_bytes == 0 {
        return "unknown size".to_string();
    }
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = size_bytes as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} PB")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{
        domain::ChatId,
        messaging::types::{DocumentPart, PhotoPart, VoicePart},
    };

    fn empty_message() -> InboundMessage {
        InboundMessage {
            chat_id: ChatId(1),
            topic_id: None,
            sender: None,
            text: None,
            caption: None,
            document: None,
            photos: Vec::new(),
            video: None,
            audio: None,
            voice: None,
            sent_at: Utc::now(),
        }
    }

    fn photo(id: &str, size: u64) -> PhotoPart {
        PhotoPart {
            file_id: id.to_string(),
            file_unique_id: format!("u-{id}"),
            file_size: Some(size),
        }
    }

    #[test]
    fn no_media_yields_none() {
        assert_eq!(extract_descriptor(&empty_message()), None);
    }

    #[test]
    fn document_wins_over_photo() {
        let mut msg = empty_message();
        msg.document = Some(DocumentPart {
            file_id: "doc-1".to_string(),
            file_unique_id: "u-doc-1".to_string(),
            file_name: Some("report.pdf".to_string()),
            file_size: Some(1234),
            mime_type: Some("application/pdf".to_string()),
        });
        msg.photos = vec![photo("p-1", 10)];

        let file = extract_descriptor(&msg).unwrap();
        assert_eq!(file.kind, FileKind::Document);
        assert_eq!(file.file_id, "doc-1");
        assert_eq!(file.name, "report.pdf");
    }

    #[test]
    fn document_defaults_fill_missing_fields() {
        let mut msg = empty_message();
        msg.document = Some(DocumentPart {
            file_id: "doc-2".to_string(),
            file_unique_id: "u-doc-2".to_string(),
            file_name: None,
            file_size: None,
            mime_type: None,
        });

        let file = extract_descriptor(&msg).unwrap();
        assert_eq!(file.name, UNKNOWN_DOCUMENT);
        assert_eq!(file.size_bytes, 0);
        assert_eq!(file.mime_type, "application/octet-stream");
    }

    #[test]
    fn photo_selects_highest_resolution_variant() {
        let mut msg = empty_message();
        msg.photos = vec![photo("small", 100), photo("medium", 500), photo("large", 900)];

        let file = extract_descriptor(&msg).unwrap();
        assert_eq!(file.kind, FileKind::Photo);
        assert_eq!(file.file_id, "large");
        assert_eq!(file.name, "photo_u-large.jpg");
        assert_eq!(file.mime_type, "image/jpeg");
    }

    #[test]
    fn voice_synthesizes_name_and_mime() {
        let mut msg = empty_message();
        msg.voice = Some(VoicePart {
            file_id: "v-1".to_string(),
            file_unique_id: "u-v-1".to_string(),
            file_size: None,
            mime_type: None,
        });

        let file = extract_descriptor(&msg).unwrap();
        assert_eq!(file.kind, FileKind::Voice);
        assert_eq!(file.name, "voice_u-v-1.ogg");
        assert_eq!(file.mime_type, "audio/ogg");
    }

    fn descriptor_of_size(size_bytes: u64) -> FileDescriptor {
        FileDescriptor {
            file_id: "f".to_string(),
            kind: FileKind::Document,
            name: "f.bin".to_string(),
            size_bytes,
            mime_type: "application/octet-stream".to_string(),
        }
    }

    #[test]
    fn unknown_size_always_passes_the_guard() {
        assert!(within_size_limit(&descriptor_of_size(0), 1));
        assert!(within_size_limit(&descriptor_of_size(0), 0));
    }

    #[test]
    fn oversized_files_fail_the_guard() {
        assert!(!within_size_limit(&descriptor_of_size(2 * 1024 * 1024 + 1), 2));
        assert!(within_size_limit(&descriptor_of_size(2 * 1024 * 1024), 2));
    }

    #[test]
    fn strip_extension_keeps_stem() {
        assert_eq!(strip_extension("report.pdf"), "report");
        assert_eq!(strip_extension("archive.tar.gz"), "archive.tar");
        assert_eq!(strip_extension("noext"), "noext");
        assert_eq!(strip_extension(".hidden"), ".hidden");
    }

    #[test]
    fn format_file_size_picks_a_unit() {
        assert_eq!(format_file_size(0), "unknown size");
        assert_eq!(format_file_size(512), "512.0 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
    }
}
