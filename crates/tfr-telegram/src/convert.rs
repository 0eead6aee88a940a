//! Conversion from teloxide update types into the core incoming model.

use teloxide::types::Message;

use tfr_core::{
    domain::{ChatId, TopicId, UserId},
    messaging::types::{
        AudioPart, DocumentPart, InboundMessage, PhotoPart, Sender, VideoPart, VoicePart,
    },
};

pub fn inbound_from_message(msg: &Message) -> InboundMessage {
    let sender = msg.from().map(|u| Sender {
        id: UserId(u.id.0 as i64),
        username: u.username.clone(),
        first_name: u.first_name.clone(),
        last_name: u.last_name.clone(),
        is_bot: u.is_bot,
    });

    InboundMessage {
        chat_id: ChatId(msg.chat.id.0),
        topic_id: msg.thread_id.map(TopicId),
        sender,
        text: msg.text().map(|s| s.to_string()),
        caption: msg.caption().map(|s| s.to_string()),
        document: msg.document().map(|d| DocumentPart {
            file_id: d.file.id.clone(),
            file_unique_id: d.file.unique_id.clone(),
            file_name: d.file_name.clone(),
            file_size: Some(u64::from(d.file.size)),
            mime_type: d.mime_type.as_ref().map(|m| m.essence_str().to_string()),
        }),
        photos: msg
            .photo()
            .map(|sizes| {
                sizes
                    .iter()
                    .map(|p| PhotoPart {
                        file_id: p.file.id.clone(),
                        file_unique_id: p.file.unique_id.clone(),
                        file_size: Some(u64::from(p.file.size)),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        video: msg.video().map(|v| VideoPart {
            file_id: v.file.id.clone(),
            file_unique_id: v.file.unique_id.clone(),
            file_name: v.file_name.clone(),
            file_size: Some(u64::from(v.file.size)),
            mime_type: v.mime_type.as_ref().map(|m| m.essence_str().to_string()),
        }),
        audio: msg.audio().map(|a| AudioPart {
            file_id: a.file.id.clone(),
            file_unique_id: a.file.unique_id.clone(),
            file_name: a.file_name.clone(),
            file_size: Some(u64::from(a.file.size)),
            mime_type: a.mime_type.as_ref().map(|m| m.essence_str().to_string()),
        }),
        voice: msg.voice().map(|v| VoicePart {
            file_id: v.file.id.clone(),
            file_unique_id: v.file.unique_id.clone(),
            file_size: Some(u64::from(v.file.size)),
            mime_type: v.mime_type.as_ref().map(|m| m.essence_str().to_string()),
        }),
        sent_at: msg.date,
    }
}
