use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef, TopicId},
    files::FileDescriptor,
    Result,
};

/// Where a forwarded file lands: the destination chat plus an optional forum
/// topic within it.
#[derive(Clone, Copy, Debug)]
pub struct Destination {
    pub chat_id: ChatId,
    pub topic_id: Option<TopicId>,
}

/// Cross-messenger port for plain-text replies.
///
/// Telegram is the first implementation; the shape is kept minimal so future
/// adapters can fit behind the same interface.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef>;
}

/// Cross-messenger port for re-sending a received file by its platform
/// reference.
///
/// One method covers the whole closed kind set; implementations dispatch on
/// `FileDescriptor::kind` to the per-media-type send call of the backing API.
#[async_trait]
pub trait MediaPort: Send + Sync {
    async fn send_file(
        &self,
        dest: Destination,
        file: &FileDescriptor,
        caption: &str,
    ) -> Result<MessageRef>;
}
