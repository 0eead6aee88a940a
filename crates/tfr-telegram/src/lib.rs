//! Telegram adapter (teloxide).
//!
//! This crate implements the `tfr-core` messaging and media ports over the
//! Telegram Bot API and hosts the update dispatch loop.

use async_trait::async_trait;

use teloxide::{prelude::*, types::InputFile};

use tokio::time::sleep;

pub mod convert;
pub mod handlers;
pub mod router;

use tfr_core::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    files::{FileDescriptor, FileKind},
    messaging::port::{Destination, MediaPort, MessagingPort},
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn bot(&self) -> Bot {
        self.bot.clone()
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        match e {
            teloxide::RequestError::Network(e) => Error::Network(format!("telegram network error: {e}")),
            teloxide::RequestError::Io(e) => Error::Network(format!("telegram i/o error: {e}")),
            // Flood control that outlived the adapter-level wait is still transient.
            teloxide::RequestError::RetryAfter(d) => {
                Error::Network(format!("telegram flood control, retry after {}s", d.as_secs()))
            }
            teloxide::RequestError::Api(e) => Error::Api(format!("telegram error: {e}")),
            other => Error::External(format!("telegram error: {other}")),
        }
    }

    /// Honor one `RetryAfter` (429) wait at the adapter layer. Transient
    /// network retries live above the port, in the forwarder / reply helper.
    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    teloxide::RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }

    async fn send_media_once(
        &self,
        dest: Destination,
        file: &FileDescriptor,
        caption: &str,
    ) -> std::result::Result<teloxide::types::Message, teloxide::RequestError> {
        let chat = Self::tg_chat(dest.chat_id);
        let input = InputFile::file_id(file.file_id.clone());

        macro_rules! dispatch {
            ($req:expr) => {{
                let mut req = $req.caption(caption.to_string());
                if let Some(topic) = dest.topic_id {
                    req = req.message_thread_id(topic.0);
                }
                req.await
            }};
        }

        match file.kind {
            FileKind::Document => dispatch!(self.bot.send_document(chat, input)),
            FileKind::Photo => dispatch!(self.bot.send_photo(chat, input)),
            FileKind::Video => dispatch!(self.bot.send_video(chat, input)),
            FileKind::Audio => dispatch!(self.bot.send_audio(chat, input)),
            FileKind::Voice => dispatch!(self.bot.send_voice(chat, input)),
        }
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| self.bot.send_message(Self::tg_chat(chat_id), text.to_string()))
            .await?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }
}

#[async_trait]
impl MediaPort for TelegramMessenger {
    async fn send_file(
        &self,
        dest: Destination,
        file: &FileDescriptor,
        caption: &str,
    ) -> Result<MessageRef> {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        let sent = loop {
            match self.send_media_once(dest, file, caption).await {
                Ok(m) => break m,
                Err(teloxide::RequestError::RetryAfter(d)) if attempts < MAX_RETRIES => {
                    attempts += 1;
                    sleep(d).await;
                }
                Err(e) => return Err(Self::map_err(e)),
            }
        };

        Ok(MessageRef {
            chat_id: dest.chat_id,
            message_id: MessageId(sent.id.0),
        })
    }
}
