//! Telegram update handlers.
//!
//! Every update passes the allow-list gate first; after that, commands go to
//! the command router, destination-group traffic feeds the topic tracker,
//! files get relayed, and plain text gets a usage hint. No error escapes
//! into the dispatch loop.

use std::sync::Arc;

use teloxide::prelude::*;

use tracing::error;

use tfr_core::{files::extract_descriptor, security::is_authorized};

use crate::convert::inbound_from_message;
use crate::router::AppState;

mod commands;
mod reply;
mod text;
mod upload;

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let inbound = inbound_from_message(&msg);

    if !is_authorized(
        inbound.sender.as_ref().map(|s| s.id),
        &state.cfg.allowed_users,
    ) {
        reply::safe_reply(&state, inbound.chat_id, "You are not allowed to use this bot.").await;
        return Ok(());
    }

    let outcome = if let Some(cmd) = inbound.text.as_deref().filter(|t| t.starts_with('/')) {
        commands::handle_command(&state, &inbound, cmd).await
    } else if inbound.chat_id == state.cfg.target_chat_id {
        // Destination-group traffic only feeds the topic tracker; relaying it
        // back into the same group would loop.
        text::track_destination_message(&state, &inbound).await
    } else if let Some(file) = extract_descriptor(&inbound) {
        upload::handle_upload(&state, &inbound, file).await
    } else if inbound.text.is_some() {
        text::handle_text(&state, &inbound).await
    } else {
        Ok(())
    };

    if let Err(e) = outcome {
        error!(error = %e, chat_id = inbound.chat_id.0, "update handler failed");
        if inbound.chat_id != state.cfg.target_chat_id {
            reply::safe_reply(
                &state,
                inbound.chat_id,
                "Something went wrong. Please try again later.",
            )
            .await;
        }
    }

    Ok(())
}
