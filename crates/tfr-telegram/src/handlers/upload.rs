use std::sync::Arc;

use tracing::{error, info};

use tfr_core::{
    files::{format_file_size, within_size_limit, FileDescriptor},
    messaging::{port::Destination, types::InboundMessage},
    titles::display_title,
};

use crate::router::AppState;

use super::reply::safe_reply;

/// Relay one received file: size guard, title, forward, confirmation.
pub async fn handle_upload(
    state: &Arc<AppState>,
    inbound: &InboundMessage,
    file: FileDescriptor,
) -> anyhow::Result<()> {
    let kind = file.kind.display_name();
    safe_reply(
        state,
        inbound.chat_id,
        &format!("Processing {}...", kind.to_lowercase()),
    )
    .await;

    if !within_size_limit(&file, state.cfg.max_file_size_mb) {
        safe_reply(
            state,
            inbound.chat_id,
            &format!(
                "File too large. The limit is {}MB.",
                state.cfg.max_file_size_mb
            ),
        )
        .await;
        return Ok(());
    }

    let title = display_title(inbound, &file);
    let sender = inbound
        .sender
        .as_ref()
        .map(|s| s.display_name())
        .unwrap_or_else(|| "unknown".to_string());

    let topic_id = *state.selected_topic.lock().await;
    let dest = Destination {
        chat_id: state.cfg.target_chat_id,
        topic_id,
    };

    info!(
        %sender,
        name = %file.name,
        size = %format_file_size(file.size_bytes),
        topic = topic_id.map(|t| t.0),
        "forwarding file"
    );

    match state.forwarder.forward(dest, &file).await {
        Ok(_) => {
            safe_reply(
                state,
                inbound.chat_id,
                &format!("{kind} forwarded.\nTitle: {title}"),
            )
            .await;
        }
        Err(e) if e.is_transient() => {
            error!(error = %e, "forwarding failed after retries");
            safe_reply(
                state,
                inbound.chat_id,
                "Forwarding failed because of a network problem. Please try again later.",
            )
            .await;
        }
        Err(e) => {
            error!(error = %e, "forwarding failed");
            safe_reply(
                state,
                inbound.chat_id,
                "Forwarding failed. Please try again later.",
            )
            .await;
        }
    }

    Ok(())
}
