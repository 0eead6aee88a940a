use std::sync::Arc;

use tracing::info;

use tfr_core::messaging::types::InboundMessage;

use crate::router::AppState;

use super::reply::safe_reply;

/// Feed one destination-group message into the topic tracker.
///
/// Only text-or-captioned messages inside a forum topic count, and never the
/// bot traffic the relay itself produces.
pub async fn track_destination_message(
    state: &Arc<AppState>,
    inbound: &InboundMessage,
) -> anyhow::Result<()> {
    let Some(topic_id) = inbound.topic_id else {
        return Ok(());
    };
    if inbound.sender.as_ref().map(|s| s.is_bot).unwrap_or(true) {
        return Ok(());
    }
    if inbound.text.is_none() && inbound.caption.is_none() {
        return Ok(());
    }

    let record = {
        let tracker = state.tracker.lock().await;
        tracker.observe(
            topic_id,
            inbound.text.as_deref(),
            inbound.caption.as_deref(),
            inbound.sent_at,
        )?
    };
    info!(topic = topic_id.0, name = %record.name, count = record.count, "topic observed");

    Ok(())
}

/// Plain text outside the destination group gets a short usage hint.
pub async fn handle_text(state: &Arc<AppState>, inbound: &InboundMessage) -> anyhow::Result<()> {
    safe_reply(
        state,
        inbound.chat_id,
        "Send me a file and I will forward it to the destination group.\n\
Use /status for bot status, /topics for detected topics, /select <id> to pick a topic.",
    )
    .await;
    Ok(())
}
