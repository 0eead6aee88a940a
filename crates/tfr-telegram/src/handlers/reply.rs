//! Bounded-retry reply helper.
//!
//! User-facing replies never propagate failures into the dispatch loop: a
//! reply that cannot be delivered within the retry budget is logged and
//! dropped.

use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use tfr_core::domain::ChatId;

use crate::router::AppState;

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(5);

pub async fn safe_reply(state: &AppState, chat_id: ChatId, text: &str) {
    for attempt in 1..=MAX_RETRIES {
        match state.messenger.send_text(chat_id, text).await {
            Ok(_) => return,
            Err(e) if e.is_transient() && attempt < MAX_RETRIES => {
                warn!(attempt, error = %e, "reply failed, retrying");
                sleep(RETRY_DELAY).await;
            }
            Err(e) => {
                warn!(error = %e, chat_id = chat_id.0, "reply dropped");
                return;
            }
        }
    }
}
