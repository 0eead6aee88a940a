use std::{sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    domain::MessageRef,
    files::{strip_extension, FileDescriptor},
    messaging::port::{Destination, MediaPort},
    Result,
};

/// Bounded fixed-backoff retry for transient network failures during a send.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(10),
        }
    }
}

/// Sends accepted files to the fixed destination, retrying transient network
/// failures.
///
/// Each retry re-sends the file: if a prior attempt succeeded downstream but
/// the confirmation was lost, a duplicate post is possible. No deduplication
/// token is used.
pub struct Forwarder {
    port: Arc<dyn MediaPort>,
    policy: RetryPolicy,
}

impl Forwarder {
    pub fn new(port: Arc<dyn MediaPort>, policy: RetryPolicy) -> Self {
        Self { port, policy }
    }

    /// Forward one file. The outgoing caption is the display filename with
    /// its extension stripped, not the richer generated title.
    pub async fn forward(&self, dest: Destination, file: &FileDescriptor) -> Result<MessageRef> {
        let caption = strip_extension(&file.name).to_string();

        let mut attempt = 1u32;
        loop {
            match self.port.send_file(dest, file, &caption).await {
                Ok(sent) => {
                    info!(chat_id = dest.chat_id.0, name = %file.name, attempt, "file forwarded");
                    return Ok(sent);
                }
                Err(e) if e.is_transient() && attempt < self.policy.max_attempts => {
                    warn!(attempt, error = %e, "forward attempt failed, retrying");
                    sleep(self.policy.delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(attempt, error = %e, "forward failed");
                    return Err(e);
                }
            }
        }
    }
}
