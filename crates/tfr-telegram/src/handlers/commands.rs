use std::sync::Arc;

use tracing::{info, warn};

use tfr_core::{
    config::save_topic_override,
    domain::TopicId,
    messaging::types::InboundMessage,
};

use crate::router::AppState;

use super::reply::safe_reply;

fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

pub async fn handle_command(
    state: &Arc<AppState>,
    inbound: &InboundMessage,
    text: &str,
) -> anyhow::Result<()> {
    let (cmd, arg) = parse_command(text);

    match cmd.as_str() {
        "start" | "help" => start(state, inbound).await,
        "status" => status(state, inbound).await,
        "topics" => topics(state, inbound).await,
        "select" => select(state, inbound, &arg).await,
        _ => {
            safe_reply(
                state,
                inbound.chat_id,
                "Unknown command. Use /start to see what I can do.",
            )
            .await;
            Ok(())
        }
    }
}

async fn start(state: &Arc<AppState>, inbound: &InboundMessage) -> anyhow::Result<()> {
    let name = inbound
        .sender
        .as_ref()
        .map(|s| s.display_name())
        .unwrap_or_else(|| "there".to_string());
    let topic = selected_topic_label(state).await;

    let body = format!(
        "Welcome to the file relay bot!\n\n\
Hi {name}!\n\n\
Send me any file and I will forward it to the destination group.\n\n\
Commands:\n\
/start - show this message\n\
/status - show bot status\n\
/topics - show detected group topics\n\
/select <id> - choose the destination topic (e.g. /select 5)\n\n\
Current configuration:\n\
- destination group: {}\n\
- default topic: {topic}\n\
- max file size: {}MB",
        state.cfg.target_chat_id.0, state.cfg.max_file_size_mb,
    );

    safe_reply(state, inbound.chat_id, &body).await;
    if let Some(sender) = &inbound.sender {
        info!(user_id = sender.id.0, "user started the bot");
    }
    Ok(())
}

async fn status(state: &Arc<AppState>, inbound: &InboundMessage) -> anyhow::Result<()> {
    let topic = selected_topic_label(state).await;
    let tracked = state.tracker.lock().await.all().len();
    let allowed = if state.cfg.allowed_users.is_empty() {
        "everyone".to_string()
    } else {
        format!("{} user(s)", state.cfg.allowed_users.len())
    };

    let body = format!(
        "Bot status\n\n\
State: running\n\
Destination group: {}\n\
Selected topic: {topic}\n\
Max file size: {}MB\n\
Allowed users: {allowed}\n\
Tracked topics: {tracked}",
        state.cfg.target_chat_id.0, state.cfg.max_file_size_mb,
    );

    safe_reply(state, inbound.chat_id, &body).await;
    Ok(())
}

async fn topics(state: &Arc<AppState>, inbound: &InboundMessage) -> anyhow::Result<()> {
    let topics = state.tracker.lock().await.all();

    let mut body = String::from("Group topics\n\n");
    if topics.is_empty() {
        body.push_str(
            "No topics detected yet.\n\
The bot learns topics from messages it sees in the destination group.",
        );
    } else {
        body.push_str("Detected topics:\n");
        for (id, record) in &topics {
            body.push_str(&format!(
                "- {}: {id} (messages: {})\n",
                record.name, record.count
            ));
        }
    }

    if let Some(topic) = *state.selected_topic.lock().await {
        body.push_str(&format!(
            "\nCurrently selected topic: {}\nAll files are forwarded there.",
            topic.0
        ));
    }
    body.push_str("\n\nUse /select <id> to pick where files go.");

    safe_reply(state, inbound.chat_id, &body).await;
    Ok(())
}

async fn select(state: &Arc<AppState>, inbound: &InboundMessage, arg: &str) -> anyhow::Result<()> {
    // Only the first token counts; `/select 5 please` selects 5.
    let arg = arg.split_whitespace().next().unwrap_or("");
    if arg.is_empty() {
        safe_reply(
            state,
            inbound.chat_id,
            "Please provide a topic id.\n\
Usage: /select <id>\n\
Example: /select 5\n\n\
Use /topics to list known topics.",
        )
        .await;
        return Ok(());
    }

    let Ok(id) = arg.parse::<i32>() else {
        safe_reply(
            state,
            inbound.chat_id,
            &format!("Topic id must be a number. You sent: {arg}"),
        )
        .await;
        return Ok(());
    };
    let topic = TopicId(id);

    *state.selected_topic.lock().await = Some(topic);

    // A failed write keeps the in-memory selection; it just won't survive
    // a restart.
    if let Err(e) = save_topic_override(&state.cfg, topic) {
        warn!(error = %e, "failed to persist topic selection");
    }

    let known = state.tracker.lock().await.get(topic);
    let body = match known {
        Some(record) => format!(
            "Topic selected: {} ({id}).\n\
All files will be forwarded there.\n\n\
Use /topics to list detected topics.",
            record.name
        ),
        None => format!(
            "Topic id {id} is set, but I have not seen this topic yet.\n\
Files will still be forwarded to it.\n\n\
Use /topics to list detected topics."
        ),
    };
    safe_reply(state, inbound.chat_id, &body).await;

    if let Some(sender) = &inbound.sender {
        info!(user_id = sender.id.0, topic = id, "topic selected");
    }
    Ok(())
}

async fn selected_topic_label(state: &Arc<AppState>) -> String {
    match *state.selected_topic.lock().await {
        Some(topic) => topic.0.to_string(),
        None => "not set".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_split_on_whitespace() {
        assert_eq!(parse_command("/select 5"), ("select".to_string(), "5".to_string()));
        assert_eq!(parse_command("/start"), ("start".to_string(), "".to_string()));
        assert_eq!(
            parse_command("/select   7  extra"),
            ("select".to_string(), "7  extra".to_string())
        );
    }

    #[test]
    fn bot_mention_suffix_is_ignored() {
        assert_eq!(
            parse_command("/status@relay_bot"),
            ("status".to_string(), "".to_string())
        );
    }

    #[test]
    fn command_names_are_lowercased() {
        assert_eq!(parse_command("/TOPICS"), ("topics".to_string(), "".to_string()));
    }
}
