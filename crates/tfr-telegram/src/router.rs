use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use tokio::sync::Mutex;
use tracing::info;

use tfr_core::{
    config::Config,
    domain::TopicId,
    forward::{Forwarder, RetryPolicy},
    messaging::port::{MediaPort, MessagingPort},
    topics::{JsonTopicStore, TopicTracker},
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub messenger: Arc<dyn MessagingPort>,
    pub forwarder: Arc<Forwarder>,
    pub tracker: Arc<Mutex<TopicTracker<JsonTopicStore>>>,
    /// Destination topic for forwarded files; `/select` swaps it at runtime.
    pub selected_topic: Arc<Mutex<Option<TopicId>>>,
}

pub async fn run_polling(cfg: Arc<Config>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.bot_token.clone());

    // Basic startup info.
    if let Ok(me) = bot.get_me().await {
        info!(username = %me.username(), "relay bot started");
    }
    info!(
        chat_id = cfg.target_chat_id.0,
        topic = cfg.default_topic_id.map(|t| t.0),
        allowed_users = cfg.allowed_users.len(),
        max_file_size_mb = cfg.max_file_size_mb,
        "destination configured"
    );

    let messenger = Arc::new(TelegramMessenger::new(bot.clone()));
    let media: Arc<dyn MediaPort> = messenger.clone();
    let tracker = TopicTracker::new(JsonTopicStore::new(cfg.topics_file.clone()));

    let state = Arc::new(AppState {
        cfg: cfg.clone(),
        messenger: messenger.clone(),
        forwarder: Arc::new(Forwarder::new(media, RetryPolicy::default())),
        tracker: Arc::new(Mutex::new(tracker)),
        selected_topic: Arc::new(Mutex::new(cfg.default_topic_id)),
    });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
