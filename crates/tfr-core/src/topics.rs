use std::{
    collections::{btree_map::Entry, BTreeMap},
    path::PathBuf,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{domain::TopicId, Result};

/// Display names longer than this are cut and marked with `...`.
const NAME_MAX_CHARS: usize = 30;

/// One tracked forum topic. Keyed by its stringified id in the persisted
/// mapping; records are never deleted and `count` only increases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRecord {
    pub name: String,
    pub count: u64,
    pub last_detected: String,
}

pub type TopicMap = BTreeMap<String, TopicRecord>;

// ============== Stores ==============

/// Persistence seam for the topic mapping. The JSON file store is the real
/// implementation; tests use an in-memory fake.
pub trait TopicStore: Send + Sync {
    fn load(&self) -> TopicMap;
    fn save(&self, topics: &TopicMap) -> Result<()>;
}

/// Topic mapping persisted as a JSON object in a single flat file.
///
/// A missing file is an empty mapping. So is an unreadable one: the next
/// update overwrites whatever corrupt data was there.
pub struct JsonTopicStore {
    path: PathBuf,
}

impl JsonTopicStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TopicStore for JsonTopicStore {
    fn load(&self) -> TopicMap {
        let txt = match std::fs::read_to_string(&self.path) {
            Ok(txt) => txt,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return TopicMap::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "topic file unreadable, starting empty");
                return TopicMap::new();
            }
        };
        match serde_json::from_str(&txt) {
            Ok(map) => map,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "topic file malformed, starting empty");
                TopicMap::new()
            }
        }
    }

    fn save(&self, topics: &TopicMap) -> Result<()> {
        let txt = serde_json::to_string_pretty(topics)?;
        std::fs::write(&self.path, txt)?;
        Ok(())
    }
}

// ============== Tracker ==============

/// Maintains the persisted topic mapping from messages observed in the
/// destination chat. Every update is a full read-modify-write of the mapping
/// file; callers serialize access.
pub struct TopicTracker<S: TopicStore> {
    store: S,
}

impl<S: TopicStore> TopicTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record one text-or-captioned message seen in a topic.
    ///
    /// First sighting inserts a record named after the message text, else its
    /// caption, else a `Topic{id}` placeholder. Later sightings bump the
    /// count and timestamp; only plain text renames an already-known topic,
    /// captions never do.
    pub fn observe(
        &self,
        topic_id: TopicId,
        text: Option<&str>,
        caption: Option<&str>,
        seen_at: DateTime<Utc>,
    ) -> Result<TopicRecord> {
        let key = topic_id.0.to_string();
        let mut topics = self.store.load();

        let record = match topics.entry(key.clone()) {
            Entry::Vacant(slot) => {
                let name =
                    derive_topic_name(text, caption).unwrap_or_else(|| format!("Topic{key}"));
                slot.insert(TopicRecord {
                    name,
                    count: 1,
                    last_detected: seen_at.to_rfc3339(),
                })
                .clone()
            }
            Entry::Occupied(mut slot) => {
                let rec = slot.get_mut();
                rec.count += 1;
                rec.last_detected = seen_at.to_rfc3339();
                if let Some(name) = derive_topic_name(text, None) {
                    rec.name = name;
                }
                rec.clone()
            }
        };

        self.store.save(&topics)?;
        Ok(record)
    }

    pub fn all(&self) -> TopicMap {
        self.store.load()
    }

    pub fn get(&self, topic_id: TopicId) -> Option<TopicRecord> {
        self.store.load().remove(&topic_id.0.to_string())
    }
}

fn derive_topic_name(text: Option<&str>, caption: Option<&str>) -> Option<String> {
    let source = text
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| caption.map(str::trim).filter(|s| !s.is_empty()))?;
    Some(truncate_name(source))
}

/// First 30 chars of the source, verbatim, plus a `...` marker when cut.
pub fn truncate_name(source: &str) -> String {
    if source.chars().count() <= NAME_MAX_CHARS {
        return source.to_string();
    }
    let mut out: String = source.chars().take(NAME_MAX_CHARS).collect();
    out.push_str("...");
    out
}
