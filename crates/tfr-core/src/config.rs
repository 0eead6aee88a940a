use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    domain::{ChatId, TopicId},
    errors::Error,
    Result,
};

/// Typed configuration for the relay bot, loaded once at process start.
///
/// The destination topic can be changed at runtime via `/select`; the change
/// is persisted to `override_file` and wins over `TOPIC_ID` on restart.
#[derive(Clone, Debug)]
pub struct Config {
    pub bot_token: String,
    pub target_chat_id: ChatId,
    pub default_topic_id: Option<TopicId>,
    /// Empty list = unrestricted.
    pub allowed_users: Vec<i64>,
    pub max_file_size_mb: u64,
    pub topics_file: PathBuf,
    pub override_file: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let bot_token = env_str("BOT_TOKEN").and_then(non_empty).ok_or_else(|| {
            Error::Config("BOT_TOKEN environment variable is required".to_string())
        })?;

        let target_group = env_str("TARGET_GROUP_ID").and_then(non_empty).ok_or_else(|| {
            Error::Config("TARGET_GROUP_ID environment variable is required".to_string())
        })?;
        let target_chat_id = parse_group_id(&target_group)?;

        let allowed_users = parse_csv_i64(env_str("ALLOWED_USERS"));
        let max_file_size_mb = env_u64("MAX_FILE_SIZE").unwrap_or(2048);

        let topics_file =
            PathBuf::from(env_str("TOPICS_FILE").unwrap_or("detected_topics.json".to_string()));
        let override_file =
            PathBuf::from(env_str("BOT_CONFIG_FILE").unwrap_or("bot_config.json".to_string()));

        let mut default_topic_id = env_str("TOPIC_ID").as_deref().and_then(parse_topic_id);

        // A topic selected via /select in a previous run wins over the env.
        if let Some(saved) = load_topic_override(&override_file) {
            default_topic_id = Some(saved);
        }

        Ok(Self {
            bot_token,
            target_chat_id,
            default_topic_id,
            allowed_users,
            max_file_size_mb,
            topics_file,
            override_file,
        })
    }
}

/// Group ids must be numeric; supergroup ids are negative (`-100...`), so a
/// positive value is suspicious but not fatal.
fn parse_group_id(raw: &str) -> Result<ChatId> {
    let id = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| Error::Config(format!("TARGET_GROUP_ID is not a numeric chat id: {raw}")))?;
    if id >= 0 {
        warn!(chat_id = id, "TARGET_GROUP_ID does not look like a supergroup id");
    }
    Ok(ChatId(id))
}

fn parse_topic_id(raw: &str) -> Option<TopicId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<i32>() {
        Ok(id) => Some(TopicId(id)),
        Err(_) => {
            warn!(topic_id = trimmed, "ignoring non-numeric topic id");
            None
        }
    }
}

// ============== Runtime Override ==============

/// On-disk shape of the runtime override written by `/select`.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct OverrideFile {
    #[serde(rename = "TOPIC_ID")]
    topic_id: String,
    #[serde(rename = "TARGET_GROUP_ID")]
    target_group_id: String,
    #[serde(rename = "MAX_FILE_SIZE")]
    max_file_size: u64,
}

fn load_topic_override(path: &Path) -> Option<TopicId> {
    let txt = fs::read_to_string(path).ok()?;
    let data: OverrideFile = match serde_json::from_str(&txt) {
        Ok(d) => d,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable override file");
            return None;
        }
    };
    parse_topic_id(&data.topic_id)
}

/// Persist the topic chosen via `/select` so it survives a restart.
pub fn save_topic_override(cfg: &Config, topic_id: TopicId) -> Result<()> {
    let data = OverrideFile {
        topic_id: topic_id.0.to_string(),
        target_group_id: cfg.target_chat_id.0.to_string(),
        max_file_size: cfg.max_file_size_mb,
    };
    let txt = serde_json::to_string_pretty(&data)?;
    fs::write(&cfg.override_file, txt)?;
    Ok(())
}

// ============== Env Helpers ==============

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn parse_csv_i64(v: Option<String>) -> Vec<i64> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<i64>().ok())
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_file(prefix: &str) -> PathBuf {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let pid = std::process::id();
        PathBuf::from(format!("/tmp/{prefix}-{pid}-{ts}.json"))
    }

    fn config_with_override(path: PathBuf) -> Config {
        Config {
            bot_token: "token".to_string(),
            target_chat_id: ChatId(-1003116625254),
            default_topic_id: None,
            allowed_users: Vec::new(),
            max_file_size_mb: 2048,
            topics_file: PathBuf::from("/tmp/unused-topics.json"),
            override_file: path,
        }
    }

    #[test]
    fn csv_parsing_skips_blanks_and_junk() {
        assert_eq!(parse_csv_i64(Some("1, 2,,x,3".to_string())), vec![1, 2, 3]);
        assert!(parse_csv_i64(None).is_empty());
        assert!(parse_csv_i64(Some("".to_string())).is_empty());
    }

    #[test]
    fn topic_ids_must_be_numeric() {
        assert_eq!(parse_topic_id("5"), Some(TopicId(5)));
        assert_eq!(parse_topic_id(" 12 "), Some(TopicId(12)));
        assert_eq!(parse_topic_id(""), None);
        assert_eq!(parse_topic_id("five"), None);
    }

    #[test]
    fn group_ids_must_be_numeric() {
        assert_eq!(parse_group_id("-1003116625254").unwrap(), ChatId(-1003116625254));
        assert!(parse_group_id("asmr").is_err());
    }

    #[test]
    fn topic_override_round_trips() {
        let path = tmp_file("tfr-override");
        let cfg = config_with_override(path.clone());

        save_topic_override(&cfg, TopicId(5)).unwrap();
        assert_eq!(load_topic_override(&path), Some(TopicId(5)));

        let txt = std::fs::read_to_string(&path).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&txt).unwrap();
        assert_eq!(raw["TOPIC_ID"], "5");
        assert_eq!(raw["TARGET_GROUP_ID"], "-1003116625254");
        assert_eq!(raw["MAX_FILE_SIZE"], 2048);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_or_malformed_override_is_ignored() {
        assert_eq!(load_topic_override(Path::new("/tmp/tfr-no-such-override.json")), None);

        let path = tmp_file("tfr-override-corrupt");
        std::fs::write(&path, "{").unwrap();
        assert_eq!(load_topic_override(&path), None);
        let _ = std::fs::remove_file(&path);
    }
}
