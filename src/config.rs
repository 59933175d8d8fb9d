use log::warn;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::blockchain::{DEFAULT_DIFFICULTY, MAX_DIFFICULTY};

/// Node settings, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Leading hex zeros required by the proof-of-work puzzle.
    pub difficulty: u32,
    /// Give up a proof search after this many candidates (unset = never).
    pub mining_max_attempts: Option<u64>,
    /// How many times `/mine_block` restarts the search when the tip moves.
    pub mine_retry_limit: u32,
    pub peer_timeout: Duration,
    /// Receiver of the per-block mining reward.
    pub reward_receiver: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            difficulty: DEFAULT_DIFFICULTY,
            mining_max_attempts: None,
            mine_retry_limit: 3,
            peer_timeout: Duration::from_secs(5),
            reward_receiver: "recipient_address".to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup; unknown or unparseable values keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(d.host),
            port: parsed(&lookup, "PORT").unwrap_or(d.port),
            difficulty: parsed(&lookup, "POW_DIFFICULTY")
                .map(clamp_difficulty)
                .unwrap_or(d.difficulty),
            mining_max_attempts: parsed(&lookup, "MINING_MAX_ATTEMPTS").or(d.mining_max_attempts),
            mine_retry_limit: parsed(&lookup, "MINE_RETRY_LIMIT").unwrap_or(d.mine_retry_limit),
            peer_timeout: parsed(&lookup, "PEER_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(d.peer_timeout),
            reward_receiver: lookup("REWARD_RECEIVER").unwrap_or(d.reward_receiver),
        }
    }
}

/// More zeros than a digest has characters would make mining never finish.
fn clamp_difficulty(difficulty: u32) -> u32 {
    if difficulty > MAX_DIFFICULTY {
        warn!(
            "CONFIG - POW_DIFFICULTY {} exceeds {} hex digits, clamping",
            difficulty, MAX_DIFFICULTY
        );
        return MAX_DIFFICULTY;
    }
    difficulty
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("CONFIG - ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}
