//! Runtime configuration for zoo-loop clients.

use once_cell::sync::Lazy;
use std::env;

use crate::code;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Where the shared game documents live.
    pub redis_url: String,
    /// Length of newly generated game codes (4..=6).
    pub code_len: usize,
    /// How many codes to try before giving up on creating a game.
    pub code_attempts: u32,
    /// Conflict retries before a commit is abandoned.
    pub commit_max_retries: usize,
    /// Base backoff between conflict retries (milliseconds, doubles per retry).
    pub commit_backoff_ms: u64,
    /// Seed for deterministic dice in newly created games.
    pub dice_seed: Option<u64>,
    /// Stable identity of this client, if configured.
    pub player_id: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            redis_url: "redis://127.0.0.1/".into(),
            code_len: 5,
            code_attempts: 16,
            commit_max_retries: 5,
            commit_backoff_ms: 10,
            dice_seed: None,
            player_id: None,
        }
    }
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Settings::default();

        let redis_url = env::var("REDIS_URL").unwrap_or(defaults.redis_url);

        let code_len = parsed::<usize>("GAME_CODE_LEN")
            .unwrap_or(defaults.code_len)
            .clamp(code::MIN_LEN, code::MAX_LEN);

        let code_attempts = parsed::<u32>("GAME_CODE_ATTEMPTS")
            .filter(|n| *n > 0)
            .unwrap_or(defaults.code_attempts);

        let commit_max_retries =
            parsed::<usize>("COMMIT_MAX_RETRIES").unwrap_or(defaults.commit_max_retries);

        let commit_backoff_ms =
            parsed::<u64>("COMMIT_BACKOFF_MS").unwrap_or(defaults.commit_backoff_ms);

        let dice_seed = parsed::<u64>("DICE_SEED");

        let player_id = env::var("PLAYER_ID")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Settings {
            redis_url,
            code_len,
            code_attempts,
            commit_max_retries,
            commit_backoff_ms,
            dice_seed,
            player_id,
        }
    }
}

static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

pub fn settings() -> &'static Settings {
    &SETTINGS
}
