//! Environment-driven configuration.
//!
//! Every knob has a default; a value that fails to parse (or is zero where a
//! positive number is required) falls back to that default with a warning.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::state::EvictionPolicy;
use crate::types::GameConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub dataset_path: PathBuf,
    pub static_dir: PathBuf,
    /// Enables remote image lookup when set
    pub rawg_api_key: Option<String>,
    pub session_ttl: Option<Duration>,
    pub max_sessions: Option<usize>,
    pub sweep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:9000".to_string(),
            dataset_path: PathBuf::from("data/games.json"),
            static_dir: PathBuf::from("static"),
            rawg_api_key: None,
            session_ttl: None,
            max_sessions: None,
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl ServerConfig {
    /// Load config from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            addr: env_string("GUESSHUB_ADDR").unwrap_or(defaults.addr),
            dataset_path: env_string("DATASET_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.dataset_path),
            static_dir: env_string("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            rawg_api_key: env_string("RAWG_API_KEY"),
            session_ttl: env_positive::<u64>("SESSION_TTL_SECS").map(Duration::from_secs),
            max_sessions: env_positive("MAX_SESSIONS"),
            sweep_interval: env_positive::<u64>("SWEEP_INTERVAL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
        }
    }

    /// Session eviction derived from the TTL and capacity settings.
    /// Both unset means sessions live for the whole process.
    pub fn eviction_policy(&self) -> EvictionPolicy {
        EvictionPolicy {
            max_age: self.session_ttl,
            max_sessions: self.max_sessions,
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            lives: env_positive("GAME_LIVES").unwrap_or(defaults.lives),
            max_reveals: env_positive("GAME_MAX_REVEALS").unwrap_or(defaults.max_reveals),
            offer_size: env_positive("GAME_OFFER_SIZE").unwrap_or(defaults.offer_size),
            max_questions: env_positive("GAME_MAX_QUESTIONS").unwrap_or(defaults.max_questions),
            ..defaults
        }
    }
}

/// Trimmed, non-empty value of an environment variable
fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Positive number from an environment variable. Unset is silent; anything
/// unparsable or zero is reported and ignored.
fn env_positive<T>(key: &str) -> Option<T>
where
    T: FromStr + PartialOrd + Default,
{
    let raw = env_string(key)?;
    match raw.parse::<T>() {
        Ok(value) if value > T::default() => Some(value),
        _ => {
            tracing::warn!(key, value = %raw, "Ignoring invalid value, using default");
            None
        }
    }
}
