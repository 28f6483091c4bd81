//! Settings read from `TURTLE_*` environment variables

use log::LevelFilter;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_PROMPT: &str = "🐢> ";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

const HISTORY_FILE: &str = ".turtle_history";
const RC_FILE: &str = ".turtlerc";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `TURTLE_LOG`
    pub log_level: LevelFilter,
    /// `TURTLE_PROMPT`
    pub prompt: String,
    /// `TURTLE_HISTFILE`; no history is kept without a home directory
    pub history_file: Option<PathBuf>,
    /// `TURTLE_RC`
    pub rc_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let home = home_dir();
        Config {
            log_level: DEFAULT_LOG_LEVEL,
            prompt: DEFAULT_PROMPT.to_string(),
            history_file: home.as_ref().map(|h| h.join(HISTORY_FILE)),
            rc_file: home.map(|h| h.join(RC_FILE)),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from any variable source. Unset or empty variables keep
    /// the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let mut config = Config::default();

        if let Some(level) = get("TURTLE_LOG") {
            match LevelFilter::from_str(&level) {
                Ok(level) => config.log_level = level,
                // Read before the logger exists, so report directly
                Err(_) => eprintln!(
                    "turtle: TURTLE_LOG: unknown level '{}', using '{}'",
                    level, DEFAULT_LOG_LEVEL
                ),
            }
        }
        if let Some(prompt) = get("TURTLE_PROMPT") {
            config.prompt = prompt;
        }
        if let Some(path) = get("TURTLE_HISTFILE") {
            config.history_file = Some(PathBuf::from(path));
        }
        if let Some(path) = get("TURTLE_RC") {
            config.rc_file = Some(PathBuf::from(path));
        }

        config
    }
}

/// Get home directory
pub fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME").map(PathBuf::from)
}
