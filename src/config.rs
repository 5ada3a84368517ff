//! Session configuration — defaults, JSON file, environment overrides.
//!
//! Precedence, lowest first: built-in defaults, the JSON config file,
//! `LONG_CAPTURE_*` environment variables (a `.env` file is honored),
//! then command-line flags applied by the CLI. The merged result is
//! validated once and stays fixed for the whole session.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_SCROLL_DELAY_MS: &str = "LONG_CAPTURE_SCROLL_DELAY_MS";
pub const ENV_MAX_SCROLLS: &str = "LONG_CAPTURE_MAX_SCROLLS";
pub const ENV_OVERLAP_HINT: &str = "LONG_CAPTURE_OVERLAP_HINT";
pub const ENV_GESTURE_AMOUNT: &str = "LONG_CAPTURE_GESTURE_AMOUNT";
pub const ENV_GESTURE_TIMEOUT_MS: &str = "LONG_CAPTURE_GESTURE_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Wait after each scroll gesture before capturing.
    pub scroll_delay_ms: u64,
    /// Hard upper bound on scroll + capture iterations.
    pub max_scrolls: u32,
    /// Expected overlap between consecutive captures, in pixels.
    pub overlap_hint_pixels: u32,
    /// macOS only: Down Arrow presses per gesture instead of one Page Down.
    pub gesture_amount: Option<u32>,
    /// Upper bound on a single out-of-process gesture.
    pub gesture_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scroll_delay_ms: 500,
            max_scrolls: 20,
            overlap_hint_pixels: 50,
            gesture_amount: None,
            gesture_timeout_ms: 5000,
        }
    }
}

impl SessionConfig {
    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_delay_ms)
    }

    pub fn gesture_timeout(&self) -> Duration {
        Duration::from_millis(self.gesture_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_scrolls == 0 {
            return Err(ConfigError::Invalid("maxScrolls must be greater than 0".into()));
        }
        if self.overlap_hint_pixels == 0 {
            return Err(ConfigError::Invalid(
                "overlapHintPixels must be greater than 0".into(),
            ));
        }
        if self.gesture_amount == Some(0) {
            return Err(ConfigError::Invalid(
                "gestureAmount must be greater than 0 when set".into(),
            ));
        }
        if self.gesture_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "gestureTimeoutMs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Reads a JSON config file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Overrides fields from `LONG_CAPTURE_*` variables resolved by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_env(&lookup, ENV_SCROLL_DELAY_MS)? {
            self.scroll_delay_ms = v;
        }
        if let Some(v) = parse_env(&lookup, ENV_MAX_SCROLLS)? {
            self.max_scrolls = v;
        }
        if let Some(v) = parse_env(&lookup, ENV_OVERLAP_HINT)? {
            self.overlap_hint_pixels = v;
        }
        if let Some(v) = parse_env(&lookup, ENV_GESTURE_AMOUNT)? {
            self.gesture_amount = Some(v);
        }
        if let Some(v) = parse_env(&lookup, ENV_GESTURE_TIMEOUT_MS)? {
            self.gesture_timeout_ms = v;
        }
        Ok(())
    }

    /// Defaults, then the config file, then the process environment.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let mut config = match path {
            Some(path) => Self::from_json_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => {
                    log::info!("[CONFIG] Loading {}", path.display());
                    Self::from_json_file(&path)?
                }
                None => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }
}

/// `<config_dir>/long-capture/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("long-capture").join("config.json"))
}

fn parse_env<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { key, value: raw }),
        _ => Ok(None),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{key}={value} is not a valid number")]
    InvalidEnv { key: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
