#![forbid(unsafe_code)]

//! Runtime configuration read from `BOXBREATH_*` environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `BOXBREATH_LOG_FILE` | unset | write tracing output to this file |
//! | `BOXBREATH_LOG` | `info` | filter directive for the log file |
//! | `BOXBREATH_ALT_SCREEN` | on | draw on the alternate screen |
//! | `BOXBREATH_ENABLE_MOUSE` | on | capture mouse clicks |
//! | `BOXBREATH_INPUT` | on | off leaves a display-only widget |
//! | `BOXBREATH_FRAME_MS` | 33 | redraw interval in milliseconds |
//! | `BOXBREATH_EXIT_AFTER_MS` | unset | quit after this long |

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const ENV_LOG_FILE: &str = "BOXBREATH_LOG_FILE";
pub const ENV_LOG: &str = "BOXBREATH_LOG";
pub const ENV_ALT_SCREEN: &str = "BOXBREATH_ALT_SCREEN";
pub const ENV_ENABLE_MOUSE: &str = "BOXBREATH_ENABLE_MOUSE";
pub const ENV_INPUT: &str = "BOXBREATH_INPUT";
pub const ENV_FRAME_MS: &str = "BOXBREATH_FRAME_MS";
pub const ENV_EXIT_AFTER_MS: &str = "BOXBREATH_EXIT_AFTER_MS";

const DEFAULT_FRAME_MS: u64 = 33;
const FRAME_MS_RANGE: (u64, u64) = (1, 1_000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_file: Option<PathBuf>,
    pub log_filter: String,
    pub alternate_screen: bool,
    pub mouse_capture: bool,
    /// Whether key and mouse input may drive the widget.
    pub input_enabled: bool,
    pub frame_interval: Duration,
    pub exit_after: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            log_filter: "info".to_owned(),
            alternate_screen: true,
            mouse_capture: true,
            input_enabled: true,
            frame_interval: Duration::from_millis(DEFAULT_FRAME_MS),
            exit_after: None,
        }
    }
}

impl AppConfig {
    /// Read the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a numeric variable is malformed or out of
    /// range. Unset and empty variables fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let frame_ms = match env_u64(&lookup, ENV_FRAME_MS)? {
            Some(ms) => in_range(ENV_FRAME_MS, ms, FRAME_MS_RANGE)?,
            None => DEFAULT_FRAME_MS,
        };

        Ok(Self {
            log_file: env_string(&lookup, ENV_LOG_FILE).map(PathBuf::from),
            log_filter: env_string(&lookup, ENV_LOG).unwrap_or(defaults.log_filter),
            alternate_screen: env_flag(&lookup, ENV_ALT_SCREEN)
                .unwrap_or(defaults.alternate_screen),
            mouse_capture: env_flag(&lookup, ENV_ENABLE_MOUSE).unwrap_or(defaults.mouse_capture),
            input_enabled: env_flag(&lookup, ENV_INPUT).unwrap_or(defaults.input_enabled),
            frame_interval: Duration::from_millis(frame_ms),
            exit_after: env_u64(&lookup, ENV_EXIT_AFTER_MS)?.map(Duration::from_millis),
        })
    }
}

fn env_flag<F: Fn(&str) -> Option<String>>(lookup: &F, name: &str) -> Option<bool> {
    let value = lookup(name)?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let enabled = matches!(
        trimmed,
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON"
    );
    Some(enabled)
}

fn env_u64<F: Fn(&str) -> Option<String>>(
    lookup: &F,
    name: &'static str,
) -> Result<Option<u64>, ConfigError> {
    let Some(value) = env_string(lookup, name) else {
        return Ok(None);
    };
    value
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber { var: name, value })
}

fn env_string<F: Fn(&str) -> Option<String>>(lookup: &F, name: &str) -> Option<String> {
    let value = lookup(name)?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn in_range(var: &'static str, value: u64, (min, max): (u64, u64)) -> Result<u64, ConfigError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            var,
            value,
            min,
            max,
        })
    }
}
