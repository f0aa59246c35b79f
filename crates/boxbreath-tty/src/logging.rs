#![forbid(unsafe_code)]

//! Tracing setup.
//!
//! The terminal belongs to the widget, so log output goes to the file named
//! by `BOXBREATH_LOG_FILE`. With no file configured nothing is installed and
//! every `tracing` call site stays disabled.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::AppError;

/// Install the global subscriber if a log file is configured.
///
/// Returns whether a subscriber was installed.
///
/// # Errors
///
/// Fails on an invalid filter directive, an unwritable log file, or when a
/// global subscriber is already set.
pub fn init(config: &AppConfig) -> Result<bool, AppError> {
    let Some(path) = &config.log_file else {
        return Ok(false);
    };

    let filter = EnvFilter::try_new(&config.log_filter)
        .map_err(|err| AppError::Logging(format!("{:?}: {err}", config.log_filter)))?;
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))?;

    tracing::info!(path = %path.display(), "logging started");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_file_means_no_subscriber() {
        assert!(!init(&AppConfig::default()).unwrap());
    }

    #[test]
    fn bad_filter_is_reported_before_touching_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boxbreath.log");
        let config = AppConfig {
            log_file: Some(path.clone()),
            log_filter: "boxbreath_core=loudest".to_owned(),
            ..AppConfig::default()
        };
        let err = init(&config).unwrap_err();
        assert!(matches!(err, AppError::Logging(_)), "{err}");
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            log_file: Some(dir.path().join("missing").join("boxbreath.log")),
            ..AppConfig::default()
        };
        assert!(matches!(init(&config), Err(AppError::Io(_))));
    }
}
