#![forbid(unsafe_code)]

//! Error types for the terminal front end.

use std::fmt;
use std::io;

/// An environment variable held a value we could not use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The value is not a non-negative integer.
    InvalidNumber { var: &'static str, value: String },
    /// The value parsed but falls outside the accepted range.
    OutOfRange {
        var: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNumber { var, value } => {
                write!(f, "{var}: expected a whole number, got {value:?}")
            }
            Self::OutOfRange {
                var,
                value,
                min,
                max,
            } => write!(f, "{var}: {value} is outside {min}..={max}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Anything that can stop the program.
#[derive(Debug)]
pub enum AppError {
    Io(io::Error),
    Config(ConfigError),
    /// The tracing subscriber could not be installed.
    Logging(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "terminal i/o failed: {err}"),
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Logging(msg) => write!(f, "logging setup failed: {msg}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Logging(_) => None,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
