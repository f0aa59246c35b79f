#![forbid(unsafe_code)]

use boxbreath_tty::{AppConfig, AppError};

fn main() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    boxbreath_tty::logging::init(&config)?;
    boxbreath_tty::run(&config)
}
