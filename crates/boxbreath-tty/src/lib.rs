#![forbid(unsafe_code)]

//! Terminal front end for the box-breathing widget.
//!
//! Draws the square and its point with box-drawing characters, maps keys and
//! clicks to controller commands, and drives the controller's clock from the
//! wall clock.

pub mod app;
pub mod canvas;
pub mod config;
pub mod error;
pub mod logging;
pub mod sink;
pub mod terminal_session;
pub mod viewport;

pub use app::{App, Flow, run};
pub use canvas::Canvas;
pub use config::AppConfig;
pub use error::{AppError, ConfigError};
pub use sink::TerminalSink;
pub use terminal_session::{SessionOptions, TerminalSession};
pub use viewport::Viewport;
