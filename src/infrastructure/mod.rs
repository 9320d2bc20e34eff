//! Infrastructure
//!
//! - Configuration loading and validation
//! - Logging setup

pub mod config;
pub mod logging;

pub use config::{Config, ConfigError};
pub use logging::init_logging;
