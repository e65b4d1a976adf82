//! Configuration management for strata.
//!
//! Settings come from built-in defaults, then `strata.toml` (or
//! `.strata/config.toml`), then `STRATA__*` environment variables.

mod config;
mod error;
pub mod logging;

pub use config::{AnalysisConfig, AppConfig, LogFormat, LoggingConfig, CONFIG_FILES};
pub use error::{ConfigError, ConfigResult};
