//! Centralized logging initialization with environment variable support

use crate::{AppConfig, LogFormat};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing subscriber with environment variable support
///
/// Environment variables (in priority order):
/// - `RUST_LOG`: Standard Rust log filter (takes precedence over all)
/// - `LOG_LEVEL`: Set log level (trace, debug, info, warn, error)
/// - `LOG_FORMAT`: Override format (json, pretty)
///
/// # Examples
///
/// ```bash
/// # Follow the graph as it is built
/// LOG_LEVEL=debug strata check .
///
/// # Machine-readable logs
/// LOG_FORMAT=json strata check src
///
/// # Module-specific filtering
/// RUST_LOG=strata_analysis_circular_deps=trace strata check .
/// ```
///
/// Calling this more than once is harmless; later calls leave the first
/// subscriber in place.
pub fn initialize(config: &AppConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(config)));
    let format = log_format(config);

    // Always write to stderr so stdout carries only the report
    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

fn log_level(config: &AppConfig) -> String {
    std::env::var("LOG_LEVEL")
        .ok()
        .filter(|level| level.parse::<tracing::Level>().is_ok())
        .unwrap_or_else(|| config.logging.level.to_lowercase())
}

fn log_format(config: &AppConfig) -> LogFormat {
    std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|f| match f.to_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "pretty" | "human" => Some(LogFormat::Pretty),
            _ => None,
        })
        .unwrap_or_else(|| config.logging.format.clone())
}
