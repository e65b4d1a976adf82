// analysis/strata-analysis-common/src/error.rs

/// Common error type for analysis operations.
///
/// Only project setup produces these: a missing root or bad configuration.
/// Reference resolution, edge insertion and cycle detection never fail, and
/// unreadable files are skipped with a warning.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Path does not exist: {0}")]
    PathNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
