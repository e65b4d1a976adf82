//! Application configuration types and loading.

use crate::error::{ConfigError, ConfigResult};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use strata_analysis_circular_deps::{DEFAULT_EXTENSIONS, DEFAULT_MIN_LAYER_CYCLE_LENGTH};
use strata_analysis_layers::{LayerProfile, LayerRule, ProfileKind};

/// Configuration files looked up in the working directory, first found wins.
pub const CONFIG_FILES: &[&str] = &["strata.toml", ".strata/config.toml"];

const ENV_PREFIX: &str = "STRATA__";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings of one analysis session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    /// Absolute root of the analyzed codebase. Hosts fall back to the
    /// analyzed directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codebase_root: Option<PathBuf>,
    /// The codebase's own package name; imports through it stay internal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    pub profile: ProfileKind,
    /// Ordered rules used when `profile` is `custom`.
    pub custom_layers: Vec<LayerRule>,
    /// Import prefix to root-relative directory, e.g. `"@/" = "src"`.
    pub aliases: BTreeMap<String, String>,
    /// Source extensions stripped from module identifiers.
    pub extensions: Vec<String>,
    /// Fewest distinct layers a reported layer cycle must span.
    pub min_layer_cycle_length: usize,
    /// Glob patterns, relative to the analyzed directory, excluded from the walk.
    pub ignore: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            codebase_root: None,
            package_name: None,
            profile: ProfileKind::default(),
            custom_layers: Vec::new(),
            aliases: BTreeMap::new(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            min_layer_cycle_length: DEFAULT_MIN_LAYER_CYCLE_LENGTH,
            ignore: Vec::new(),
        }
    }
}

impl AnalysisConfig {
    /// The active layer profile.
    pub fn layer_profile(&self) -> LayerProfile {
        match self.profile {
            ProfileKind::Custom => LayerProfile::custom(self.custom_layers.clone()),
            kind => LayerProfile::builtin(kind),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format for development
    #[default]
    Pretty,
    /// Structured JSON format for log collectors
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Load configuration relative to the current working directory.
    ///
    /// See [`AppConfig::load_from`].
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| ConfigError::Load(format!("Cannot determine working directory: {}", e)))?;
        Self::load_from(&cwd, explicit)
    }

    /// Load configuration in priority order (highest to lowest):
    /// 1. Environment variables (`STRATA__*`, `__` separating sections)
    /// 2. `explicit` if given, otherwise the first of [`CONFIG_FILES`] found in `dir`
    /// 3. Default values
    pub fn load_from(dir: &Path, explicit: Option<&Path>) -> ConfigResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        let file = match explicit {
            Some(path) if path.is_file() => Some(path.to_path_buf()),
            Some(path) => return Err(ConfigError::NotFound(path.to_path_buf())),
            None => CONFIG_FILES
                .iter()
                .map(|name| dir.join(name))
                .find(|path| path.is_file()),
        };
        if let Some(path) = &file {
            tracing::debug!(path = %path.display(), "Loading TOML configuration");
            figment = figment.merge(Toml::file(path));
        }

        let figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .split("__")
                .map(|key| env_key(key.as_str()).into()),
        );

        let config: AppConfig = figment
            .extract()
            .map_err(|e| ConfigError::Load(e.to_string()))?;
        config.validate()?;

        tracing::debug!(
            profile = %config.analysis.profile,
            file = ?file,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let analysis = &self.analysis;

        if let Some(root) = &analysis.codebase_root {
            if !root.is_absolute() {
                return Err(ConfigError::invalid(format!(
                    "codebaseRoot must be an absolute path, got '{}'",
                    root.display()
                )));
            }
        }

        if analysis.profile == ProfileKind::Custom && analysis.custom_layers.is_empty() {
            return Err(ConfigError::invalid(
                "profile 'custom' requires at least one entry in customLayers",
            ));
        }
        for rule in &analysis.custom_layers {
            if rule.pattern.trim().is_empty() || rule.layer.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "customLayers entries need a non-empty pattern and layer",
                ));
            }
        }

        if analysis.extensions.iter().any(|ext| ext.trim().is_empty()) {
            return Err(ConfigError::invalid("extensions cannot contain empty entries"));
        }

        if analysis.min_layer_cycle_length < 2 {
            return Err(ConfigError::invalid(format!(
                "minLayerCycleLength must be at least 2, got {}",
                analysis.min_layer_cycle_length
            )));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid(format!(
                "Invalid log level '{}', must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }
}

/// Maps a lowercased, dot-split environment key onto the camelCase field
/// names: `analysis.min_layer_cycle_length` -> `analysis.minLayerCycleLength`.
fn env_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for ch in key.chars() {
        match ch {
            '_' => upper = true,
            '.' => {
                upper = false;
                out.push(ch);
            }
            _ if upper => {
                out.extend(ch.to_uppercase());
                upper = false;
            }
            _ => out.push(ch),
        }
    }
    out
}
