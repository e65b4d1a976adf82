//! CLI command handling for strata

use crate::report;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use strata_analysis_circular_deps::{AnalysisSession, ProjectAnalyzer, ReferenceResolver};
use strata_analysis_layers::{LayerClassifier, ProfileKind};
use strata_config::AppConfig;
use strata_lang_typescript::TypeScriptImportExtractor;
use tracing::debug;

/// The main CLI struct.
#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Detects dependency cycles between modules and architectural layers")]
#[command(version)]
pub struct Cli {
    /// The command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// The available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a project and report module and layer cycles
    Check {
        /// Directory to analyze
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Configuration file (defaults to strata.toml or .strata/config.toml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Layer profile (traditional, hexagonal, onion, custom)
        #[arg(long, value_parser = parse_profile)]
        profile: Option<ProfileKind>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// What the process exit code should say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    Violations,
}

fn parse_profile(s: &str) -> Result<ProfileKind, String> {
    s.parse()
}

/// Main CLI entry point
pub fn run() -> Result<Outcome> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Check {
            path,
            config,
            profile,
            format,
        } => check(&path, config.as_deref(), profile, format),
    }
}

fn check(
    path: &Path,
    config_path: Option<&Path>,
    profile: Option<ProfileKind>,
    format: OutputFormat,
) -> Result<Outcome> {
    let mut config = AppConfig::load(config_path).context("Failed to load configuration")?;
    if let Some(profile) = profile {
        config.analysis.profile = profile;
        config.validate().context("Invalid --profile")?;
    }
    strata_config::logging::initialize(&config);

    let target = path
        .canonicalize()
        .with_context(|| format!("Cannot analyze '{}'", path.display()))?;
    let root = config
        .analysis
        .codebase_root
        .clone()
        .unwrap_or_else(|| target.clone());
    debug!(target = %target.display(), root = %root.display(), profile = %config.analysis.profile, "Starting check");

    let analysis = &config.analysis;
    let resolver = ReferenceResolver::new(root.to_string_lossy(), analysis.package_name.as_deref())
        .with_aliases(analysis.aliases.clone())
        .with_extensions(analysis.extensions.clone());
    let mut session = AnalysisSession::new(
        resolver,
        LayerClassifier::new(&analysis.layer_profile()),
    )
    .with_min_layer_cycle_length(analysis.min_layer_cycle_length);

    let report = ProjectAnalyzer::new(Box::new(TypeScriptImportExtractor::new()))
        .with_ignore(&analysis.ignore)?
        .with_extensions(&analysis.extensions)
        .analyze(&mut session, &target)?;

    match format {
        OutputFormat::Text => print!("{}", report::render_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(if report.has_diagnostics() {
        Outcome::Violations
    } else {
        Outcome::Clean
    })
}
