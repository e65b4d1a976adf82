//! Drives an [`AnalysisSession`] over every source file below a directory.

use crate::session::AnalysisSession;
use crate::summary::{find_circular_dependencies, Cycle, Summary};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use strata_analysis_common::{AnalysisError, Diagnostic, ImportExtractor, ModuleVisit};
use tracing::{debug, info, warn};

/// Directories never descended into, whatever the ignore files say.
const ALWAYS_SKIPPED: &[&str] = &[".git", "node_modules"];

/// Result of analyzing a whole project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReport {
    pub root: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
    pub cycles: Vec<Cycle>,
    pub summary: Summary,
    pub modules: usize,
    pub edges: usize,
    pub files_skipped: usize,
}

impl ProjectReport {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Walks a directory, extracts imports and feeds them to a session.
///
/// Every module is recorded before any module is checked, so the result does
/// not depend on the order the walk yields files in.
pub struct ProjectAnalyzer {
    extractor: Box<dyn ImportExtractor>,
    ignore: GlobSet,
    /// Narrows the extractor's extensions; `None` accepts all of them.
    extensions: Option<Vec<String>>,
}

impl ProjectAnalyzer {
    pub fn new(extractor: Box<dyn ImportExtractor>) -> Self {
        Self {
            extractor,
            ignore: GlobSet::empty(),
            extensions: None,
        }
    }

    /// Only visits files with one of `extensions` (with or without the dot).
    ///
    /// Pass the same list the resolver strips, so every visited file gets an
    /// identifier its importers can resolve to.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = Some(
            extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_string())
                .collect(),
        );
        self
    }

    fn accepts(&self, path: &Path) -> bool {
        if !self.extractor.handles(path) {
            return false;
        }
        match &self.extensions {
            Some(allowed) => path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| allowed.iter().any(|known| known == ext)),
            None => true,
        }
    }

    /// Excludes files whose root-relative path matches any of `patterns`.
    pub fn with_ignore<I, S>(mut self, patterns: I) -> Result<Self, AnalysisError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = Glob::new(pattern).map_err(|e| {
                AnalysisError::ConfigError(format!("Invalid ignore pattern '{}': {}", pattern, e))
            })?;
            builder.add(glob);
        }
        self.ignore = builder
            .build()
            .map_err(|e| AnalysisError::ConfigError(format!("Invalid ignore patterns: {}", e)))?;
        Ok(self)
    }

    pub fn analyze(
        &self,
        session: &mut AnalysisSession,
        root: &Path,
    ) -> Result<ProjectReport, AnalysisError> {
        let start = Instant::now();
        if !root.exists() {
            return Err(AnalysisError::PathNotFound(root.display().to_string()));
        }

        let files = self.discover_files(root);
        debug!(root = %root.display(), files = files.len(), "Discovered source files");

        let mut visits = Vec::with_capacity(files.len());
        let mut files_skipped = 0;
        for path in files {
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable file");
                    files_skipped += 1;
                    continue;
                }
            };
            let imports = self.extractor.extract(&path, &content);
            visits.push(ModuleVisit {
                module: session.resolver().module_id_for(&path),
                path,
                imports,
            });
        }

        for visit in &visits {
            session.record(visit);
        }
        let diagnostics: Vec<Diagnostic> = visits
            .iter()
            .flat_map(|visit| session.check(visit))
            .collect();

        let graph = session.graph();
        let result = find_circular_dependencies(graph, visits.len(), None);
        let summary = Summary {
            analysis_time_ms: start.elapsed().as_millis() as u64,
            ..result.summary
        };

        info!(
            root = %root.display(),
            files = summary.files_analyzed,
            modules = graph.node_count(),
            edges = graph.edge_count(),
            diagnostics = diagnostics.len(),
            cycles = summary.total_cycles,
            elapsed_ms = summary.analysis_time_ms,
            "Project analysis complete"
        );

        Ok(ProjectReport {
            root: root.to_path_buf(),
            modules: graph.node_count(),
            edges: graph.edge_count(),
            diagnostics,
            cycles: result.cycles,
            summary,
            files_skipped,
        })
    }

    /// Source files below `root` the extractor understands, sorted by path.
    fn discover_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let walker = WalkBuilder::new(root)
            .hidden(false)
            .git_ignore(true)
            .filter_entry(|entry| {
                !ALWAYS_SKIPPED
                    .iter()
                    .any(|skipped| entry.file_name() == *skipped)
            })
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Walk error");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|kind| kind.is_file()) {
                continue;
            }

            let path = entry.path();
            if !self.accepts(path) {
                continue;
            }
            let relative_path = path.strip_prefix(root).unwrap_or(path);
            if self.ignore.is_match(relative_path) {
                debug!(path = %relative_path.display(), "Ignored by pattern");
                continue;
            }
            files.push(path.to_path_buf());
        }

        files.sort();
        files
    }
}
