// analysis/strata-analysis-common/src/types.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Canonical, absolute key for one module of the analyzed codebase.
///
/// Two references that denote the same module must produce byte-identical
/// identifiers, otherwise graph edges are silently lost. Canonicalization is
/// the resolver's job; this type only carries the result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-empty `/`-separated segments of the identifier.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|segment| !segment.is_empty())
    }

    /// The directory part of the identifier (everything before the last `/`).
    pub fn directory(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }

    /// The part of the identifier below `root`, without a leading `/`.
    ///
    /// Identifiers outside `root` are returned whole.
    pub fn relative_to(&self, root: &str) -> &str {
        let root = root.trim_end_matches('/');
        match self.0.strip_prefix(root) {
            Some(rest) if root.is_empty() || rest.is_empty() || rest.starts_with('/') => {
                rest.trim_start_matches('/')
            }
            _ => &self.0,
        }
    }

    /// The last `count` segments joined with `/`.
    pub fn tail(&self, count: usize) -> String {
        let segments: Vec<&str> = self.segments().collect();
        let start = segments.len().saturating_sub(count);
        segments[start..].join("/")
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModuleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModuleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Architectural layer a module belongs to, e.g. `domain` or `infrastructure`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerLabel(String);

impl LayerLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// A 1-based position inside a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub path: PathBuf,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(path: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            path: path.into(),
            line,
            column,
        }
    }

    /// Location of the very first character of a file.
    pub fn start_of(path: impl Into<PathBuf>) -> Self {
        Self::new(path, 1, 1)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path.display(), self.line, self.column)
    }
}

/// An import reference exactly as written in source, e.g. `../domain/user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReference {
    pub text: String,
    pub location: SourceLocation,
}

impl ImportReference {
    pub fn new(text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            text: text.into(),
            location,
        }
    }
}

/// Everything the engine needs to know about one module visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleVisit {
    /// Canonical identifier of the module being visited.
    pub module: ModuleId,
    /// File the module was read from; used for module-level anchoring.
    pub path: PathBuf,
    pub imports: Vec<ImportReference>,
}

/// Which granularity a reported cycle was found at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CycleKind {
    ModuleCycle,
    LayerCycle,
}

impl fmt::Display for CycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleKind::ModuleCycle => f.write_str("module-cycle"),
            CycleKind::LayerCycle => f.write_str("layer-cycle"),
        }
    }
}

/// A reported dependency cycle, anchored to an import statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub location: SourceLocation,
    pub message: String,
    pub suggestion: String,
    pub cycle_kind: CycleKind,
    /// The cycle as discovered, first element repeated at the end.
    pub cycle: Vec<String>,
}
