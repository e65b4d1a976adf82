//! Resolution of raw import references to canonical module identifiers.
//!
//! Resolution is purely textual: nothing here touches the file system. The
//! same inputs always give the same answer, which is what lets the graph key
//! modules by identifier alone.

use std::path::Path;
use strata_analysis_common::ModuleId;
use tracing::trace;

/// Source extensions stripped from identifiers unless configured otherwise.
pub const DEFAULT_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// Outcome of resolving one import reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A module inside the analyzed codebase.
    Module(ModuleId),
    /// Third-party, platform or otherwise out-of-root code.
    External,
    /// Malformed reference; skipped without a diagnostic.
    Unresolvable,
}

/// Resolves references against a fixed codebase root and package name.
#[derive(Debug, Clone)]
pub struct ReferenceResolver {
    root: String,
    package_name: Option<String>,
    aliases: Vec<(String, String)>,
    extensions: Vec<String>,
}

impl ReferenceResolver {
    pub fn new(root: impl AsRef<str>, package_name: Option<&str>) -> Self {
        Self {
            root: normalize("", root.as_ref()),
            package_name: package_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            aliases: Vec::new(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }

    /// Import prefixes (e.g. `@/`) rewritten to a root-relative directory.
    ///
    /// Longer prefixes are tried first.
    pub fn with_aliases<I, K, V>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.aliases = aliases
            .into_iter()
            .map(|(prefix, target)| -> (String, String) { (prefix.into(), target.into()) })
            .filter(|(prefix, _)| !prefix.is_empty())
            .collect();
        self.aliases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| {
                let ext: String = ext.into();
                ext.trim_start_matches('.').to_string()
            })
            .filter(|ext| !ext.is_empty())
            .collect();
        self
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Canonical identifier for a file path of the analyzed codebase.
    pub fn module_id_for(&self, path: &Path) -> ModuleId {
        self.canonical(self.absolute(path))
    }

    /// Resolves `reference` as written inside `from`.
    pub fn resolve(&self, reference: &str, from: &ModuleId) -> Resolution {
        let resolution = self.resolve_inner(reference, from.directory());
        trace!(reference, from = %from, resolution = ?resolution, "Resolved import reference");
        resolution
    }

    /// Resolves `reference` as written in the file at `path`.
    ///
    /// Relative references are joined onto the file's own directory, which
    /// differs from the directory of its module identifier for `index` files.
    pub fn resolve_from_file(&self, reference: &str, path: &Path) -> Resolution {
        let file = self.absolute(path);
        let directory = file.rfind('/').map_or("", |idx| &file[..idx]);
        let resolution = self.resolve_inner(reference, directory);
        trace!(reference, file = %path.display(), resolution = ?resolution, "Resolved import reference");
        resolution
    }

    fn absolute(&self, path: &Path) -> String {
        let raw = path.to_string_lossy();
        if is_absolute(&raw) {
            normalize("", &raw)
        } else {
            normalize(&self.root, &raw)
        }
    }

    fn resolve_inner(&self, reference: &str, directory: &str) -> Resolution {
        let reference = reference.trim();
        if reference.is_empty() || reference.chars().any(char::is_control) {
            return Resolution::Unresolvable;
        }
        let reference = reference.replace('\\', "/");

        if is_relative(&reference) {
            return self.inside_root(normalize(directory, &reference));
        }
        if reference.starts_with('.') {
            return Resolution::Unresolvable;
        }
        if reference.starts_with('/') {
            return self.inside_root(normalize("", &reference));
        }

        if let Some((prefix, target)) = self
            .aliases
            .iter()
            .find(|(prefix, _)| reference.starts_with(prefix.as_str()))
        {
            let rest = &reference[prefix.len()..];
            let base = normalize(&self.root, target);
            return self.inside_root(normalize(&base, rest));
        }

        if has_scheme(&reference) {
            return Resolution::External;
        }

        let Some((package, rest)) = split_package(&reference) else {
            return Resolution::Unresolvable;
        };
        match &self.package_name {
            Some(own) if own == package => self.inside_root(normalize(&self.root, rest)),
            _ => Resolution::External,
        }
    }

    fn inside_root(&self, absolute: String) -> Resolution {
        let inside = self.root == "/"
            || absolute == self.root
            || absolute
                .strip_prefix(self.root.as_str())
                .is_some_and(|rest| rest.starts_with('/'));

        if inside {
            Resolution::Module(self.canonical(absolute))
        } else {
            Resolution::External
        }
    }

    /// Strips a known source extension and a trailing `index` segment.
    fn canonical(&self, mut path: String) -> ModuleId {
        let file_start = path.rfind('/').map_or(0, |idx| idx + 1);
        if let Some(dot) = path[file_start..].rfind('.') {
            let ext = &path[file_start + dot + 1..];
            if dot > 0 && self.extensions.iter().any(|known| known == ext) {
                path.truncate(file_start + dot);
            }
        }

        if path.len() > self.root.len() && path.ends_with("/index") {
            path.truncate(path.len() - "/index".len());
        }

        ModuleId::new(path)
    }
}

/// Joins `reference` onto `base` by segment-stack normalization.
///
/// `..` pops a segment (popping an empty stack does nothing), `.` and empty
/// segments are dropped. The result is absolute when `base` is, or when
/// `base` is empty and `reference` is.
fn normalize(base: &str, reference: &str) -> String {
    let base = base.replace('\\', "/");
    let absolute = if base.is_empty() {
        reference.starts_with('/') || reference.starts_with('\\')
    } else {
        base.starts_with('/')
    };

    let mut stack: Vec<&str> = Vec::new();
    let reference = reference.replace('\\', "/");
    for segment in base.split('/').chain(reference.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }

    let joined = stack.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

fn is_relative(reference: &str) -> bool {
    reference == "."
        || reference == ".."
        || reference.starts_with("./")
        || reference.starts_with("../")
}

fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || path.starts_with('\\')
}

/// `node:fs`, `bun:test`, `https://...` and friends.
fn has_scheme(reference: &str) -> bool {
    match reference.find(':') {
        Some(colon) => !reference[..colon].contains('/'),
        None => false,
    }
}

/// Splits a bare specifier into its package name and the remaining path.
fn split_package(reference: &str) -> Option<(&str, &str)> {
    let mut boundary = reference.find('/').unwrap_or(reference.len());
    if reference.starts_with('@') {
        let rest = reference.get(boundary + 1..)?;
        let name_len = rest.find('/').unwrap_or(rest.len());
        if name_len == 0 {
            return None;
        }
        boundary += 1 + name_len;
    }

    let package = &reference[..boundary];
    if package.chars().any(char::is_whitespace) {
        return None;
    }
    let rest = reference.get(boundary + 1..).unwrap_or("");
    Some((package, rest))
}
