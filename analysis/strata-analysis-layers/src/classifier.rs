//! First-match-wins layer classification.

use crate::profile::LayerProfile;
use strata_analysis_common::{LayerLabel, ModuleId};
use tracing::trace;

#[derive(Debug, Clone)]
struct CompiledRule {
    pattern: String,
    layer: LayerLabel,
}

/// Classifies module identifiers with one active [`LayerProfile`].
///
/// Classification is a pure function of the identifier, the codebase root and
/// the rule set, so results may be cached for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct LayerClassifier {
    rules: Vec<CompiledRule>,
    root: String,
}

impl LayerClassifier {
    pub fn new(profile: &LayerProfile) -> Self {
        let rules = profile
            .rules
            .iter()
            .filter(|rule| !rule.pattern.is_empty())
            .map(|rule| CompiledRule {
                pattern: normalize(&rule.pattern),
                layer: LayerLabel::new(rule.layer.clone()),
            })
            .collect();

        Self {
            rules,
            root: String::new(),
        }
    }

    /// Matches rules only against the part of each identifier below `root`,
    /// so the directories a project is checked out under never pick a layer.
    pub fn with_root(mut self, root: impl AsRef<str>) -> Self {
        self.root = normalize(root.as_ref());
        self
    }

    /// Label of the first rule whose pattern occurs in `module`, if any.
    ///
    /// Matching is case-insensitive and treats `\` as `/`. The identifier is
    /// framed by separators so a rule such as `/domain/` also matches a module
    /// named `domain` at either end of the path.
    pub fn classify(&self, module: &ModuleId) -> Option<LayerLabel> {
        let normalized = ModuleId::new(normalize(module.as_str()));
        let mut haystack = normalized.relative_to(&self.root).to_string();
        if !haystack.starts_with('/') {
            haystack.insert(0, '/');
        }
        if !haystack.ends_with('/') {
            haystack.push('/');
        }

        let layer = self
            .rules
            .iter()
            .find(|rule| haystack.contains(&rule.pattern))
            .map(|rule| rule.layer.clone());

        trace!(module = %module, layer = ?layer, "Classified module");
        layer
    }
}

impl Default for LayerClassifier {
    fn default() -> Self {
        Self::new(&LayerProfile::default())
    }
}

fn normalize(raw: &str) -> String {
    raw.replace('\\', "/").to_lowercase()
}
