//! Built-in and custom layer rule sets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single `pattern -> layer` rule. Patterns are plain substrings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRule {
    pub pattern: String,
    pub layer: String,
}

impl LayerRule {
    pub fn new(pattern: impl Into<String>, layer: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            layer: layer.into(),
        }
    }
}

/// Names of the selectable profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    #[default]
    Traditional,
    Hexagonal,
    Onion,
    Custom,
}

impl ProfileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKind::Traditional => "traditional",
            ProfileKind::Hexagonal => "hexagonal",
            ProfileKind::Onion => "onion",
            ProfileKind::Custom => "custom",
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "traditional" | "layered" => Ok(ProfileKind::Traditional),
            "hexagonal" | "ports-and-adapters" => Ok(ProfileKind::Hexagonal),
            "onion" => Ok(ProfileKind::Onion),
            "custom" => Ok(ProfileKind::Custom),
            other => Err(format!(
                "unknown layer profile '{other}', expected one of: traditional, hexagonal, onion, custom"
            )),
        }
    }
}

/// An ordered rule set; the first matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerProfile {
    pub kind: ProfileKind,
    pub rules: Vec<LayerRule>,
}

impl LayerProfile {
    /// Presentation / application / domain / infrastructure.
    pub fn traditional() -> Self {
        Self {
            kind: ProfileKind::Traditional,
            rules: rules(&[
                ("/domain/", "domain"),
                ("/application/", "application"),
                ("/use-cases/", "application"),
                ("/usecases/", "application"),
                ("/infrastructure/", "infrastructure"),
                ("/infra/", "infrastructure"),
                ("/persistence/", "infrastructure"),
                ("/presentation/", "presentation"),
                ("/ui/", "presentation"),
                ("/controllers/", "presentation"),
            ]),
        }
    }

    /// Ports and adapters around a domain core.
    pub fn hexagonal() -> Self {
        Self {
            kind: ProfileKind::Hexagonal,
            rules: rules(&[
                ("/domain/", "domain"),
                ("/ports/", "ports"),
                ("/port/", "ports"),
                ("/application/", "application"),
                ("/adapters/", "adapter"),
                ("/adapter/", "adapter"),
                ("/infrastructure/", "infrastructure"),
            ]),
        }
    }

    pub fn onion() -> Self {
        Self {
            kind: ProfileKind::Onion,
            rules: rules(&[
                ("/domain/model/", "domain-model"),
                ("/domain/models/", "domain-model"),
                ("/domain/services/", "domain-services"),
                ("/domain/", "domain-model"),
                ("/application/", "application-services"),
                ("/infrastructure/", "infrastructure"),
                ("/presentation/", "presentation"),
            ]),
        }
    }

    pub fn custom(rules: Vec<LayerRule>) -> Self {
        Self {
            kind: ProfileKind::Custom,
            rules,
        }
    }

    /// Built-in profile for `kind`. `Custom` yields an empty rule list.
    pub fn builtin(kind: ProfileKind) -> Self {
        match kind {
            ProfileKind::Traditional => Self::traditional(),
            ProfileKind::Hexagonal => Self::hexagonal(),
            ProfileKind::Onion => Self::onion(),
            ProfileKind::Custom => Self::custom(Vec::new()),
        }
    }

    /// Distinct layer labels in rule order.
    pub fn layers(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for rule in &self.rules {
            if !seen.contains(&rule.layer.as_str()) {
                seen.push(rule.layer.as_str());
            }
        }
        seen
    }
}

impl Default for LayerProfile {
    fn default() -> Self {
        Self::traditional()
    }
}

fn rules(pairs: &[(&str, &str)]) -> Vec<LayerRule> {
    pairs
        .iter()
        .map(|(pattern, layer)| LayerRule::new(*pattern, *layer))
        .collect()
}
