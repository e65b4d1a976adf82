//! Turns detected cycles into diagnostics anchored at import statements.

use strata_analysis_common::{CycleKind, Diagnostic, LayerLabel, ModuleId, SourceLocation};

const ARROW: &str = " -> ";

const INVERSION_HINT: &str = "Apply dependency inversion: declare an interface in the inner layer and \
implement it in the outer layer so that dependencies point in one direction only.";
const REPOSITORY_HINT: &str = "Extract a repository interface and depend on it instead of the concrete \
repository implementation.";
const USE_CASE_HINT: &str = "Restructure the use cases so they do not call each other; move the shared \
logic into a domain service or orchestrate them from a higher-level use case.";
const SHARED_MODULE_HINT: &str =
    "Extract the code both modules need into a separate shared module that neither of them imports back.";

/// An import of the current module after resolution, paired with where it
/// was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImport {
    pub target: ModuleId,
    pub location: SourceLocation,
}

/// Builds [`Diagnostic`]s for module and layer cycles.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticEmitter {
    /// Codebase root; hint markers are only looked for below it.
    root: String,
}

impl DiagnosticEmitter {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    /// Diagnostic for a module cycle passing through `current`.
    ///
    /// The diagnostic sits on the import of `current` that points at the next
    /// module of the cycle; if that import is no longer among `imports` (it was
    /// recorded by an earlier visit), the start of the file is used.
    pub fn module_cycle<F>(
        &self,
        cycle: &[ModuleId],
        current: &ModuleId,
        imports: &[ResolvedImport],
        fallback: &SourceLocation,
        layer_of: F,
    ) -> Diagnostic
    where
        F: Fn(&ModuleId) -> Option<LayerLabel>,
    {
        let location = next_after(cycle, current)
            .and_then(|next| imports.iter().find(|import| &import.target == next))
            .or_else(|| imports.iter().find(|import| cycle.contains(&import.target)))
            .map(|import| import.location.clone())
            .unwrap_or_else(|| fallback.clone());

        let description = cycle
            .iter()
            .map(abbreviate)
            .collect::<Vec<_>>()
            .join(ARROW);

        Diagnostic {
            location,
            message: format!("Circular dependency detected: {description}"),
            suggestion: self.suggest(cycle, layer_of).to_string(),
            cycle_kind: CycleKind::ModuleCycle,
            cycle: cycle.iter().map(|id| id.as_str().to_string()).collect(),
        }
    }

    /// Diagnostic for a layer cycle, placed on an import of the current
    /// module that crosses into the next layer of the cycle.
    ///
    /// Returns `None` when no import of the current module contributes an
    /// edge to the cycle; such a module has nothing to fix.
    pub fn layer_cycle<F>(
        &self,
        cycle: &[LayerLabel],
        current_layer: &LayerLabel,
        imports: &[ResolvedImport],
        layer_of: F,
    ) -> Option<Diagnostic>
    where
        F: Fn(&ModuleId) -> Option<LayerLabel>,
    {
        let next = next_after(cycle, current_layer)?;
        let anchor = imports
            .iter()
            .find(|import| layer_of(&import.target).as_ref() == Some(next))?;

        let description = cycle
            .iter()
            .map(LayerLabel::as_str)
            .collect::<Vec<_>>()
            .join(ARROW);

        Some(Diagnostic {
            location: anchor.location.clone(),
            message: format!(
                "Circular layer dependency detected: {description} (via {})",
                abbreviate(&anchor.target)
            ),
            suggestion: INVERSION_HINT.to_string(),
            cycle_kind: CycleKind::LayerCycle,
            cycle: cycle.iter().map(|label| label.as_str().to_string()).collect(),
        })
    }

    fn suggest<F>(&self, cycle: &[ModuleId], layer_of: F) -> &'static str
    where
        F: Fn(&ModuleId) -> Option<LayerLabel>,
    {
        let mut layers: Vec<LayerLabel> = Vec::new();
        for layer in cycle.iter().filter_map(|id| layer_of(id)) {
            if !layers.contains(&layer) {
                layers.push(layer);
            }
        }
        if layers.len() > 1 {
            return INVERSION_HINT;
        }

        if self.mentions(cycle, &["repository", "repositories", "repo/", ".repo"]) {
            REPOSITORY_HINT
        } else if self.mentions(cycle, &["use-case", "usecase", "use_case", "interactor"]) {
            USE_CASE_HINT
        } else {
            SHARED_MODULE_HINT
        }
    }

    fn mentions(&self, cycle: &[ModuleId], markers: &[&str]) -> bool {
        cycle.iter().any(|id| {
            let lowered = id.relative_to(&self.root).to_lowercase();
            markers.iter().any(|marker| lowered.contains(marker))
        })
    }
}

/// Element following the first occurrence of `item` in a closed cycle.
fn next_after<'a, T: PartialEq>(cycle: &'a [T], item: &T) -> Option<&'a T> {
    let pos = cycle.iter().position(|candidate| candidate == item)?;
    cycle.get(pos + 1)
}

/// Last two path segments of an identifier.
fn abbreviate(id: &ModuleId) -> String {
    id.tail(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn id(path: &str) -> ModuleId {
        ModuleId::new(path)
    }

    fn emitter() -> DiagnosticEmitter {
        DiagnosticEmitter::new("/proj")
    }

    fn import(target: &str, line: u32) -> ResolvedImport {
        ResolvedImport {
            target: id(target),
            location: SourceLocation::new("/proj/src/a.ts", line, 1),
        }
    }

    fn no_layers(_: &ModuleId) -> Option<LayerLabel> {
        None
    }

    fn path_layers(module: &ModuleId) -> Option<LayerLabel> {
        ["domain", "application", "infrastructure"]
            .into_iter()
            .find(|layer| module.as_str().contains(&format!("/{layer}/")))
            .map(LayerLabel::new)
    }

    #[test]
    fn test_anchors_at_import_of_next_module() {
        let cycle = vec![id("/proj/src/a"), id("/proj/src/b"), id("/proj/src/a")];
        let imports = vec![import("/proj/src/c", 1), import("/proj/src/b", 2)];
        let fallback = SourceLocation::start_of("/proj/src/a.ts");

        let diagnostic = emitter().module_cycle(
            &cycle,
            &id("/proj/src/a"),
            &imports,
            &fallback,
            no_layers,
        );

        assert_eq!(diagnostic.location.line, 2);
        assert_eq!(diagnostic.cycle_kind, CycleKind::ModuleCycle);
        assert_eq!(
            diagnostic.message,
            "Circular dependency detected: src/a -> src/b -> src/a"
        );
        assert_eq!(diagnostic.suggestion, SHARED_MODULE_HINT);
    }

    #[test]
    fn test_falls_back_to_start_of_file() {
        let cycle = vec![id("/proj/src/a"), id("/proj/src/a")];
        let fallback = SourceLocation::start_of("/proj/src/a.ts");

        let diagnostic =
            emitter().module_cycle(&cycle, &id("/proj/src/a"), &[], &fallback, no_layers);
        assert_eq!(diagnostic.location, fallback);
        assert_eq!(diagnostic.message, "Circular dependency detected: src/a -> src/a");
    }

    #[test]
    fn test_cross_layer_cycle_suggests_inversion() {
        let cycle = vec![
            id("/proj/domain/user"),
            id("/proj/infrastructure/user-repository"),
            id("/proj/domain/user"),
        ];
        let fallback = SourceLocation::start_of("/proj/domain/user.ts");
        let diagnostic = emitter().module_cycle(
            &cycle,
            &id("/proj/domain/user"),
            &[],
            &fallback,
            path_layers,
        );
        assert_eq!(diagnostic.suggestion, INVERSION_HINT);
    }

    #[test]
    fn test_repository_marker_suggestion() {
        let cycle = vec![
            id("/proj/domain/user"),
            id("/proj/domain/user-repository"),
            id("/proj/domain/user"),
        ];
        let fallback = SourceLocation::start_of("/proj/domain/user.ts");
        let diagnostic = emitter().module_cycle(
            &cycle,
            &id("/proj/domain/user"),
            &[],
            &fallback,
            path_layers,
        );
        assert_eq!(diagnostic.suggestion, REPOSITORY_HINT);
    }

    #[test]
    fn test_use_case_marker_suggestion() {
        let cycle = vec![
            id("/proj/application/use-cases/create-order"),
            id("/proj/application/use-cases/pay-order"),
            id("/proj/application/use-cases/create-order"),
        ];
        let fallback = SourceLocation::start_of("/proj/application/use-cases/create-order.ts");
        let diagnostic = emitter().module_cycle(
            &cycle,
            &cycle[0],
            &[],
            &fallback,
            path_layers,
        );
        assert_eq!(diagnostic.suggestion, USE_CASE_HINT);
        assert_eq!(
            diagnostic.message,
            "Circular dependency detected: use-cases/create-order -> use-cases/pay-order -> use-cases/create-order"
        );
    }

    #[test]
    fn test_layer_cycle_anchor() {
        let cycle: Vec<LayerLabel> = ["domain", "application", "infrastructure", "domain"]
            .into_iter()
            .map(LayerLabel::new)
            .collect();
        let imports = vec![
            import("/proj/domain/money", 1),
            import("/proj/application/place-order", 4),
        ];

        let diagnostic = emitter()
            .layer_cycle(&cycle, &LayerLabel::new("domain"), &imports, path_layers)
            .unwrap();

        assert_eq!(diagnostic.location.line, 4);
        assert_eq!(diagnostic.cycle_kind, CycleKind::LayerCycle);
        assert_eq!(
            diagnostic.message,
            "Circular layer dependency detected: domain -> application -> infrastructure -> domain (via application/place-order)"
        );
        assert_eq!(diagnostic.suggestion, INVERSION_HINT);
    }

    #[test]
    fn test_layer_cycle_without_contributing_import() {
        let cycle: Vec<LayerLabel> = ["domain", "application", "infrastructure", "domain"]
            .into_iter()
            .map(LayerLabel::new)
            .collect();
        let imports = vec![import("/proj/domain/money", 1)];

        assert!(emitter()
            .layer_cycle(&cycle, &LayerLabel::new("domain"), &imports, path_layers)
            .is_none());
    }

    #[test]
    fn test_hint_markers_ignore_the_codebase_root() {
        let cycle = vec![
            id("/work/repositories/shop/src/cart"),
            id("/work/repositories/shop/src/pricing"),
            id("/work/repositories/shop/src/cart"),
        ];
        let fallback = SourceLocation::start_of("/work/repositories/shop/src/cart.ts");

        let rooted = DiagnosticEmitter::new("/work/repositories/shop").module_cycle(
            &cycle,
            &cycle[0],
            &[],
            &fallback,
            no_layers,
        );
        assert_eq!(rooted.suggestion, SHARED_MODULE_HINT);

        let unrooted =
            DiagnosticEmitter::default().module_cycle(&cycle, &cycle[0], &[], &fallback, no_layers);
        assert_eq!(unrooted.suggestion, REPOSITORY_HINT);
    }
}
