//! The per-session analysis driver.
//!
//! A host creates one [`AnalysisSession`] per run and feeds it one
//! [`ModuleVisit`] per module. The session owns the dependency graph; nothing
//! else writes to it.

use crate::diagnostic::{DiagnosticEmitter, ResolvedImport};
use crate::resolver::{ReferenceResolver, Resolution};
use crate::summary::{find_circular_dependencies, CircularDependenciesResult};
use strata_analysis_common::{Diagnostic, LayerLabel, ModuleId, ModuleVisit, SourceLocation};
use strata_analysis_graph::{distinct_layers, DependencyGraph, LayerGraph};
use std::collections::HashSet;
use strata_analysis_layers::LayerClassifier;
use tracing::debug;

/// Layer cycles spanning fewer distinct layers than this are not reported.
pub const DEFAULT_MIN_LAYER_CYCLE_LENGTH: usize = 3;

/// Single-writer owner of the dependency graph for one analysis run.
#[derive(Debug)]
pub struct AnalysisSession {
    resolver: ReferenceResolver,
    graph: DependencyGraph,
    emitter: DiagnosticEmitter,
    min_layer_cycle_length: usize,
    /// Projection of `graph`, rebuilt lazily after new edges arrive.
    layers: Option<LayerGraph>,
    /// Modules passed to `record`, as opposed to modules only imported.
    recorded: HashSet<ModuleId>,
}

impl AnalysisSession {
    /// Layers are assigned and hints chosen from the part of each module id
    /// below the resolver's root.
    pub fn new(resolver: ReferenceResolver, classifier: LayerClassifier) -> Self {
        let root = resolver.root().to_string();
        Self {
            graph: DependencyGraph::new(classifier.with_root(&root)),
            emitter: DiagnosticEmitter::new(root),
            resolver,
            min_layer_cycle_length: DEFAULT_MIN_LAYER_CYCLE_LENGTH,
            layers: None,
            recorded: HashSet::new(),
        }
    }

    pub fn with_min_layer_cycle_length(mut self, min: usize) -> Self {
        self.min_layer_cycle_length = min;
        self
    }

    pub fn resolver(&self) -> &ReferenceResolver {
        &self.resolver
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Records the module's edges and then checks it.
    pub fn visit(&mut self, visit: &ModuleVisit) -> Vec<Diagnostic> {
        self.record(visit);
        self.check(visit)
    }

    /// Inserts every edge the module's imports resolve to.
    ///
    /// External and unresolvable references are dropped. Returns the number
    /// of edges that were new to the graph.
    pub fn record(&mut self, visit: &ModuleVisit) -> usize {
        self.recorded.insert(visit.module.clone());

        let mut added = 0;
        for import in &visit.imports {
            if let Resolution::Module(target) =
                self.resolver.resolve_from_file(&import.text, &visit.path)
            {
                if self.graph.add_edge(&visit.module, &target) {
                    added += 1;
                }
            }
        }

        if added > 0 {
            self.layers = None;
        }
        debug!(module = %visit.module, edges = added, "Recorded module");
        added
    }

    /// Reports the module and layer cycles the visited module lies on, given
    /// the graph recorded so far.
    ///
    /// A module the session has never recorded has no edges and yields
    /// nothing.
    pub fn check(&mut self, visit: &ModuleVisit) -> Vec<Diagnostic> {
        let module = &visit.module;
        if !self.graph.contains(module) {
            return Vec::new();
        }

        let imports: Vec<ResolvedImport> = visit
            .imports
            .iter()
            .filter_map(|import| {
                match self.resolver.resolve_from_file(&import.text, &visit.path) {
                    Resolution::Module(target) => Some(ResolvedImport {
                        target,
                        location: import.location.clone(),
                    }),
                    _ => None,
                }
            })
            .collect();

        let mut diagnostics = Vec::new();
        if let Some(diagnostic) = self.check_module_cycle(visit, &imports) {
            diagnostics.push(diagnostic);
        }
        if let Some(diagnostic) = self.check_layer_cycle(module, &imports) {
            diagnostics.push(diagnostic);
        }
        diagnostics
    }

    fn check_module_cycle(
        &self,
        visit: &ModuleVisit,
        imports: &[ResolvedImport],
    ) -> Option<Diagnostic> {
        let module = &visit.module;
        let cycle = self
            .graph
            .find_cycle(module)
            .filter(|cycle| cycle.contains(module))
            .or_else(|| self.graph.find_cycle_through(module))?;

        debug!(module = %module, length = cycle.len() - 1, "Module cycle found");
        let fallback = SourceLocation::start_of(&visit.path);
        Some(self.emitter.module_cycle(
            &cycle,
            module,
            imports,
            &fallback,
            |id| self.graph.layer_of(id).cloned(),
        ))
    }

    fn check_layer_cycle(
        &mut self,
        module: &ModuleId,
        imports: &[ResolvedImport],
    ) -> Option<Diagnostic> {
        let graph = &self.graph;
        let current: LayerLabel = graph.layer_of(module)?.clone();
        let layers = self
            .layers
            .get_or_insert_with(|| LayerGraph::project(graph));

        let cycle = layers
            .find_cycle(&current)
            .filter(|cycle| cycle.contains(&current))
            .or_else(|| layers.find_cycle_through(&current))?;

        let span = distinct_layers(&cycle);
        if span < self.min_layer_cycle_length {
            debug!(module = %module, layers = span, "Layer cycle below reporting threshold");
            return None;
        }

        debug!(module = %module, layers = span, "Layer cycle found");
        self.emitter
            .layer_cycle(&cycle, &current, imports, |id| graph.layer_of(id).cloned())
    }

    /// Number of distinct modules recorded so far.
    pub fn modules_recorded(&self) -> usize {
        self.recorded.len()
    }

    /// Every strongly connected group of modules in the graph so far.
    pub fn circular_dependencies(&self) -> CircularDependenciesResult {
        find_circular_dependencies(&self.graph, self.modules_recorded(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use strata_analysis_common::{CycleKind, ImportReference};
    use strata_analysis_layers::LayerProfile;

    fn session() -> AnalysisSession {
        AnalysisSession::new(
            ReferenceResolver::new("/proj", Some("@acme/app")),
            LayerClassifier::new(&LayerProfile::traditional()),
        )
    }

    fn visit(session: &AnalysisSession, file: &str, imports: &[&str]) -> ModuleVisit {
        let path = Path::new("/proj").join(file);
        ModuleVisit {
            module: session.resolver().module_id_for(&path),
            imports: imports
                .iter()
                .enumerate()
                .map(|(i, text)| {
                    ImportReference::new(*text, SourceLocation::new(&path, i as u32 + 1, 1))
                })
                .collect(),
            path,
        }
    }

    #[test]
    fn test_record_ignores_external_and_unresolvable() {
        let mut session = session();
        let a = visit(&session, "src/a.ts", &["./b", "react", "node:fs", "", "../../../etc/x"]);

        assert_eq!(session.record(&a), 1);
        assert_eq!(session.record(&a), 0);

        let nodes: Vec<&str> = session.graph().all_nodes().map(ModuleId::as_str).collect();
        assert_eq!(nodes, vec!["/proj/src/a", "/proj/src/b"]);
    }

    #[test]
    fn test_self_import_reported() {
        let mut session = session();
        let a = visit(&session, "src/a.ts", &["./a"]);

        let diagnostics = session.visit(&a);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].cycle, vec!["/proj/src/a", "/proj/src/a"]);
        assert_eq!(diagnostics[0].location.line, 1);
    }

    #[test]
    fn test_visit_order_matters_for_single_pass() {
        let mut session = session();
        let a = visit(&session, "src/a.ts", &["./b"]);
        let b = visit(&session, "src/b.ts", &["./a"]);

        // A is checked before B's edge exists.
        assert!(session.visit(&a).is_empty());
        let diagnostics = session.visit(&b);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].cycle_kind, CycleKind::ModuleCycle);
        assert_eq!(diagnostics[0].message, "Circular dependency detected: src/b -> src/a -> src/b");
    }

    #[test]
    fn test_two_phase_reports_every_member() {
        let mut session = session();
        let a = visit(&session, "src/a.ts", &["./util", "./b"]);
        let b = visit(&session, "src/b.ts", &["./c"]);
        let c = visit(&session, "src/c.ts", &["./a"]);
        let util = visit(&session, "src/util.ts", &[]);

        for module in [&a, &b, &c, &util] {
            session.record(module);
        }

        let a_diagnostics = session.check(&a);
        assert_eq!(a_diagnostics.len(), 1);
        assert_eq!(a_diagnostics[0].location.line, 2);
        assert_eq!(session.check(&b).len(), 1);
        assert_eq!(session.check(&c).len(), 1);
        assert!(session.check(&util).is_empty());
    }

    #[test]
    fn test_module_reaching_a_foreign_cycle_is_not_reported() {
        let mut session = session();
        let entry = visit(&session, "src/entry.ts", &["./a"]);
        let a = visit(&session, "src/a.ts", &["./b"]);
        let b = visit(&session, "src/b.ts", &["./a"]);

        for module in [&entry, &a, &b] {
            session.record(module);
        }
        assert!(session.check(&entry).is_empty());
        assert_eq!(session.check(&a).len(), 1);
    }

    #[test]
    fn test_no_false_positive_on_dag() {
        let mut session = session();
        let a = visit(&session, "src/a.ts", &["./b", "./c"]);
        let b = visit(&session, "src/b.ts", &["./c"]);
        let c = visit(&session, "src/c.ts", &[]);

        for module in [&a, &b, &c] {
            session.record(module);
        }
        for module in [&a, &b, &c] {
            assert!(session.check(module).is_empty());
        }
    }

    #[test]
    fn test_two_layer_cycle_is_module_cycle_only() {
        let mut session = session();
        let a = visit(&session, "domain/a.ts", &["../infrastructure/b"]);
        let b = visit(&session, "infrastructure/b.ts", &["../domain/a"]);

        session.record(&a);
        let diagnostics = session.visit(&b);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].cycle_kind, CycleKind::ModuleCycle);
    }

    #[test]
    fn test_two_layer_cycle_reported_with_lower_threshold() {
        let mut session = session().with_min_layer_cycle_length(2);
        let a = visit(&session, "domain/a.ts", &["../infrastructure/b"]);
        let b = visit(&session, "infrastructure/b.ts", &["../domain/c"]);
        let c = visit(&session, "domain/c.ts", &[]);

        for module in [&a, &b, &c] {
            session.record(module);
        }
        let diagnostics = session.check(&b);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].cycle_kind, CycleKind::LayerCycle);
        assert_eq!(diagnostics[0].cycle, vec!["infrastructure", "domain", "infrastructure"]);
    }

    #[test]
    fn test_three_layer_cycle_reported() {
        let mut session = session();
        let a = visit(&session, "domain/a.ts", &["../application/b"]);
        let b = visit(&session, "application/b.ts", &["../infrastructure/c"]);
        let c = visit(&session, "infrastructure/c.ts", &["../domain/d"]);
        let d = visit(&session, "domain/d.ts", &[]);

        for module in [&a, &b, &c, &d] {
            session.record(module);
        }

        let diagnostics = session.check(&a);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].cycle_kind, CycleKind::LayerCycle);
        assert_eq!(
            diagnostics[0].cycle,
            vec!["domain", "application", "infrastructure", "domain"]
        );
        // d is in the domain layer but imports nothing across layers.
        assert!(session.check(&d).is_empty());
    }

    #[test]
    fn test_own_package_reference_resolves_into_root() {
        let mut session = session();
        let a = visit(&session, "src/a.ts", &["@acme/app/src/b"]);
        let b = visit(&session, "src/b.ts", &["./a"]);

        session.record(&a);
        assert_eq!(session.visit(&b).len(), 1);
    }

    #[test]
    fn test_check_before_record_is_empty() {
        let mut session = session();
        let a = visit(&session, "src/a.ts", &["./a"]);
        assert!(session.check(&a).is_empty());
    }

    #[test]
    fn test_summary_over_session_graph() {
        let mut session = session();
        let a = visit(&session, "src/a.ts", &["./b"]);
        let b = visit(&session, "src/b.ts", &["./a"]);
        session.record(&a);
        session.record(&b);

        let result = session.circular_dependencies();
        assert_eq!(result.summary.total_cycles, 1);
        assert_eq!(result.cycles[0].modules, vec!["/proj/src/a", "/proj/src/b"]);
    }

    #[test]
    fn test_summary_counts_recorded_modules_only() {
        let mut session = session();
        let a = visit(&session, "src/a.ts", &["./b", "./c"]);
        session.record(&a);
        session.record(&a);

        assert_eq!(session.graph().node_count(), 3);
        assert_eq!(session.modules_recorded(), 1);
        assert_eq!(session.circular_dependencies().summary.files_analyzed, 1);
    }

    #[test]
    fn test_layers_ignore_directories_above_the_root() {
        let mut session = AnalysisSession::new(
            ReferenceResolver::new("/work/domain/shop", None),
            LayerClassifier::new(&LayerProfile::traditional()),
        );
        let path = |file: &str| Path::new("/work/domain/shop").join(file);
        let visits: Vec<ModuleVisit> = [
            ("src/domain/order.ts", "../application/checkout"),
            ("src/application/checkout.ts", "../infrastructure/gateway"),
            ("src/infrastructure/gateway.ts", "../domain/order"),
        ]
        .into_iter()
        .map(|(file, import)| {
            let path = path(file);
            ModuleVisit {
                module: session.resolver().module_id_for(&path),
                imports: vec![ImportReference::new(import, SourceLocation::new(&path, 1, 1))],
                path,
            }
        })
        .collect();

        for visit in &visits {
            session.record(visit);
        }
        assert_eq!(
            session.graph().layer_of(&visits[1].module),
            Some(&LayerLabel::new("application"))
        );

        let kinds: Vec<CycleKind> = visits
            .iter()
            .flat_map(|visit| session.check(visit))
            .map(|diagnostic| diagnostic.cycle_kind)
            .collect();
        assert_eq!(
            kinds.iter().filter(|kind| **kind == CycleKind::LayerCycle).count(),
            3
        );
    }
}
