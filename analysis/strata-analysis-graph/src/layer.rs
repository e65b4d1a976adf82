//! Projection of the module graph onto architectural layers.

use crate::cycle;
use crate::dependency::DependencyGraph;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use strata_analysis_common::LayerLabel;

/// Directed graph whose nodes are layer labels.
///
/// An edge `L1 -> L2` exists when at least one module in `L1` imports a module
/// in `L2` and the two labels differ. Unclassified modules and same-layer
/// imports contribute nothing.
#[derive(Debug, Default)]
pub struct LayerGraph {
    graph: DiGraph<LayerLabel, ()>,
    nodes: HashMap<LayerLabel, NodeIndex>,
}

impl LayerGraph {
    /// Collapses `modules` by layer label.
    pub fn project(modules: &DependencyGraph) -> Self {
        let mut layers = Self::default();
        for (from, to) in modules.edges() {
            if let (Some(from_layer), Some(to_layer)) = (&from.layer, &to.layer) {
                if from_layer != to_layer {
                    layers.add_edge(from_layer, to_layer);
                }
            }
        }
        layers
    }

    fn add_layer(&mut self, label: &LayerLabel) -> NodeIndex {
        if let Some(&existing) = self.nodes.get(label) {
            return existing;
        }
        let node = self.graph.add_node(label.clone());
        self.nodes.insert(label.clone(), node);
        node
    }

    fn add_edge(&mut self, from: &LayerLabel, to: &LayerLabel) {
        let from = self.add_layer(from);
        let to = self.add_layer(to);
        self.graph.update_edge(from, to, ());
    }

    pub fn contains_edge(&self, from: &LayerLabel, to: &LayerLabel) -> bool {
        match (self.nodes.get(from), self.nodes.get(to)) {
            (Some(&from), Some(&to)) => self.graph.contains_edge(from, to),
            _ => false,
        }
    }

    /// Layers directly depended on by `label`, in discovery order.
    pub fn edges_from(&self, label: &LayerLabel) -> Vec<&LayerLabel> {
        match self.nodes.get(label) {
            Some(&node) => self
                .successors(node)
                .map(|target| &self.graph[target])
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Finds a layer cycle reachable from `start`, using the same search as
    /// the module graph.
    pub fn find_cycle(&self, start: &LayerLabel) -> Option<Vec<LayerLabel>> {
        let &start = self.nodes.get(start)?;
        cycle::find_cycle(start, |node| self.successors(node)).map(|nodes| {
            nodes
                .into_iter()
                .map(|node| self.graph[node].clone())
                .collect()
        })
    }

    /// Finds a layer cycle that passes through `start`.
    pub fn find_cycle_through(&self, start: &LayerLabel) -> Option<Vec<LayerLabel>> {
        let &start = self.nodes.get(start)?;
        cycle::find_cycle_through(start, |node| self.successors(node)).map(|nodes| {
            nodes
                .into_iter()
                .map(|node| self.graph[node].clone())
                .collect()
        })
    }

    fn successors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> {
        let mut targets: Vec<NodeIndex> = self.graph.neighbors(node).collect();
        targets.reverse();
        targets.into_iter()
    }
}

/// Number of distinct layers on a cycle given in closed form (`[a, b, a]`).
pub fn distinct_layers(cycle: &[LayerLabel]) -> usize {
    let mut seen: Vec<&LayerLabel> = Vec::new();
    for label in cycle {
        if !seen.contains(&label) {
            seen.push(label);
        }
    }
    seen.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strata_analysis_common::ModuleId;

    fn id(path: &str) -> ModuleId {
        ModuleId::new(path)
    }

    fn label(name: &str) -> LayerLabel {
        LayerLabel::new(name)
    }

    #[test]
    fn test_projection_of_two_layer_round_trip() {
        let mut modules = DependencyGraph::default();
        modules.add_edge(&id("/p/domain/a"), &id("/p/infrastructure/b"));
        modules.add_edge(&id("/p/infrastructure/b"), &id("/p/domain/c"));

        let layers = LayerGraph::project(&modules);
        assert!(layers.contains_edge(&label("domain"), &label("infrastructure")));
        assert!(layers.contains_edge(&label("infrastructure"), &label("domain")));
        assert_eq!(layers.edge_count(), 2);

        let cycle = layers.find_cycle(&label("domain")).unwrap();
        assert_eq!(
            cycle,
            vec![label("domain"), label("infrastructure"), label("domain")]
        );
        assert_eq!(distinct_layers(&cycle), 2);
    }

    #[test]
    fn test_projection_drops_same_layer_and_unclassified_edges() {
        let mut modules = DependencyGraph::default();
        modules.add_edge(&id("/p/domain/a"), &id("/p/domain/b"));
        modules.add_edge(&id("/p/domain/a"), &id("/p/shared/util"));
        modules.add_edge(&id("/p/shared/util"), &id("/p/infrastructure/db"));

        let layers = LayerGraph::project(&modules);
        assert_eq!(layers.edge_count(), 0);
        assert_eq!(layers.find_cycle(&label("domain")), None);
    }

    #[test]
    fn test_three_layer_cycle() {
        let mut modules = DependencyGraph::default();
        modules.add_edge(&id("/p/domain/a"), &id("/p/application/b"));
        modules.add_edge(&id("/p/application/b"), &id("/p/infrastructure/c"));
        modules.add_edge(&id("/p/infrastructure/c"), &id("/p/domain/d"));

        let layers = LayerGraph::project(&modules);
        let cycle = layers.find_cycle(&label("domain")).unwrap();
        assert_eq!(
            cycle,
            vec![
                label("domain"),
                label("application"),
                label("infrastructure"),
                label("domain")
            ]
        );
        assert_eq!(distinct_layers(&cycle), 3);
    }

    #[test]
    fn test_cycle_through_skips_unrelated_cycle() {
        // presentation reaches the domain <-> infrastructure cycle but is not on it.
        let mut modules = DependencyGraph::default();
        modules.add_edge(&id("/p/presentation/view"), &id("/p/domain/a"));
        modules.add_edge(&id("/p/domain/a"), &id("/p/infrastructure/b"));
        modules.add_edge(&id("/p/infrastructure/b"), &id("/p/domain/a"));

        let layers = LayerGraph::project(&modules);
        assert_eq!(
            layers.find_cycle(&label("presentation")),
            Some(vec![label("domain"), label("infrastructure"), label("domain")])
        );
        assert_eq!(layers.find_cycle_through(&label("presentation")), None);
        assert_eq!(
            layers.find_cycle_through(&label("infrastructure")),
            Some(vec![label("infrastructure"), label("domain"), label("infrastructure")])
        );
    }

    #[test]
    fn test_parallel_module_edges_collapse() {
        let mut modules = DependencyGraph::default();
        modules.add_edge(&id("/p/domain/a"), &id("/p/application/x"));
        modules.add_edge(&id("/p/domain/b"), &id("/p/application/y"));

        let layers = LayerGraph::project(&modules);
        assert_eq!(layers.edge_count(), 1);
        assert_eq!(
            layers.edges_from(&label("domain")),
            vec![&label("application")]
        );
    }
}
