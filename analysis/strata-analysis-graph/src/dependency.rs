//! A module-level dependency graph.
//!
//! This data structure represents the "imports" relationships between the
//! modules of one analysis session. It only grows: edges and nodes are added
//! as modules are visited and are never removed. A new session starts from a
//! fresh, empty graph.

use crate::cycle;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use strata_analysis_common::{LayerLabel, ModuleId};
use strata_analysis_layers::LayerClassifier;
use tracing::trace;

/// A unique identifier for a node in the dependency graph.
pub type NodeId = NodeIndex;

/// Represents a single module of the analyzed codebase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNode {
    /// Canonical module identifier.
    pub id: ModuleId,
    /// Layer assigned when the module was first seen; `None` if unclassified.
    pub layer: Option<LayerLabel>,
}

/// The session-scoped module dependency graph.
///
/// `add_edge` is the only mutation entry point. Layer labels are computed by
/// the session's [`LayerClassifier`] the first time a module enters the graph
/// and cached on the node from then on.
#[derive(Debug)]
pub struct DependencyGraph {
    graph: DiGraph<ModuleNode, ()>,
    /// Lookup from module identifier to node index.
    nodes: HashMap<ModuleId, NodeId>,
    classifier: LayerClassifier,
}

impl DependencyGraph {
    /// Creates a new, empty dependency graph.
    pub fn new(classifier: LayerClassifier) -> Self {
        Self {
            graph: DiGraph::new(),
            nodes: HashMap::new(),
            classifier,
        }
    }

    /// Read-only view of the underlying petgraph graph.
    pub fn inner(&self) -> &DiGraph<ModuleNode, ()> {
        &self.graph
    }

    /// Node for `id`, classified and inserted on first sight.
    fn insert_node(&mut self, id: &ModuleId) -> NodeId {
        if let Some(&existing) = self.nodes.get(id) {
            return existing;
        }
        let layer = self.classifier.classify(id);
        let node = self.graph.add_node(ModuleNode {
            id: id.clone(),
            layer,
        });
        self.nodes.insert(id.clone(), node);
        node
    }

    /// Records that `from` imports `to`.
    ///
    /// Idempotent: adding an edge that already exists changes nothing.
    /// Returns `true` when the edge is new.
    pub fn add_edge(&mut self, from: &ModuleId, to: &ModuleId) -> bool {
        let from_id = self.insert_node(from);
        let to_id = self.insert_node(to);

        if self.graph.find_edge(from_id, to_id).is_some() {
            return false;
        }

        self.graph.add_edge(from_id, to_id, ());
        trace!(from = %from, to = %to, "Added dependency edge");
        true
    }

    /// Finds a module by its identifier.
    pub fn find_node(&self, id: &ModuleId) -> Option<NodeId> {
        self.nodes.get(id).copied()
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn module(&self, node: NodeId) -> &ModuleNode {
        &self.graph[node]
    }

    /// Cached layer of `id`; `None` for unknown or unclassified modules.
    pub fn layer_of(&self, id: &ModuleId) -> Option<&LayerLabel> {
        self.find_node(id)
            .and_then(|node| self.graph[node].layer.as_ref())
    }

    /// Direct dependencies of `id`, in the order the edges were added.
    pub fn edges_from(&self, id: &ModuleId) -> Vec<&ModuleId> {
        match self.find_node(id) {
            Some(node) => self
                .successors(node)
                .map(|target| &self.graph[target].id)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Every module seen so far, in insertion order.
    pub fn all_nodes(&self) -> impl Iterator<Item = &ModuleId> + '_ {
        self.graph.node_weights().map(|node| &node.id)
    }

    /// Every edge as `(from, to)`, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&ModuleNode, &ModuleNode)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (&self.graph[edge.source()], &self.graph[edge.target()]))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Outgoing neighbors in insertion order.
    ///
    /// petgraph iterates a node's adjacency list newest-first.
    pub(crate) fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        let mut targets: Vec<NodeId> = self.graph.neighbors(node).collect();
        targets.reverse();
        targets.into_iter()
    }

    /// Finds a cycle reachable from `start` (see [`cycle::find_cycle`]).
    pub fn find_cycle(&self, start: &ModuleId) -> Option<Vec<ModuleId>> {
        let start = self.find_node(start)?;
        cycle::find_cycle(start, |node| self.successors(node)).map(|nodes| self.ids(&nodes))
    }

    /// Finds a cycle that passes through `start` (see [`cycle::find_cycle_through`]).
    pub fn find_cycle_through(&self, start: &ModuleId) -> Option<Vec<ModuleId>> {
        let start = self.find_node(start)?;
        cycle::find_cycle_through(start, |node| self.successors(node))
            .map(|nodes| self.ids(&nodes))
    }

    fn ids(&self, nodes: &[NodeId]) -> Vec<ModuleId> {
        nodes.iter().map(|&node| self.graph[node].id.clone()).collect()
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new(LayerClassifier::default())
    }
}
