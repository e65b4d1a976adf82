//! Whole-graph circular dependency summary.
//!
//! Per-visit checks answer "is this module on a cycle?". This module answers
//! "which cycles exist at all?" with a single Tarjan pass over the graph.

use petgraph::algo::tarjan_scc;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;
use strata_analysis_graph::{DependencyGraph, NodeId};

/// The primary output of the circular dependency analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircularDependenciesResult {
    pub cycles: Vec<Cycle>,
    pub summary: Summary,
}

/// A strongly connected group of modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    pub id: usize,
    pub modules: Vec<String>,
    pub import_chain: Vec<ImportLink>,
}

/// Represents a single link in the import chain of a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportLink {
    pub from: String,
    pub to: String,
}

/// A summary of the analysis results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_cycles: usize,
    pub total_modules_in_cycles: usize,
    pub largest_cycle_size: usize,
    pub files_analyzed: usize,
    pub analysis_time_ms: u64,
}

/// Finds every group of mutually dependent modules in `graph`.
///
/// `files_analyzed` is the number of modules the caller visited; the graph
/// also holds modules that were only imported. Groups smaller than `min_size`
/// (default 1) are skipped. A single module only forms a group when it
/// imports itself.
pub fn find_circular_dependencies(
    graph: &DependencyGraph,
    files_analyzed: usize,
    min_size: Option<usize>,
) -> CircularDependenciesResult {
    let start = Instant::now();
    let min_cycle_size = min_size.unwrap_or(1);

    let modules = graph.inner();
    let mut cycles_nodes: Vec<Vec<NodeId>> = tarjan_scc(modules)
        .into_iter()
        .filter(|scc| scc.len() >= min_cycle_size)
        .filter(|scc| scc.len() > 1 || modules.contains_edge(scc[0], scc[0]))
        .collect();
    // Tarjan emits components in reverse topological order; report them by
    // first appearance instead.
    for scc in &mut cycles_nodes {
        scc.sort();
    }
    cycles_nodes.sort();

    let mut cycles = Vec::new();
    let mut total_modules_in_cycles = 0;
    let mut largest_cycle_size = 0;

    for (i, scc) in cycles_nodes.iter().enumerate() {
        let cycle_nodes: HashSet<NodeId> = scc.iter().copied().collect();
        let modules: Vec<String> = scc
            .iter()
            .map(|&node| graph.module(node).id.to_string())
            .collect();

        total_modules_in_cycles += modules.len();
        largest_cycle_size = largest_cycle_size.max(modules.len());

        cycles.push(Cycle {
            id: i + 1,
            modules,
            import_chain: build_import_chain(graph, scc, &cycle_nodes),
        });
    }

    CircularDependenciesResult {
        summary: Summary {
            total_cycles: cycles.len(),
            total_modules_in_cycles,
            largest_cycle_size,
            files_analyzed,
            analysis_time_ms: start.elapsed().as_millis() as u64,
        },
        cycles,
    }
}

/// Walks edges inside the component from its first node until it returns to
/// an already visited node.
pub(crate) fn build_import_chain(
    graph: &DependencyGraph,
    scc: &[NodeId],
    cycle_nodes: &HashSet<NodeId>,
) -> Vec<ImportLink> {
    let Some(&start_node) = scc.first() else {
        return vec![];
    };

    let mut chain = Vec::new();
    let mut current_node = start_node;
    let mut visited = HashSet::new();

    loop {
        visited.insert(current_node);

        // Find an edge from the current node to another node within the same cycle.
        let Some(edge) = graph
            .inner()
            .edges(current_node)
            .find(|edge| cycle_nodes.contains(&edge.target()))
        else {
            break;
        };

        let target_node = edge.target();
        chain.push(ImportLink {
            from: graph.module(current_node).id.to_string(),
            to: graph.module(target_node).id.to_string(),
        });

        current_node = target_node;
        if visited.contains(&current_node) {
            break;
        }
    }

    chain
}
