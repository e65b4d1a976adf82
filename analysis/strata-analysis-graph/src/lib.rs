//! Graph data structures for architectural dependency analysis.
//!
//! - [`dependency`] holds the session-scoped module graph. Edges are only ever
//!   added, and every module is classified into a layer exactly once.
//! - [`cycle`] is a depth-first cycle search shared by both granularities.
//! - [`layer`] projects the module graph onto layer labels.

pub mod cycle;
pub mod dependency;
pub mod layer;

pub use cycle::{find_cycle, find_cycle_through};
pub use dependency::{DependencyGraph, ModuleNode, NodeId};
pub use layer::{distinct_layers, LayerGraph};
