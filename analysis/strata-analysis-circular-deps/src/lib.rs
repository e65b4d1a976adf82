//! Detects dependency cycles between modules and between architectural layers.
//!
//! The host feeds an [`AnalysisSession`] one [`ModuleVisit`] per module. The
//! session resolves each import with a [`ReferenceResolver`], grows its
//! [`DependencyGraph`], and reports the cycles the visited module lies on as
//! [`Diagnostic`]s. [`ProjectAnalyzer`] does the same for a whole directory,
//! and [`find_circular_dependencies`] summarizes every cycle in a graph.
//!
//! [`ModuleVisit`]: strata_analysis_common::ModuleVisit
//! [`DependencyGraph`]: strata_analysis_graph::DependencyGraph
//! [`Diagnostic`]: strata_analysis_common::Diagnostic

pub mod builder;
pub mod diagnostic;
pub mod resolver;
pub mod session;
pub mod summary;

pub use builder::{ProjectAnalyzer, ProjectReport};
pub use diagnostic::{DiagnosticEmitter, ResolvedImport};
pub use resolver::{ReferenceResolver, Resolution, DEFAULT_EXTENSIONS};
pub use session::{AnalysisSession, DEFAULT_MIN_LAYER_CYCLE_LENGTH};
pub use summary::{find_circular_dependencies, CircularDependenciesResult, Cycle, ImportLink, Summary};
