// analysis/strata-analysis-common/src/lib.rs

//! Types shared by every strata analysis crate.
//!
//! The engine crates only ever exchange the values defined here: canonical
//! module identifiers, layer labels, source locations, raw import references
//! produced by a front end, and the diagnostics handed back to the host.

pub mod error;
pub mod traits;
pub mod types;

pub use error::AnalysisError;
pub use traits::ImportExtractor;
pub use types::{
    CycleKind, Diagnostic, ImportReference, LayerLabel, ModuleId, ModuleVisit, SourceLocation,
};
