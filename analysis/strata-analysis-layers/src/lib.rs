//! Maps canonical module identifiers onto architectural layers.
//!
//! A [`LayerProfile`] is an ordered list of `(substring, label)` rules. The
//! [`LayerClassifier`] built from it assigns each module the label of the first
//! rule whose pattern occurs in the module's identifier, or no label at all.
//!
//! Several built-in profiles ship with the crate (traditional four-layer,
//! hexagonal, onion); a fully custom rule list can be supplied instead.

pub mod classifier;
pub mod profile;

pub use classifier::LayerClassifier;
pub use profile::{LayerProfile, LayerRule, ProfileKind};
