//! Statistical derivations over attribute tables

mod composition;

pub use composition::{aggregate_composition, composition, CompositionRow};
