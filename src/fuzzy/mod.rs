// File: src/fuzzy/mod.rs
//! Substitution costs, stretch windows and transition costs.

pub mod cost;
pub mod transition;
pub mod window;

pub use cost::{CostModel, Thresholds, ONSET_CODA_COST};
pub use transition::TransitionCost;
pub use window::WindowFinder;
