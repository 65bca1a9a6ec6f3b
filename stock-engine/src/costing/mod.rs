//! Recipe costing
//!
//! Recursive resolution of per-recipe cost and flattened bill of
//! materials, memoized across the recipe set so shared sub-recipes are
//! expanded once per snapshot instead of exponentially.

mod engine;

pub use engine::{CostEngine, ResolvedRecipe};
