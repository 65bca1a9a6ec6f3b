//! Composition graph
//!
//! Read-only adjacency view over the two edge types of the catalog:
//! Recipe→Ingredient (direct quantity per unit) and Recipe→Recipe
//! (sub-recipe quantity per unit).

mod graph;

pub use graph::{CompositionGraph, IngredientEdge, SubRecipeEdge};
