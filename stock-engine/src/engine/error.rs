use shared::order::InvalidTransition;
use thiserror::Error;

/// Engine errors
///
/// Recoverable inconsistencies (dangling edges) never surface here; they
/// are absorbed into the diagnostics sink. These variants are the truly
/// exceptional conditions plus the fail-closed lookups of the public API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    #[error("Ingredient not found: {0}")]
    IngredientNotFound(String),

    #[error("Order item not found: {0}")]
    ItemNotFound(String),

    #[error("Cart line not found: {0}")]
    CartLineNotFound(String),

    #[error("Composition cycle detected: {}", path.join(" -> "))]
    CompositionCycle { path: Vec<String> },

    #[error("Recipe is an intermediate preparation, not sold directly: {0}")]
    RecipeNotSellable(String),

    #[error("Recipe is currently unavailable: {0}")]
    RecipeUnavailable(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i32),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
}

pub type EngineResult<T> = Result<T, EngineError>;
