//! Recipe Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Recipe entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Option<String>,
    pub name: String,
    /// Unit sale price in currency unit
    pub price: Decimal,
    /// Intermediate preparation, used as a component and never sold directly
    pub is_sub_recipe: bool,
    pub is_available: bool,
}

/// Direct ingredient line of a recipe (many-to-many edge)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// Recipe reference (String ID)
    pub recipe: String,
    /// Ingredient reference (String ID)
    pub ingredient: String,
    /// Quantity consumed per unit of recipe, in the ingredient's unit
    pub quantity: Decimal,
}

/// Nested sub-recipe line of a recipe
///
/// Forms a directed graph over recipes. Intended to be acyclic; the
/// cost engine detects cycles at resolve time rather than at write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSubRecipe {
    /// Parent recipe reference (String ID)
    pub parent: String,
    /// Child recipe reference (String ID)
    pub child: String,
    /// Units of child consumed per unit of parent
    pub quantity: Decimal,
}
