//! Ingredient Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unit of measure for ingredient stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitOfMeasure {
    #[default]
    Gram,
    Kilogram,
    Milliliter,
    Liter,
    /// Countable unit (eggs, buns, bottles)
    Piece,
}

impl std::fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            UnitOfMeasure::Gram => "g",
            UnitOfMeasure::Kilogram => "kg",
            UnitOfMeasure::Milliliter => "ml",
            UnitOfMeasure::Liter => "l",
            UnitOfMeasure::Piece => "pc",
        };
        write!(f, "{}", symbol)
    }
}

/// Ingredient entity
///
/// Stock and cost are both expressed per `unit`. Mutated only by the
/// external inventory collaborator; the engine treats rows as read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Option<String>,
    pub name: String,
    pub unit: UnitOfMeasure,
    /// On-hand stock quantity (non-negative)
    pub stock: Decimal,
    /// Cost per unit of measure
    pub cost: Decimal,
    pub is_active: bool,
}

/// Inventory movement reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementReason {
    Purchase,
    Waste,
    Adjustment,
    /// Physical deduction after a finalized sale
    SaleDeduction,
}

/// Stock movement pushed by the inventory collaborator
///
/// `delta` is signed: positive for goods in, negative for goods out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    /// Ingredient reference (String ID)
    pub ingredient: String,
    pub delta: Decimal,
    pub reason: MovementReason,
    pub note: Option<String>,
}
