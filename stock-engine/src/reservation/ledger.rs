//! StockLedger - on-hand quantities per ingredient

use crate::diagnostics::{CompositionIssue, IssueKind, IssueSink};
use rust_decimal::Decimal;
use shared::models::Ingredient;
use std::collections::HashMap;

/// Current on-hand stock per ingredient
///
/// Seeded from catalog rows on every snapshot load, then mutated only by
/// the external inventory collaborator. Stock changes never touch the
/// cost memo; on-hand quantity does not participate in costing.
#[derive(Debug, Clone, Default)]
pub struct StockLedger {
    on_hand: HashMap<String, Decimal>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the ledger from pushed ingredient rows
    pub fn from_ingredients<'a>(rows: impl IntoIterator<Item = &'a Ingredient>) -> Self {
        let mut ledger = Self::new();
        for ing in rows {
            if let Some(id) = &ing.id {
                ledger.on_hand.insert(id.clone(), ing.stock.max(Decimal::ZERO));
            }
        }
        ledger
    }

    /// On-hand quantity, `None` for untracked ingredients
    pub fn on_hand(&self, ingredient_id: &str) -> Option<Decimal> {
        self.on_hand.get(ingredient_id).copied()
    }

    pub fn is_tracked(&self, ingredient_id: &str) -> bool {
        self.on_hand.contains_key(ingredient_id)
    }

    /// Absolute stock level push (stocktake)
    pub fn set_stock(&mut self, ingredient_id: &str, quantity: Decimal) {
        self.on_hand
            .insert(ingredient_id.to_string(), quantity.max(Decimal::ZERO));
    }

    /// Relative stock movement; on-hand never goes below zero
    ///
    /// Returns the new on-hand quantity. A movement that would drive the
    /// level negative is floored at zero and reported.
    pub fn apply_delta(
        &mut self,
        ingredient_id: &str,
        delta: Decimal,
        issues: &IssueSink,
    ) -> Decimal {
        let current = self.on_hand(ingredient_id).unwrap_or(Decimal::ZERO);
        let next = current + delta;
        let floored = next.max(Decimal::ZERO);
        if next < Decimal::ZERO {
            tracing::warn!(
                ingredient = %ingredient_id,
                %current,
                %delta,
                "Stock movement floored at zero"
            );
            issues.push(
                CompositionIssue::new(IssueKind::StockFloored, ingredient_id)
                    .with_param("current", current.to_string())
                    .with_param("delta", delta.to_string()),
            );
        }
        self.on_hand.insert(ingredient_id.to_string(), floored);
        floored
    }

    pub fn len(&self) -> usize {
        self.on_hand.len()
    }

    pub fn is_empty(&self) -> bool {
        self.on_hand.is_empty()
    }
}
