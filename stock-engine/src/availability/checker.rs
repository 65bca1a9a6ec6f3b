//! Availability predicate

use crate::costing::ResolvedRecipe;
use crate::reservation::{ReservationMap, StockLedger};
use rust_decimal::Decimal;
use serde::Serialize;

/// Verdict for adding `quantity` units of a recipe
///
/// A rejection always identifies the limiting ingredient so the UI can
/// say "not enough X", never a generic failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Availability {
    Ok,
    Insufficient {
        ingredient_id: String,
        required: Decimal,
        available: Decimal,
    },
}

impl Availability {
    pub fn is_ok(&self) -> bool {
        matches!(self, Availability::Ok)
    }

    pub fn limiting_ingredient(&self) -> Option<&str> {
        match self {
            Availability::Ok => None,
            Availability::Insufficient { ingredient_id, .. } => Some(ingredient_id),
        }
    }
}

/// Check whether enough unreserved stock exists for `quantity` units
///
/// For each flattened requirement: `required = per_unit * quantity`,
/// `available = on_hand - reserved`. The first failing ingredient in
/// iteration order rejects; any one insufficient ingredient is
/// sufficient cause. An ingredient the ledger does not track rejects as
/// well: a sale the engine cannot verify is never approved.
pub fn check(
    resolved: &ResolvedRecipe,
    quantity: i32,
    ledger: &StockLedger,
    reserved: &ReservationMap,
) -> Availability {
    let quantity = Decimal::from(quantity.max(0));

    for (ingredient, per_unit) in &resolved.flattened {
        let required = *per_unit * quantity;
        let Some(on_hand) = ledger.on_hand(ingredient) else {
            return Availability::Insufficient {
                ingredient_id: ingredient.clone(),
                required,
                available: Decimal::ZERO,
            };
        };
        let claimed = reserved.get(ingredient).copied().unwrap_or(Decimal::ZERO);
        let available = on_hand - claimed;
        if available < required {
            return Availability::Insufficient {
                ingredient_id: ingredient.clone(),
                required,
                available,
            };
        }
    }

    Availability::Ok
}

/// Whole units producible from unreserved stock (UI menu badges)
///
/// Minimum over ingredients of `floor((on_hand - reserved) / per_unit)`.
/// A recipe with an empty bill of materials is unbounded.
pub fn sellable_units(
    resolved: &ResolvedRecipe,
    ledger: &StockLedger,
    reserved: &ReservationMap,
) -> Decimal {
    let mut limit: Option<Decimal> = None;

    for (ingredient, per_unit) in &resolved.flattened {
        if *per_unit <= Decimal::ZERO {
            continue;
        }
        let on_hand = ledger.on_hand(ingredient).unwrap_or(Decimal::ZERO);
        let claimed = reserved.get(ingredient).copied().unwrap_or(Decimal::ZERO);
        let available = (on_hand - claimed).max(Decimal::ZERO);
        let units = (available / *per_unit).floor();
        limit = Some(match limit {
            Some(current) => current.min(units),
            None => units,
        });
    }

    limit.unwrap_or(Decimal::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolved(requirements: &[(&str, i64)]) -> ResolvedRecipe {
        ResolvedRecipe {
            total_cost: Decimal::ZERO,
            flattened: requirements
                .iter()
                .map(|(id, qty)| (id.to_string(), Decimal::from(*qty)))
                .collect(),
        }
    }

    fn ledger(levels: &[(&str, i64)]) -> StockLedger {
        let mut ledger = StockLedger::new();
        for (id, qty) in levels {
            ledger.set_stock(id, Decimal::from(*qty));
        }
        ledger
    }

    fn reservations(claims: &[(&str, i64)]) -> ReservationMap {
        claims
            .iter()
            .map(|(id, qty)| (id.to_string(), Decimal::from(*qty)))
            .collect()
    }

    #[test]
    fn test_exact_equality_approves() {
        let recipe = resolved(&[("ingredient:cheese", 50)]);
        let ledger = ledger(&[("ingredient:cheese", 100)]);
        let reserved = reservations(&[("ingredient:cheese", 50)]);

        // available 50, required 50: boundary must approve
        assert_eq!(check(&recipe, 1, &ledger, &reserved), Availability::Ok);
    }

    #[test]
    fn test_one_unit_short_rejects() {
        let recipe = resolved(&[("ingredient:cheese", 50)]);
        let ledger = ledger(&[("ingredient:cheese", 99)]);
        let reserved = reservations(&[("ingredient:cheese", 50)]);

        let verdict = check(&recipe, 1, &ledger, &reserved);
        assert_eq!(
            verdict,
            Availability::Insufficient {
                ingredient_id: "ingredient:cheese".to_string(),
                required: Decimal::from(50),
                available: Decimal::from(49),
            }
        );
        assert_eq!(verdict.limiting_ingredient(), Some("ingredient:cheese"));
    }

    #[test]
    fn test_untracked_ingredient_fails_closed() {
        let recipe = resolved(&[("ingredient:ghost", 1)]);
        let ledger = ledger(&[]);

        let verdict = check(&recipe, 1, &ledger, &ReservationMap::new());
        assert_eq!(verdict.limiting_ingredient(), Some("ingredient:ghost"));
    }

    #[test]
    fn test_empty_bom_always_satisfiable() {
        let recipe = resolved(&[]);
        let ledger = ledger(&[]);
        assert!(check(&recipe, 1000, &ledger, &ReservationMap::new()).is_ok());
    }

    #[test]
    fn test_zero_quantity_is_trivially_ok() {
        let recipe = resolved(&[("ingredient:cheese", 50)]);
        let ledger = ledger(&[("ingredient:cheese", 0)]);
        assert!(check(&recipe, 0, &ledger, &ReservationMap::new()).is_ok());
    }

    #[test]
    fn test_sellable_units_floor_over_ingredients() {
        let recipe = resolved(&[("ingredient:cheese", 50), ("ingredient:bun", 2)]);
        let ledger = ledger(&[("ingredient:cheese", 500), ("ingredient:bun", 7)]);
        let reserved = reservations(&[("ingredient:cheese", 100)]);

        // cheese allows floor(400/50) = 8, buns allow floor(7/2) = 3
        let units = sellable_units(&recipe, &ledger, &reserved);
        assert_eq!(units, Decimal::from(3));
    }

    #[test]
    fn test_sellable_units_unbounded_for_empty_bom() {
        let recipe = resolved(&[]);
        let ledger = ledger(&[]);
        assert_eq!(
            sellable_units(&recipe, &ledger, &ReservationMap::new()),
            Decimal::MAX
        );
    }

    #[test]
    fn test_sellable_units_untracked_ingredient_means_zero() {
        let recipe = resolved(&[("ingredient:ghost", 5)]);
        let ledger = ledger(&[]);
        assert_eq!(
            sellable_units(&recipe, &ledger, &ReservationMap::new()),
            Decimal::ZERO
        );
    }
}
