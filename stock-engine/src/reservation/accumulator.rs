//! Reservation accumulation
//!
//! Sums, per ingredient, how much stock is already claimed by items
//! committed to open kitchen orders and by lines sitting unsent in the
//! active cart. Reads the already-flattened requirement maps, so nested
//! sub-recipes are never double-counted.

use crate::costing::CostEngine;
use rust_decimal::Decimal;
use shared::order::{CartItem, OrderItem};
use std::collections::{HashMap, HashSet};

/// Per-ingredient reserved quantities
pub type ReservationMap = HashMap<String, Decimal>;

/// Recompute the full reservation map from the current open order items
/// and the active cart
///
/// Order items whose status no longer reserves stock are skipped, and
/// station-split rows sharing a `group_id` count once per logical dish.
/// Recipes that fail to resolve (cycle, missing row) contribute nothing;
/// the failure is logged and the rest of the map stays usable.
pub fn accumulate(
    cost: &CostEngine,
    order_items: &[OrderItem],
    cart_items: &[CartItem],
) -> ReservationMap {
    let mut reserved = ReservationMap::new();

    for item in dedupe_station_rows(order_items) {
        add_claim(cost, &mut reserved, &item.recipe, item.quantity);
    }
    for line in cart_items {
        add_claim(cost, &mut reserved, &line.recipe, line.quantity);
    }

    reserved
}

/// Reserved quantity for one ingredient (diagnostics / UI stock badges)
pub fn reserved_for(
    cost: &CostEngine,
    order_items: &[OrderItem],
    cart_items: &[CartItem],
    ingredient_id: &str,
) -> Decimal {
    accumulate(cost, order_items, cart_items)
        .get(ingredient_id)
        .copied()
        .unwrap_or(Decimal::ZERO)
}

/// Collapse station-split rows to one representative per group id
///
/// Rows in a group represent the same logical dish (same recipe, same
/// quantity) routed to different preparation stations. Rows without a
/// group id count individually. Cancelled rows never represent a group.
fn dedupe_station_rows(items: &[OrderItem]) -> Vec<&OrderItem> {
    let mut seen_groups: HashSet<&str> = HashSet::new();
    let mut representatives = Vec::new();

    for item in items {
        if !item.status.reserves_stock() {
            continue;
        }
        match item.group_id.as_deref() {
            Some(group) => {
                if seen_groups.insert(group) {
                    representatives.push(item);
                }
            }
            None => representatives.push(item),
        }
    }

    representatives
}

fn add_claim(cost: &CostEngine, reserved: &mut ReservationMap, recipe_id: &str, quantity: i32) {
    if quantity <= 0 {
        return;
    }
    let resolved = match cost.resolve(recipe_id) {
        Ok(resolved) => resolved,
        Err(err) => {
            tracing::warn!(
                recipe = %recipe_id,
                error = %err,
                "Skipping unresolvable recipe in reservation accumulation"
            );
            return;
        }
    };

    let quantity = Decimal::from(quantity);
    for (ingredient, per_unit) in &resolved.flattened {
        *reserved.entry(ingredient.clone()).or_insert(Decimal::ZERO) += *per_unit * quantity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::CompositionGraph;
    use crate::diagnostics::IssueSink;
    use chrono::Utc;
    use shared::models::{Ingredient, Recipe, RecipeIngredient, RecipeSubRecipe, UnitOfMeasure};
    use shared::order::OrderItemStatus;
    use std::sync::Arc;

    fn cost_engine() -> CostEngine {
        let issues = IssueSink::new();
        let graph = CompositionGraph::from_rows(
            vec![Ingredient {
                id: Some("ingredient:cheese".to_string()),
                name: "Cheese".to_string(),
                unit: UnitOfMeasure::Gram,
                stock: Decimal::from(100),
                cost: Decimal::new(2, 2),
                is_active: true,
            }],
            vec![
                Recipe {
                    id: Some("recipe:burger".to_string()),
                    name: "Burger".to_string(),
                    price: Decimal::from(8),
                    is_sub_recipe: false,
                    is_available: true,
                },
                Recipe {
                    id: Some("recipe:double_burger".to_string()),
                    name: "Double Burger".to_string(),
                    price: Decimal::from(14),
                    is_sub_recipe: false,
                    is_available: true,
                },
            ],
            vec![RecipeIngredient {
                recipe: "recipe:burger".to_string(),
                ingredient: "ingredient:cheese".to_string(),
                quantity: Decimal::from(50),
            }],
            vec![RecipeSubRecipe {
                parent: "recipe:double_burger".to_string(),
                child: "recipe:burger".to_string(),
                quantity: Decimal::from(2),
            }],
            &issues,
        );
        CostEngine::new(Arc::new(graph), issues)
    }

    fn order_item(id: &str, recipe: &str, quantity: i32, group: Option<&str>) -> OrderItem {
        OrderItem {
            id: id.to_string(),
            order_id: "order:1".to_string(),
            recipe: recipe.to_string(),
            quantity,
            status: OrderItemStatus::Pending,
            group_id: group.map(str::to_string),
            note: None,
            created_at: Utc::now(),
        }
    }

    fn cart_item(line: &str, recipe: &str, quantity: i32) -> CartItem {
        CartItem {
            line_id: line.to_string(),
            recipe: recipe.to_string(),
            quantity,
            note: None,
        }
    }

    #[test]
    fn test_orders_and_cart_stack() {
        let cost = cost_engine();
        let orders = vec![order_item("item:1", "recipe:burger", 2, None)];
        let cart = vec![cart_item("line:1", "recipe:burger", 1)];

        let reserved = accumulate(&cost, &orders, &cart);
        // 2 × 50g committed + 1 × 50g in cart
        assert_eq!(reserved["ingredient:cheese"], Decimal::from(150));
    }

    #[test]
    fn test_sub_recipes_read_flattened_not_raw_edges() {
        let cost = cost_engine();
        let orders = vec![order_item("item:1", "recipe:double_burger", 1, None)];

        let reserved = accumulate(&cost, &orders, &[]);
        assert_eq!(reserved["ingredient:cheese"], Decimal::from(100));
    }

    #[test]
    fn test_station_split_rows_count_once() {
        let cost = cost_engine();
        // one logical dish split across grill and cold stations
        let orders = vec![
            order_item("item:1", "recipe:burger", 2, Some("group:a")),
            order_item("item:2", "recipe:burger", 2, Some("group:a")),
            order_item("item:3", "recipe:burger", 1, None),
        ];

        let reserved = accumulate(&cost, &orders, &[]);
        // group:a once (100g) + ungrouped row (50g)
        assert_eq!(reserved["ingredient:cheese"], Decimal::from(150));
    }

    #[test]
    fn test_cancelled_items_release_weight() {
        let cost = cost_engine();
        let mut orders = vec![
            order_item("item:1", "recipe:burger", 1, None),
            order_item("item:2", "recipe:burger", 1, None),
        ];

        let before = reserved_for(&cost, &orders, &[], "ingredient:cheese");
        assert_eq!(before, Decimal::from(100));

        orders[1].status = OrderItemStatus::Cancelled;
        let after = reserved_for(&cost, &orders, &[], "ingredient:cheese");
        assert_eq!(after, Decimal::from(50));
    }

    #[test]
    fn test_unresolvable_recipe_contributes_nothing() {
        let cost = cost_engine();
        let orders = vec![
            order_item("item:1", "recipe:ghost", 3, None),
            order_item("item:2", "recipe:burger", 1, None),
        ];

        let reserved = accumulate(&cost, &orders, &[]);
        assert_eq!(reserved["ingredient:cheese"], Decimal::from(50));
        assert_eq!(reserved.len(), 1);
    }

    #[test]
    fn test_non_positive_quantities_ignored() {
        let cost = cost_engine();
        let cart = vec![
            cart_item("line:1", "recipe:burger", 0),
            cart_item("line:2", "recipe:burger", -2),
        ];
        assert!(accumulate(&cost, &[], &cart).is_empty());
    }
}
