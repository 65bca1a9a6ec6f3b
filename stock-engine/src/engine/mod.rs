//! StockEngine - costing and reservation facade
//!
//! This module handles:
//! - Catalog snapshot ingestion (rebuild graph + cost engine, reseed ledger)
//! - Stock movements pushed by the inventory collaborator
//! - Open order items and the active cart (reservation sources)
//! - The query surface exposed to UI/cart collaborators
//!
//! # Query Flow
//!
//! ```text
//! can_add(recipe, qty)
//!     ├─ 1. Resolve recipe (memoized cost + flattened BOM)
//!     ├─ 2. Accumulate reservations (open orders, grouped; active cart)
//!     ├─ 3. Compare required vs on-hand minus reserved, per ingredient
//!     └─ 4. Ok, or Insufficient with the limiting ingredient
//! ```
//!
//! All methods are synchronous; mutation and query within one client
//! cannot interleave, so a `can_add` followed by the actual cart/order
//! mutation is read-consistent. Across terminals the check is only
//! optimistic; the authoritative check runs at commit time in the
//! persistence collaborator.

mod error;
mod versions;

pub use error::*;
pub use versions::{ResourceVersions, RES_CART, RES_CATALOG, RES_ORDERS, RES_STOCK};

#[cfg(test)]
mod tests;

use crate::availability::{self, Availability};
use crate::composition::CompositionGraph;
use crate::costing::CostEngine;
use crate::diagnostics::{CompositionIssue, IssueSink};
use crate::reservation::{accumulate, ReservationMap, StockLedger};
use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{Ingredient, Recipe, RecipeIngredient, RecipeSubRecipe, StockMovement};
use shared::order::{CartItem, OrderItem, OrderItemStatus};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Change notifications fanned out to subscribers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineEvent {
    CatalogReloaded { epoch: String },
    StockChanged { ingredient_id: String },
    OrdersChanged,
    CartChanged,
}

/// Costing and stock reservation engine
///
/// Owns the in-memory snapshot the whole engine computes against:
/// composition graph + cost memo, stock ledger, open order items and the
/// active cart. Cloning shares all internals (`Arc`), so collaborators
/// can each hold a handle.
#[derive(Clone)]
pub struct StockEngine {
    /// Cost engine bound to the current graph snapshot; swapped wholesale
    /// on catalog reload, which is what invalidates the memo
    cost: Arc<RwLock<Arc<CostEngine>>>,
    ledger: Arc<RwLock<StockLedger>>,
    /// Items of all currently open, uncompleted orders
    open_items: Arc<RwLock<Vec<OrderItem>>>,
    /// Active, not-yet-sent cart
    cart: Arc<RwLock<Vec<CartItem>>>,
    issues: IssueSink,
    versions: Arc<ResourceVersions>,
    event_tx: broadcast::Sender<EngineEvent>,
}

impl std::fmt::Debug for StockEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cost = self.cost.read();
        f.debug_struct("StockEngine")
            .field("epoch", &cost.graph().epoch())
            .field("recipes", &cost.graph().recipe_count())
            .field("ingredients", &cost.graph().ingredient_count())
            .field("open_items", &self.open_items.read().len())
            .field("cart_lines", &self.cart.read().len())
            .finish()
    }
}

impl Default for StockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StockEngine {
    /// Create an engine with an empty snapshot
    pub fn new() -> Self {
        let issues = IssueSink::new();
        let graph = Arc::new(CompositionGraph::empty());
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            cost: Arc::new(RwLock::new(Arc::new(CostEngine::new(graph, issues.clone())))),
            ledger: Arc::new(RwLock::new(StockLedger::new())),
            open_items: Arc::new(RwLock::new(Vec::new())),
            cart: Arc::new(RwLock::new(Vec::new())),
            issues,
            versions: Arc::new(ResourceVersions::new()),
            event_tx,
        }
    }

    // =========================================================================
    // Catalog & stock ingestion
    // =========================================================================

    /// Load a full catalog snapshot pushed by the persistence collaborator
    ///
    /// Rebuilds the composition graph and the cost engine (dropping the
    /// whole memo) and reseeds the stock ledger from the ingredient rows.
    /// Coarse invalidation: any ingredient cost or edge change arrives as
    /// a fresh snapshot.
    pub fn load_catalog(
        &self,
        ingredients: Vec<Ingredient>,
        recipes: Vec<Recipe>,
        ingredient_edges: Vec<RecipeIngredient>,
        sub_recipe_edges: Vec<RecipeSubRecipe>,
    ) {
        let ledger = StockLedger::from_ingredients(&ingredients);
        let graph = Arc::new(CompositionGraph::from_rows(
            ingredients,
            recipes,
            ingredient_edges,
            sub_recipe_edges,
            &self.issues,
        ));
        let epoch = graph.epoch().to_string();

        *self.ledger.write() = ledger;
        *self.cost.write() = Arc::new(CostEngine::new(graph, self.issues.clone()));
        self.versions.increment(RES_CATALOG);
        self.versions.increment(RES_STOCK);

        {
            let cost = self.cost.read();
            tracing::info!(
                epoch = %epoch,
                recipes = cost.graph().recipe_count(),
                ingredients = cost.graph().ingredient_count(),
                "📦 StockEngine: catalog snapshot loaded"
            );
        }
        let _ = self.event_tx.send(EngineEvent::CatalogReloaded { epoch });
    }

    /// Drop every memoized resolution without replacing the snapshot
    pub fn invalidate_costs(&self) {
        self.cost.read().invalidate();
    }

    /// Absolute stock level push (stocktake)
    pub fn set_stock(&self, ingredient_id: &str, quantity: Decimal) {
        self.ledger.write().set_stock(ingredient_id, quantity);
        self.versions.increment(RES_STOCK);
        let _ = self.event_tx.send(EngineEvent::StockChanged {
            ingredient_id: ingredient_id.to_string(),
        });
    }

    /// Relative stock movement (goods in / waste / post-sale deduction)
    ///
    /// Returns the new on-hand quantity. Stock changes never touch the
    /// cost memo.
    pub fn apply_movement(&self, movement: &StockMovement) -> Decimal {
        let next = self
            .ledger
            .write()
            .apply_delta(&movement.ingredient, movement.delta, &self.issues);
        self.versions.increment(RES_STOCK);
        tracing::debug!(
            ingredient = %movement.ingredient,
            delta = %movement.delta,
            reason = ?movement.reason,
            on_hand = %next,
            "Stock movement applied"
        );
        let _ = self.event_tx.send(EngineEvent::StockChanged {
            ingredient_id: movement.ingredient.clone(),
        });
        next
    }

    // =========================================================================
    // Open orders
    // =========================================================================

    /// Replace the open order-item set (full resync from persistence)
    pub fn sync_open_orders(&self, items: Vec<OrderItem>) {
        *self.open_items.write() = items;
        self.versions.increment(RES_ORDERS);
        let _ = self.event_tx.send(EngineEvent::OrdersChanged);
    }

    /// Insert or replace a single open order item
    pub fn upsert_order_item(&self, item: OrderItem) {
        {
            let mut items = self.open_items.write();
            match items.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => *existing = item,
                None => items.push(item),
            }
        }
        self.versions.increment(RES_ORDERS);
        let _ = self.event_tx.send(EngineEvent::OrdersChanged);
    }

    /// Advance or cancel an order item, enforcing the status machine
    ///
    /// Cancellation is the only pre-payment transition that releases the
    /// item's reservation weight.
    pub fn set_item_status(&self, item_id: &str, to: OrderItemStatus) -> EngineResult<()> {
        {
            let mut items = self.open_items.write();
            let item = items
                .iter_mut()
                .find(|item| item.id == item_id)
                .ok_or_else(|| EngineError::ItemNotFound(item_id.to_string()))?;
            item.status.validate_transition(to)?;
            item.status = to;
        }
        self.versions.increment(RES_ORDERS);
        let _ = self.event_tx.send(EngineEvent::OrdersChanged);
        Ok(())
    }

    /// Remove all items of a completed (paid) order from the open set
    ///
    /// Physical stock deduction for the sale happens in the inventory
    /// collaborator; here the order simply stops reserving.
    pub fn complete_order(&self, order_id: &str) {
        let removed = {
            let mut items = self.open_items.write();
            let before = items.len();
            items.retain(|item| item.order_id != order_id);
            before - items.len()
        };
        self.versions.increment(RES_ORDERS);
        tracing::debug!(order = %order_id, removed, "Order left the open set");
        let _ = self.event_tx.send(EngineEvent::OrdersChanged);
    }

    /// Snapshot of the current open order items
    pub fn open_items(&self) -> Vec<OrderItem> {
        self.open_items.read().clone()
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add a line to the active cart
    ///
    /// Gates on catalog flags only: unknown recipes, intermediate
    /// preparations and unavailable recipes are rejected. Stock is *not*
    /// checked here; callers run [`can_add`](Self::can_add) first and
    /// decide. Returns the new line id.
    pub fn add_cart_item(
        &self,
        recipe_id: &str,
        quantity: i32,
        note: Option<String>,
    ) -> EngineResult<String> {
        if quantity <= 0 {
            return Err(EngineError::InvalidQuantity(quantity));
        }
        {
            let cost = self.cost.read();
            let recipe = cost
                .graph()
                .recipe(recipe_id)
                .ok_or_else(|| EngineError::RecipeNotFound(recipe_id.to_string()))?;
            if recipe.is_sub_recipe {
                return Err(EngineError::RecipeNotSellable(recipe_id.to_string()));
            }
            if !recipe.is_available {
                return Err(EngineError::RecipeUnavailable(recipe_id.to_string()));
            }
        }

        let line_id = uuid::Uuid::new_v4().to_string();
        self.cart.write().push(CartItem {
            line_id: line_id.clone(),
            recipe: recipe_id.to_string(),
            quantity,
            note,
        });
        self.versions.increment(RES_CART);
        let _ = self.event_tx.send(EngineEvent::CartChanged);
        Ok(line_id)
    }

    /// Remove a cart line; its reservation weight is released immediately
    pub fn remove_cart_item(&self, line_id: &str) -> EngineResult<()> {
        {
            let mut cart = self.cart.write();
            let before = cart.len();
            cart.retain(|line| line.line_id != line_id);
            if cart.len() == before {
                return Err(EngineError::CartLineNotFound(line_id.to_string()));
            }
        }
        self.versions.increment(RES_CART);
        let _ = self.event_tx.send(EngineEvent::CartChanged);
        Ok(())
    }

    /// Drop every cart line
    pub fn clear_cart(&self) {
        self.cart.write().clear();
        self.versions.increment(RES_CART);
        let _ = self.event_tx.send(EngineEvent::CartChanged);
    }

    /// Convert the cart into PENDING order items (send to kitchen)
    ///
    /// Each line becomes one order item with a fresh group id, so later
    /// station splits can share it. The cart empties and the items enter
    /// the open set in the same call: total reservation is unchanged by
    /// the conversion. Returns the created items for the persistence
    /// collaborator to record.
    pub fn send_cart(&self, order_id: &str) -> Vec<OrderItem> {
        let lines = std::mem::take(&mut *self.cart.write());
        let items: Vec<OrderItem> = lines
            .into_iter()
            .map(|line| OrderItem {
                id: uuid::Uuid::new_v4().to_string(),
                order_id: order_id.to_string(),
                recipe: line.recipe,
                quantity: line.quantity,
                status: OrderItemStatus::Pending,
                group_id: Some(uuid::Uuid::new_v4().to_string()),
                note: line.note,
                created_at: Utc::now(),
            })
            .collect();

        self.open_items.write().extend(items.iter().cloned());
        self.versions.increment(RES_CART);
        self.versions.increment(RES_ORDERS);
        tracing::debug!(order = %order_id, items = items.len(), "Cart sent to kitchen");
        let _ = self.event_tx.send(EngineEvent::CartChanged);
        let _ = self.event_tx.send(EngineEvent::OrdersChanged);
        items
    }

    /// Snapshot of the active cart
    pub fn cart_items(&self) -> Vec<CartItem> {
        self.cart.read().clone()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// True ingredient cost per unit of recipe
    pub fn effective_cost(&self, recipe_id: &str) -> EngineResult<Decimal> {
        self.cost_engine()
            .resolve(recipe_id)
            .map(|resolved| resolved.total_cost)
    }

    /// Flattened bill of materials per unit of recipe
    pub fn flattened_requirement(&self, recipe_id: &str) -> EngineResult<HashMap<String, Decimal>> {
        self.cost_engine()
            .resolve(recipe_id)
            .map(|resolved| resolved.flattened.clone())
    }

    /// Quantity of an ingredient already claimed by open orders and cart
    pub fn reserved_for(&self, ingredient_id: &str) -> Decimal {
        self.reservations()
            .get(ingredient_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Unreserved on-hand quantity (UI stock badges)
    pub fn available_for(&self, ingredient_id: &str) -> EngineResult<Decimal> {
        let on_hand = self
            .ledger
            .read()
            .on_hand(ingredient_id)
            .ok_or_else(|| EngineError::IngredientNotFound(ingredient_id.to_string()))?;
        Ok(on_hand - self.reserved_for(ingredient_id))
    }

    /// Can `quantity` more units of a recipe be honored right now?
    ///
    /// Pure predicate; nothing is reserved by asking. Unknown recipes and
    /// composition cycles fail closed as errors - the engine never
    /// approves a sale it cannot verify.
    pub fn can_add(&self, recipe_id: &str, quantity: i32) -> EngineResult<Availability> {
        let cost = self.cost_engine();
        let resolved = cost.resolve(recipe_id)?;
        let reserved = self.reservations_with(&cost);
        let ledger = self.ledger.read();
        Ok(availability::check(&resolved, quantity, &ledger, &reserved))
    }

    /// Whole units of a recipe producible from unreserved stock
    pub fn sellable_units(&self, recipe_id: &str) -> EngineResult<Decimal> {
        let cost = self.cost_engine();
        let resolved = cost.resolve(recipe_id)?;
        let reserved = self.reservations_with(&cost);
        let ledger = self.ledger.read();
        Ok(availability::sellable_units(&resolved, &ledger, &reserved))
    }

    // =========================================================================
    // Diagnostics & notifications
    // =========================================================================

    /// Drain recorded non-fatal inconsistencies
    pub fn take_issues(&self) -> Vec<CompositionIssue> {
        self.issues.drain()
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Current version counter for a resource kind
    pub fn version(&self, resource: &str) -> u64 {
        self.versions.get(resource)
    }

    fn cost_engine(&self) -> Arc<CostEngine> {
        self.cost.read().clone()
    }

    fn reservations(&self) -> ReservationMap {
        let cost = self.cost_engine();
        self.reservations_with(&cost)
    }

    fn reservations_with(&self, cost: &CostEngine) -> ReservationMap {
        let items = self.open_items.read();
        let cart = self.cart.read();
        accumulate(cost, &items, &cart)
    }
}
