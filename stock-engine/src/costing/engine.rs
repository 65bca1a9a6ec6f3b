//! CostEngine - memoized recursive recipe resolution

use crate::composition::CompositionGraph;
use crate::diagnostics::IssueSink;
use crate::engine::{EngineError, EngineResult};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolution result for one recipe
///
/// The two views must stay numerically consistent:
/// `total_cost == Σ flattened[ing] × ingredient(ing).cost`. Callers use
/// the flattened map to check stock and the cost to price and report.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedRecipe {
    /// Total ingredient cost per unit of recipe
    pub total_cost: Decimal,
    /// Flattened bill of materials: ingredient id → quantity per unit
    pub flattened: HashMap<String, Decimal>,
}

/// Memoized cost and bill-of-materials resolver
///
/// Bound to one graph snapshot; the facade rebuilds the engine whenever
/// the catalog changes, which invalidates the memo wholesale.
/// Recomputation is cheap relative to catalog edit frequency.
pub struct CostEngine {
    graph: Arc<CompositionGraph>,
    memo: RwLock<HashMap<String, Arc<ResolvedRecipe>>>,
    issues: IssueSink,
}

impl std::fmt::Debug for CostEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostEngine")
            .field("epoch", &self.graph.epoch())
            .field("memoized", &self.memo.read().len())
            .finish()
    }
}

impl CostEngine {
    pub fn new(graph: Arc<CompositionGraph>, issues: IssueSink) -> Self {
        Self {
            graph,
            memo: RwLock::new(HashMap::new()),
            issues,
        }
    }

    /// The snapshot this engine resolves against
    pub fn graph(&self) -> &Arc<CompositionGraph> {
        &self.graph
    }

    /// Resolve a recipe to its total cost and flattened requirements
    ///
    /// Depth-first over direct-ingredient and sub-recipe edges. A recipe
    /// with no edges resolves to zero cost and an empty map. A cycle in
    /// the sub-recipe edges aborts this call only; sibling recipes stay
    /// computable.
    pub fn resolve(&self, recipe_id: &str) -> EngineResult<Arc<ResolvedRecipe>> {
        let mut visiting = Vec::new();
        self.resolve_inner(recipe_id, &mut visiting)
    }

    /// Drop every memoized resolution
    ///
    /// The facade calls this when ingredient costs or composition edges
    /// change without a full snapshot rebuild.
    pub fn invalidate(&self) {
        let mut memo = self.memo.write();
        tracing::debug!(entries = memo.len(), "Cost memo invalidated");
        memo.clear();
    }

    fn resolve_inner(
        &self,
        recipe_id: &str,
        visiting: &mut Vec<String>,
    ) -> EngineResult<Arc<ResolvedRecipe>> {
        if let Some(hit) = self.memo.read().get(recipe_id).cloned() {
            return Ok(hit);
        }

        if let Some(pos) = visiting.iter().position(|id| id == recipe_id) {
            let mut path: Vec<String> = visiting[pos..].to_vec();
            path.push(recipe_id.to_string());
            return Err(EngineError::CompositionCycle { path });
        }

        if self.graph.recipe(recipe_id).is_none() {
            return Err(EngineError::RecipeNotFound(recipe_id.to_string()));
        }

        visiting.push(recipe_id.to_string());

        let mut total_cost = Decimal::ZERO;
        let mut flattened: HashMap<String, Decimal> = HashMap::new();

        for edge in self.graph.direct_edges(recipe_id) {
            match self.graph.ingredient(&edge.ingredient) {
                Some(ing) => {
                    total_cost += ing.cost * edge.quantity;
                    *flattened.entry(edge.ingredient.clone()).or_insert(Decimal::ZERO) +=
                        edge.quantity;
                }
                None => {
                    // Edges are filtered at graph build time, so this only
                    // fires if the snapshot itself is inconsistent.
                    tracing::warn!(
                        recipe = %recipe_id,
                        ingredient = %edge.ingredient,
                        "Skipping edge to unknown ingredient during resolve"
                    );
                }
            }
        }

        for edge in self.graph.sub_edges(recipe_id) {
            match self.resolve_inner(&edge.child, visiting) {
                Ok(sub) => {
                    total_cost += sub.total_cost * edge.quantity;
                    for (ingredient, sub_qty) in &sub.flattened {
                        *flattened.entry(ingredient.clone()).or_insert(Decimal::ZERO) +=
                            *sub_qty * edge.quantity;
                    }
                }
                Err(err @ EngineError::CompositionCycle { .. }) => {
                    visiting.pop();
                    return Err(err);
                }
                Err(err) => {
                    // Missing child rows are a data inconsistency, not a
                    // reason to fail the parent.
                    tracing::warn!(
                        recipe = %recipe_id,
                        child = %edge.child,
                        error = %err,
                        "Skipping unresolvable sub-recipe during resolve"
                    );
                }
            }
        }

        visiting.pop();

        let resolved = Arc::new(ResolvedRecipe { total_cost, flattened });
        self.memo
            .write()
            .insert(recipe_id.to_string(), Arc::clone(&resolved));
        Ok(resolved)
    }

    /// Issue sink shared with the owning facade
    pub fn issues(&self) -> &IssueSink {
        &self.issues
    }

    #[cfg(test)]
    fn memo_len(&self) -> usize {
        self.memo.read().len()
    }
}
