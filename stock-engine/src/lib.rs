//! Recipe Composition Costing & Stock Reservation Engine
//!
//! Given a graph of recipes built from raw ingredients and nested
//! sub-recipes, this crate computes each recipe's true ingredient cost
//! and its flattened raw-ingredient requirements, and answers - at the
//! moment a unit is about to be added to a cart or order - whether
//! enough unreserved stock exists across all open carts and
//! kitchen-bound orders to honor it.
//!
//! # Architecture
//!
//! ```text
//! Persistence push → CompositionGraph → CostEngine (cost + flattened BOM, memoized)
//!                                            ↓
//!        Open orders + active cart → Reservation accumulation
//!                                            ↓
//!                    StockLedger  →  Availability check (yes / limiting ingredient)
//! ```
//!
//! All computation is synchronous and re-derived on demand from the
//! current in-memory snapshot; inputs arrive through the push methods of
//! [`StockEngine`]. The cost memo lives exactly as long as the graph
//! snapshot it was computed against.
//!
//! The availability check is a *local* optimistic guarantee: two
//! terminals evaluating against stock that is only reconciled after the
//! authoritative persistence layer commits can jointly oversell. The
//! authoritative check belongs to the commit path, not this engine.

pub mod availability;
pub mod composition;
pub mod costing;
pub mod diagnostics;
pub mod engine;
pub mod reservation;

// Re-exports
pub use availability::Availability;
pub use composition::CompositionGraph;
pub use costing::{CostEngine, ResolvedRecipe};
pub use diagnostics::{CompositionIssue, IssueKind, IssueSink};
pub use engine::{EngineError, EngineEvent, EngineResult, StockEngine};
pub use reservation::{ReservationMap, StockLedger};
