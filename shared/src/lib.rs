//! Shared types for the restaurant suite
//!
//! Common types used across multiple crates: catalog row types
//! (ingredients, recipes, composition edges), cart and kitchen order
//! types, and the order item status machine.

pub mod models;
pub mod order;

// Re-exports
pub use serde::{Deserialize, Serialize};
