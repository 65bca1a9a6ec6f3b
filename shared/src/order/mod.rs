//! Cart and kitchen order types
//!
//! - **status**: the order item status machine (reservation weight rules)
//! - **types**: cart lines and kitchen-bound order items

mod status;
mod types;

pub use status::{InvalidTransition, OrderItemStatus};
pub use types::{CartItem, OrderItem};
