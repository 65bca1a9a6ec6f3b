//! Cart lines and kitchen order items

use super::OrderItemStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cart line - ephemeral, client-local
///
/// Exists only while a sale is being assembled; destroyed when the cart
/// is sent to the kitchen or the line is removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Line ID (unique within the cart)
    pub line_id: String,
    /// Recipe reference (String ID)
    pub recipe: String,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Kitchen-bound order item
///
/// Created when cart lines are sent to the kitchen. Its reservation
/// weight is removed only on cancellation or when the whole order
/// completes and leaves the open set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub id: String,
    /// Owning order reference (String ID)
    pub order_id: String,
    /// Recipe reference (String ID)
    pub recipe: String,
    pub quantity: i32,
    pub status: OrderItemStatus,
    /// Links rows that represent one logical dish split across several
    /// preparation stations; such rows share recipe and quantity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}
