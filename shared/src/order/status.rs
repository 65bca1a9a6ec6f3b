//! Order item status machine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 订单项状态
///
/// Normal flow advances one station step at a time; cancellation is
/// allowed from any non-terminal state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderItemStatus {
    /// 待制作 - sent to kitchen, not started
    #[default]
    Pending,
    /// 制作中
    InPreparation,
    /// 已出餐 - ready for pickup/serving
    Ready,
    /// 已上桌
    Served,
    /// 已取消 - terminal, releases reservation
    Cancelled,
}

/// Invalid status transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid status transition: {from:?} -> {to:?}")]
pub struct InvalidTransition {
    pub from: OrderItemStatus,
    pub to: OrderItemStatus,
}

impl OrderItemStatus {
    /// Whether an item in this status still claims ingredient stock
    pub fn reserves_stock(&self) -> bool {
        !matches!(self, OrderItemStatus::Cancelled)
    }

    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderItemStatus::Served | OrderItemStatus::Cancelled)
    }

    /// Validate a transition out of this status
    pub fn validate_transition(self, to: OrderItemStatus) -> Result<(), InvalidTransition> {
        use OrderItemStatus::*;
        let ok = match (self, to) {
            (Pending, InPreparation) => true,
            (InPreparation, Ready) => true,
            (Ready, Served) => true,
            // cancellation from any non-terminal state
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(InvalidTransition { from: self, to })
        }
    }
}
