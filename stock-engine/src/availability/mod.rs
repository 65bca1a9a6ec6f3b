//! Availability checking
//!
//! Pure predicate over a resolved recipe, the stock ledger and the
//! current reservation map. No side effects; the caller decides whether
//! to proceed, and only a subsequent cart/order mutation changes
//! reservation state.

mod checker;

pub use checker::{check, sellable_units, Availability};
