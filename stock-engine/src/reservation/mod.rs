//! Stock ledger and reservation accumulation
//!
//! - **ledger**: current on-hand quantity per ingredient, mutated only
//!   by inventory pushes
//! - **accumulator**: per-ingredient totals already claimed by open
//!   kitchen orders and the active cart

mod accumulator;
mod ledger;

pub use accumulator::{accumulate, reserved_for, ReservationMap};
pub use ledger::StockLedger;
