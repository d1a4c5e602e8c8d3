//! Read-only reporting over the visit ledger.

mod day_wise;

pub use day_wise::*;
