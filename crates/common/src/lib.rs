//! Shared identifier types used across the trade coordination crates.

mod types;

pub use types::{OfferId, PartyId, TradeId};
