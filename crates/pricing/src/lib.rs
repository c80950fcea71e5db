//! Quotation engine for peer-to-peer energy trades.
//!
//! Given an [`Offer`] and a requested quantity, [`Offer::quote`] computes the
//! billable quantity, unit price, applied tier, and total amount. Quoting is
//! a pure function of its inputs so it can be re-run safely whenever a
//! price-relevant fact changes (e.g. the buyer revises the declared
//! quantity).

mod error;
mod offer;
mod quote;

pub use error::PricingError;
pub use offer::{Offer, PriceTier, PricingPolicy};
pub use quote::{CURRENCY_SCALE, Quote};
