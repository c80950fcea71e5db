//! Quote computation.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, Result};
use crate::offer::{Offer, PricingPolicy};

/// Number of minor-unit digits in the settlement currency.
pub const CURRENCY_SCALE: u32 = 2;

/// The computed pricing outcome for a requested quantity against an offer.
///
/// Invariant: `total_amount` equals `billed_quantity * unit_price` rounded to
/// [`CURRENCY_SCALE`] digits, half away from zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Quantity the buyer asked for.
    pub requested_quantity: Decimal,

    /// Quantity actually billed; equals the requested quantity unless the
    /// offer's minimum-quantity guarantee was applied.
    pub billed_quantity: Decimal,

    /// Per-unit price applied to the entire billed quantity.
    pub unit_price: Decimal,

    /// Upper bound of the selected tier; `None` for flat pricing and for the
    /// unbounded tier.
    pub applied_tier_upper_bound: Option<Decimal>,

    /// Total amount due.
    pub total_amount: Decimal,

    /// Whether the minimum-quantity guarantee raised the billed quantity.
    pub minimum_applied: bool,
}

impl Offer {
    /// Computes the quote for a requested quantity.
    ///
    /// Pure and deterministic: identical inputs always produce identical
    /// quotes, and nothing is persisted or mutated. The offer is revalidated
    /// first so a malformed offer can never price a trade.
    pub fn quote(&self, requested_quantity: Decimal) -> Result<Quote> {
        if requested_quantity <= Decimal::ZERO {
            return Err(PricingError::InvalidQuantity(requested_quantity));
        }
        self.validate()?;

        let billed_quantity = match self.minimum_quantity() {
            Some(minimum) if requested_quantity < minimum => minimum,
            _ => requested_quantity,
        };
        let minimum_applied = billed_quantity > requested_quantity;

        let (unit_price, applied_tier_upper_bound) = match self.policy() {
            PricingPolicy::Flat { unit_price } => (*unit_price, None),
            PricingPolicy::Tiered { tiers } => {
                // Cliff selection: the first tier covering the billed
                // quantity prices the whole amount, not just the excess.
                let tier = tiers
                    .iter()
                    .find(|tier| tier.upper_bound.is_none_or(|bound| bound >= billed_quantity))
                    .ok_or_else(|| {
                        PricingError::InvalidOfferConfiguration(
                            "no tier covers the billed quantity".to_string(),
                        )
                    })?;
                (tier.unit_price, tier.upper_bound)
            }
        };

        let total_amount = (billed_quantity * unit_price)
            .round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);

        Ok(Quote {
            requested_quantity,
            billed_quantity,
            unit_price,
            applied_tier_upper_bound,
            total_amount,
            minimum_applied,
        })
    }
}
