//! Offers and their pricing policies.

use common::{OfferId, PartyId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, Result};

/// One band of a volume-tiered price list.
///
/// A tier with `upper_bound = None` covers every quantity above the previous
/// tier's bound; a valid tier list has exactly one such tier, in last
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTier {
    /// Inclusive upper bound of this band, or `None` for the unbounded band.
    pub upper_bound: Option<Decimal>,

    /// Price per unit applied when this tier is selected.
    pub unit_price: Decimal,
}

impl PriceTier {
    /// Creates a tier covering quantities up to (and including) `upper_bound`.
    pub fn bounded(upper_bound: Decimal, unit_price: Decimal) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            unit_price,
        }
    }

    /// Creates the trailing tier covering all remaining quantities.
    pub fn unbounded(unit_price: Decimal) -> Self {
        Self {
            upper_bound: None,
            unit_price,
        }
    }
}

/// How an offer prices the commodity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum PricingPolicy {
    /// A single per-unit price regardless of quantity.
    Flat { unit_price: Decimal },

    /// Volume-tiered cliff pricing: the selected tier's price applies to the
    /// entire billed quantity, not marginally per band.
    Tiered { tiers: Vec<PriceTier> },
}

impl PricingPolicy {
    /// Builds a policy from the pre-parsed primitives the catalog supplies.
    ///
    /// The `kind` tag is the catalog's policy discriminator; unknown tags are
    /// rejected rather than guessed at.
    pub fn from_parts(
        kind: &str,
        flat_price: Option<Decimal>,
        tiers: Vec<PriceTier>,
    ) -> Result<Self> {
        match kind {
            "flat" => {
                let unit_price = flat_price.ok_or_else(|| {
                    PricingError::InvalidOfferConfiguration(
                        "flat policy requires a flat price".to_string(),
                    )
                })?;
                Ok(PricingPolicy::Flat { unit_price })
            }
            "tiered" => {
                if tiers.is_empty() {
                    return Err(PricingError::InvalidOfferConfiguration(
                        "tiered policy requires at least one tier".to_string(),
                    ));
                }
                Ok(PricingPolicy::Tiered { tiers })
            }
            other => Err(PricingError::UnsupportedPricingPolicy(other.to_string())),
        }
    }
}

/// A standing price list published by a seller for a divisible commodity.
///
/// Offers are owned by the external catalog; the engine only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    id: OfferId,
    seller_id: PartyId,
    policy: PricingPolicy,

    /// Floor quantity that is always billed, even if the requested or
    /// declared quantity is lower.
    minimum_quantity: Option<Decimal>,
}

impl Offer {
    /// Creates an offer with the given pricing policy.
    pub fn new(id: OfferId, seller_id: PartyId, policy: PricingPolicy) -> Self {
        Self {
            id,
            seller_id,
            policy,
            minimum_quantity: None,
        }
    }

    /// Creates a flat-rate offer.
    pub fn flat(id: OfferId, seller_id: PartyId, unit_price: Decimal) -> Self {
        Self::new(id, seller_id, PricingPolicy::Flat { unit_price })
    }

    /// Creates a volume-tiered offer.
    pub fn tiered(id: OfferId, seller_id: PartyId, tiers: Vec<PriceTier>) -> Self {
        Self::new(id, seller_id, PricingPolicy::Tiered { tiers })
    }

    /// Sets the guaranteed-minimum billable quantity.
    pub fn with_minimum_quantity(mut self, minimum_quantity: Decimal) -> Self {
        self.minimum_quantity = Some(minimum_quantity);
        self
    }

    /// Returns the offer ID.
    pub fn id(&self) -> OfferId {
        self.id
    }

    /// Returns the seller who published this offer.
    pub fn seller_id(&self) -> PartyId {
        self.seller_id
    }

    /// Returns the pricing policy.
    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Returns the guaranteed-minimum quantity, if any.
    pub fn minimum_quantity(&self) -> Option<Decimal> {
        self.minimum_quantity
    }

    /// Validates the offer's pricing invariants.
    ///
    /// This is the offer-creation-time check: a catalog should reject an
    /// offer that fails here before any trade can reference it. [`Offer::quote`]
    /// re-runs it so a malformed offer can never price a trade.
    pub fn validate(&self) -> Result<()> {
        match &self.policy {
            PricingPolicy::Flat { unit_price } => {
                if *unit_price <= Decimal::ZERO {
                    return Err(PricingError::InvalidOfferConfiguration(format!(
                        "flat unit price {unit_price} must be positive"
                    )));
                }
            }
            PricingPolicy::Tiered { tiers } => validate_tiers(tiers)?,
        }

        if let Some(minimum) = self.minimum_quantity
            && minimum <= Decimal::ZERO
        {
            return Err(PricingError::InvalidOfferConfiguration(format!(
                "minimum quantity {minimum} must be positive"
            )));
        }

        Ok(())
    }
}

fn validate_tiers(tiers: &[PriceTier]) -> Result<()> {
    if tiers.is_empty() {
        return Err(PricingError::InvalidOfferConfiguration(
            "tier list is empty".to_string(),
        ));
    }

    let mut previous_bound: Option<Decimal> = None;
    for (index, tier) in tiers.iter().enumerate() {
        if tier.unit_price <= Decimal::ZERO {
            return Err(PricingError::InvalidOfferConfiguration(format!(
                "tier {index} unit price {} must be positive",
                tier.unit_price
            )));
        }

        let is_last = index == tiers.len() - 1;
        match tier.upper_bound {
            None if !is_last => {
                return Err(PricingError::InvalidOfferConfiguration(format!(
                    "tier {index} is unbounded but not last"
                )));
            }
            Some(bound) if is_last => {
                return Err(PricingError::InvalidOfferConfiguration(format!(
                    "last tier must be unbounded, found bound {bound}"
                )));
            }
            Some(bound) => {
                if bound <= Decimal::ZERO {
                    return Err(PricingError::InvalidOfferConfiguration(format!(
                        "tier {index} bound {bound} must be positive"
                    )));
                }
                if let Some(previous) = previous_bound
                    && bound <= previous
                {
                    return Err(PricingError::InvalidOfferConfiguration(format!(
                        "tier bounds must be strictly ascending: {bound} follows {previous}"
                    )));
                }
                previous_bound = Some(bound);
            }
            None => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tiers() -> Vec<PriceTier> {
        vec![
            PriceTier::bounded(dec!(30), dec!(0.45)),
            PriceTier::bounded(dec!(60), dec!(0.40)),
            PriceTier::unbounded(dec!(0.35)),
        ]
    }

    #[test]
    fn valid_flat_offer_passes_validation() {
        let offer = Offer::flat(OfferId::new(), PartyId::new(), dec!(0.40));
        assert!(offer.validate().is_ok());
    }

    #[test]
    fn valid_tiered_offer_passes_validation() {
        let offer = Offer::tiered(OfferId::new(), PartyId::new(), tiers());
        assert!(offer.validate().is_ok());
    }

    #[test]
    fn flat_offer_rejects_non_positive_price() {
        let offer = Offer::flat(OfferId::new(), PartyId::new(), dec!(0));
        assert!(matches!(
            offer.validate(),
            Err(PricingError::InvalidOfferConfiguration(_))
        ));
    }

    #[test]
    fn empty_tier_list_is_rejected() {
        let offer = Offer::tiered(OfferId::new(), PartyId::new(), vec![]);
        assert!(matches!(
            offer.validate(),
            Err(PricingError::InvalidOfferConfiguration(_))
        ));
    }

    #[test]
    fn bounded_last_tier_is_rejected() {
        let offer = Offer::tiered(
            OfferId::new(),
            PartyId::new(),
            vec![
                PriceTier::bounded(dec!(30), dec!(0.45)),
                PriceTier::bounded(dec!(60), dec!(0.40)),
            ],
        );
        assert!(matches!(
            offer.validate(),
            Err(PricingError::InvalidOfferConfiguration(_))
        ));
    }

    #[test]
    fn unbounded_tier_in_the_middle_is_rejected() {
        let offer = Offer::tiered(
            OfferId::new(),
            PartyId::new(),
            vec![
                PriceTier::unbounded(dec!(0.45)),
                PriceTier::unbounded(dec!(0.35)),
            ],
        );
        assert!(matches!(
            offer.validate(),
            Err(PricingError::InvalidOfferConfiguration(_))
        ));
    }

    #[test]
    fn non_ascending_bounds_are_rejected() {
        let offer = Offer::tiered(
            OfferId::new(),
            PartyId::new(),
            vec![
                PriceTier::bounded(dec!(60), dec!(0.45)),
                PriceTier::bounded(dec!(30), dec!(0.40)),
                PriceTier::unbounded(dec!(0.35)),
            ],
        );
        assert!(matches!(
            offer.validate(),
            Err(PricingError::InvalidOfferConfiguration(_))
        ));
    }

    #[test]
    fn equal_bounds_are_rejected() {
        let offer = Offer::tiered(
            OfferId::new(),
            PartyId::new(),
            vec![
                PriceTier::bounded(dec!(30), dec!(0.45)),
                PriceTier::bounded(dec!(30), dec!(0.40)),
                PriceTier::unbounded(dec!(0.35)),
            ],
        );
        assert!(matches!(
            offer.validate(),
            Err(PricingError::InvalidOfferConfiguration(_))
        ));
    }

    #[test]
    fn non_positive_tier_price_is_rejected() {
        let offer = Offer::tiered(
            OfferId::new(),
            PartyId::new(),
            vec![
                PriceTier::bounded(dec!(30), dec!(-0.45)),
                PriceTier::unbounded(dec!(0.35)),
            ],
        );
        assert!(matches!(
            offer.validate(),
            Err(PricingError::InvalidOfferConfiguration(_))
        ));
    }

    #[test]
    fn non_positive_minimum_quantity_is_rejected() {
        let offer =
            Offer::flat(OfferId::new(), PartyId::new(), dec!(0.40)).with_minimum_quantity(dec!(0));
        assert!(matches!(
            offer.validate(),
            Err(PricingError::InvalidOfferConfiguration(_))
        ));
    }

    #[test]
    fn from_parts_builds_flat_policy() {
        let policy = PricingPolicy::from_parts("flat", Some(dec!(0.40)), vec![]).unwrap();
        assert_eq!(
            policy,
            PricingPolicy::Flat {
                unit_price: dec!(0.40)
            }
        );
    }

    #[test]
    fn from_parts_builds_tiered_policy() {
        let policy = PricingPolicy::from_parts("tiered", None, tiers()).unwrap();
        assert!(matches!(policy, PricingPolicy::Tiered { .. }));
    }

    #[test]
    fn from_parts_rejects_flat_without_price() {
        let result = PricingPolicy::from_parts("flat", None, vec![]);
        assert!(matches!(
            result,
            Err(PricingError::InvalidOfferConfiguration(_))
        ));
    }

    #[test]
    fn from_parts_rejects_tiered_without_tiers() {
        let result = PricingPolicy::from_parts("tiered", None, vec![]);
        assert!(matches!(
            result,
            Err(PricingError::InvalidOfferConfiguration(_))
        ));
    }

    #[test]
    fn from_parts_rejects_unknown_kind() {
        let result = PricingPolicy::from_parts("auction", None, vec![]);
        assert!(matches!(
            result,
            Err(PricingError::UnsupportedPricingPolicy(kind)) if kind == "auction"
        ));
    }

    #[test]
    fn offer_serialization_roundtrip() {
        let offer = Offer::tiered(OfferId::new(), PartyId::new(), tiers())
            .with_minimum_quantity(dec!(5));
        let json = serde_json::to_string(&offer).unwrap();
        let deserialized: Offer = serde_json::from_str(&json).unwrap();
        assert_eq!(offer, deserialized);
    }
}
