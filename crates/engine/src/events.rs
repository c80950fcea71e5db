//! Trade domain events.
//!
//! Each successful lifecycle operation produces exactly one event. Events
//! are facts: [`crate::trade::Trade::apply`] folds them into the aggregate,
//! and [`crate::notification::intents_for`] turns them into outbound
//! notification intents.

use chrono::{DateTime, Utc};
use common::{OfferId, PartyId, TradeId};
use pricing::Quote;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Events that can occur on a trade aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TradeEvent {
    /// Buyer requested a trade against an offer.
    TradeRequested(TradeRequestedData),

    /// Seller accepted the trade request.
    TradeAccepted(TradeAcceptedData),

    /// Seller rejected the trade request.
    TradeRejected(TradeRejectedData),

    /// Buyer reported arrival at the delivery point.
    BuyerArrived(BuyerArrivedData),

    /// Seller activated delivery.
    DeliveryActivated(DeliveryActivatedData),

    /// Buyer reported that activation did not result in delivery.
    DeliveryFailed(DeliveryFailedData),

    /// Buyer confirmed the commodity is flowing.
    DeliveryStarted(DeliveryStartedData),

    /// Buyer declared the delivered quantity; the quote was recomputed.
    QuantityDeclared(QuantityDeclaredData),

    /// Seller confirmed the declared quantity.
    QuantityConfirmed(QuantityConfirmedData),

    /// Seller disputed the declared quantity.
    QuantityDisputed(QuantityDisputedData),

    /// Buyer declared the payment as sent.
    PaymentDeclared(PaymentDeclaredData),

    /// Seller confirmed payment receipt; the trade is complete.
    PaymentConfirmed(PaymentConfirmedData),

    /// Seller reported the declared payment never arrived.
    PaymentNotReceived(PaymentNotReceivedData),

    /// A party cancelled the trade.
    TradeCancelled(TradeCancelledData),
}

impl TradeEvent {
    /// Returns the event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            TradeEvent::TradeRequested(_) => "TradeRequested",
            TradeEvent::TradeAccepted(_) => "TradeAccepted",
            TradeEvent::TradeRejected(_) => "TradeRejected",
            TradeEvent::BuyerArrived(_) => "BuyerArrived",
            TradeEvent::DeliveryActivated(_) => "DeliveryActivated",
            TradeEvent::DeliveryFailed(_) => "DeliveryFailed",
            TradeEvent::DeliveryStarted(_) => "DeliveryStarted",
            TradeEvent::QuantityDeclared(_) => "QuantityDeclared",
            TradeEvent::QuantityConfirmed(_) => "QuantityConfirmed",
            TradeEvent::QuantityDisputed(_) => "QuantityDisputed",
            TradeEvent::PaymentDeclared(_) => "PaymentDeclared",
            TradeEvent::PaymentConfirmed(_) => "PaymentConfirmed",
            TradeEvent::PaymentNotReceived(_) => "PaymentNotReceived",
            TradeEvent::TradeCancelled(_) => "TradeCancelled",
        }
    }

    /// Returns when the event occurred.
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            TradeEvent::TradeRequested(data) => data.occurred_at,
            TradeEvent::TradeAccepted(data) => data.occurred_at,
            TradeEvent::TradeRejected(data) => data.occurred_at,
            TradeEvent::BuyerArrived(data) => data.occurred_at,
            TradeEvent::DeliveryActivated(data) => data.occurred_at,
            TradeEvent::DeliveryFailed(data) => data.occurred_at,
            TradeEvent::DeliveryStarted(data) => data.occurred_at,
            TradeEvent::QuantityDeclared(data) => data.occurred_at,
            TradeEvent::QuantityConfirmed(data) => data.occurred_at,
            TradeEvent::QuantityDisputed(data) => data.occurred_at,
            TradeEvent::PaymentDeclared(data) => data.occurred_at,
            TradeEvent::PaymentConfirmed(data) => data.occurred_at,
            TradeEvent::PaymentNotReceived(data) => data.occurred_at,
            TradeEvent::TradeCancelled(data) => data.occurred_at,
        }
    }
}

/// Data for TradeRequested event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRequestedData {
    /// The trade being opened.
    pub trade_id: TradeId,

    /// Buyer who requested the trade.
    pub buyer_id: PartyId,

    /// Seller who published the offer.
    pub seller_id: PartyId,

    /// The offer the trade prices against.
    pub offer_id: OfferId,

    /// Quote computed for the requested quantity.
    pub quote: Quote,

    /// When the trade was requested.
    pub occurred_at: DateTime<Utc>,
}

/// Data for TradeAccepted event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeAcceptedData {
    /// When the seller accepted.
    pub occurred_at: DateTime<Utc>,
}

/// Data for TradeRejected event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRejectedData {
    /// Seller's stated reason.
    pub reason: String,

    /// When the seller rejected.
    pub occurred_at: DateTime<Utc>,
}

/// Data for BuyerArrived event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyerArrivedData {
    /// When the buyer reported arrival.
    pub occurred_at: DateTime<Utc>,
}

/// Data for DeliveryActivated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryActivatedData {
    /// When the seller activated delivery.
    pub occurred_at: DateTime<Utc>,
}

/// Data for DeliveryFailed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryFailedData {
    /// Buyer's description of the failure.
    pub note: String,

    /// When the buyer reported the failure.
    pub occurred_at: DateTime<Utc>,
}

/// Data for DeliveryStarted event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryStartedData {
    /// When the buyer confirmed delivery had started.
    pub occurred_at: DateTime<Utc>,
}

/// Data for QuantityDeclared event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantityDeclaredData {
    /// Quantity the buyer declared as delivered.
    pub declared_quantity: Decimal,

    /// Quote recomputed for the declared quantity.
    pub quote: Quote,

    /// When the buyer declared.
    pub occurred_at: DateTime<Utc>,
}

/// Data for QuantityConfirmed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantityConfirmedData {
    /// When the seller confirmed.
    pub occurred_at: DateTime<Utc>,
}

/// Data for QuantityDisputed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantityDisputedData {
    /// Seller's grounds for the dispute.
    pub note: String,

    /// When the seller disputed.
    pub occurred_at: DateTime<Utc>,
}

/// Data for PaymentDeclared event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDeclaredData {
    /// When the buyer declared payment.
    pub occurred_at: DateTime<Utc>,
}

/// Data for PaymentConfirmed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfirmedData {
    /// When the seller confirmed receipt; becomes the trade's completion
    /// time.
    pub occurred_at: DateTime<Utc>,
}

/// Data for PaymentNotReceived event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentNotReceivedData {
    /// Seller's description of the discrepancy.
    pub note: String,

    /// When the seller reported it.
    pub occurred_at: DateTime<Utc>,
}

/// Data for TradeCancelled event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeCancelledData {
    /// Party who cancelled.
    pub cancelled_by: PartyId,

    /// Stated reason.
    pub reason: String,

    /// When the trade was cancelled.
    pub occurred_at: DateTime<Utc>,
}

// Convenience constructors for events
impl TradeEvent {
    /// Creates a TradeRequested event.
    pub fn trade_requested(
        trade_id: TradeId,
        buyer_id: PartyId,
        seller_id: PartyId,
        offer_id: OfferId,
        quote: Quote,
    ) -> Self {
        TradeEvent::TradeRequested(TradeRequestedData {
            trade_id,
            buyer_id,
            seller_id,
            offer_id,
            quote,
            occurred_at: Utc::now(),
        })
    }

    /// Creates a TradeAccepted event.
    pub fn trade_accepted() -> Self {
        TradeEvent::TradeAccepted(TradeAcceptedData {
            occurred_at: Utc::now(),
        })
    }

    /// Creates a TradeRejected event.
    pub fn trade_rejected(reason: impl Into<String>) -> Self {
        TradeEvent::TradeRejected(TradeRejectedData {
            reason: reason.into(),
            occurred_at: Utc::now(),
        })
    }

    /// Creates a BuyerArrived event.
    pub fn buyer_arrived() -> Self {
        TradeEvent::BuyerArrived(BuyerArrivedData {
            occurred_at: Utc::now(),
        })
    }

    /// Creates a DeliveryActivated event.
    pub fn delivery_activated() -> Self {
        TradeEvent::DeliveryActivated(DeliveryActivatedData {
            occurred_at: Utc::now(),
        })
    }

    /// Creates a DeliveryFailed event.
    pub fn delivery_failed(note: impl Into<String>) -> Self {
        TradeEvent::DeliveryFailed(DeliveryFailedData {
            note: note.into(),
            occurred_at: Utc::now(),
        })
    }

    /// Creates a DeliveryStarted event.
    pub fn delivery_started() -> Self {
        TradeEvent::DeliveryStarted(DeliveryStartedData {
            occurred_at: Utc::now(),
        })
    }

    /// Creates a QuantityDeclared event.
    pub fn quantity_declared(quote: Quote) -> Self {
        TradeEvent::QuantityDeclared(QuantityDeclaredData {
            declared_quantity: quote.requested_quantity,
            quote,
            occurred_at: Utc::now(),
        })
    }

    /// Creates a QuantityConfirmed event.
    pub fn quantity_confirmed() -> Self {
        TradeEvent::QuantityConfirmed(QuantityConfirmedData {
            occurred_at: Utc::now(),
        })
    }

    /// Creates a QuantityDisputed event.
    pub fn quantity_disputed(note: impl Into<String>) -> Self {
        TradeEvent::QuantityDisputed(QuantityDisputedData {
            note: note.into(),
            occurred_at: Utc::now(),
        })
    }

    /// Creates a PaymentDeclared event.
    pub fn payment_declared() -> Self {
        TradeEvent::PaymentDeclared(PaymentDeclaredData {
            occurred_at: Utc::now(),
        })
    }

    /// Creates a PaymentConfirmed event.
    pub fn payment_confirmed() -> Self {
        TradeEvent::PaymentConfirmed(PaymentConfirmedData {
            occurred_at: Utc::now(),
        })
    }

    /// Creates a PaymentNotReceived event.
    pub fn payment_not_received(note: impl Into<String>) -> Self {
        TradeEvent::PaymentNotReceived(PaymentNotReceivedData {
            note: note.into(),
            occurred_at: Utc::now(),
        })
    }

    /// Creates a TradeCancelled event.
    pub fn trade_cancelled(cancelled_by: PartyId, reason: impl Into<String>) -> Self {
        TradeEvent::TradeCancelled(TradeCancelledData {
            cancelled_by,
            reason: reason.into(),
            occurred_at: Utc::now(),
        })
    }
}
