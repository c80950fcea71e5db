//! Trade lifecycle commands.
//!
//! One struct per operation, built from the pre-parsed primitives the
//! surrounding transport hands over. All remaining domain validation
//! happens in the aggregate and the pricing engine, never upstream.

use common::{OfferId, PartyId, TradeId};
use rust_decimal::Decimal;

/// Command to open a new trade against an offer.
#[derive(Debug, Clone)]
pub struct OpenTrade {
    /// The trade ID to create.
    pub trade_id: TradeId,

    /// Buyer requesting the trade.
    pub buyer_id: PartyId,

    /// Offer to price against.
    pub offer_id: OfferId,

    /// Quantity the buyer intends to purchase.
    pub requested_quantity: Decimal,
}

impl OpenTrade {
    /// Creates a new OpenTrade command.
    pub fn new(
        trade_id: TradeId,
        buyer_id: PartyId,
        offer_id: OfferId,
        requested_quantity: Decimal,
    ) -> Self {
        Self {
            trade_id,
            buyer_id,
            offer_id,
            requested_quantity,
        }
    }

    /// Creates a new OpenTrade command with a generated trade ID.
    pub fn for_buyer(buyer_id: PartyId, offer_id: OfferId, requested_quantity: Decimal) -> Self {
        Self::new(TradeId::new(), buyer_id, offer_id, requested_quantity)
    }
}

/// Command for the seller to accept a trade request.
#[derive(Debug, Clone)]
pub struct AcceptTrade {
    /// The trade to accept.
    pub trade_id: TradeId,

    /// Acting seller.
    pub seller_id: PartyId,
}

impl AcceptTrade {
    /// Creates a new AcceptTrade command.
    pub fn new(trade_id: TradeId, seller_id: PartyId) -> Self {
        Self { trade_id, seller_id }
    }
}

/// Command for the seller to reject a trade request.
#[derive(Debug, Clone)]
pub struct RejectTrade {
    /// The trade to reject.
    pub trade_id: TradeId,

    /// Acting seller.
    pub seller_id: PartyId,

    /// Stated reason, recorded on the audit trail.
    pub reason: String,
}

impl RejectTrade {
    /// Creates a new RejectTrade command.
    pub fn new(trade_id: TradeId, seller_id: PartyId, reason: impl Into<String>) -> Self {
        Self {
            trade_id,
            seller_id,
            reason: reason.into(),
        }
    }
}

/// Command for the buyer to report arrival at the delivery point.
#[derive(Debug, Clone)]
pub struct MarkArrived {
    /// The trade concerned.
    pub trade_id: TradeId,

    /// Acting buyer.
    pub buyer_id: PartyId,
}

impl MarkArrived {
    /// Creates a new MarkArrived command.
    pub fn new(trade_id: TradeId, buyer_id: PartyId) -> Self {
        Self { trade_id, buyer_id }
    }
}

/// Command for the seller to activate delivery.
#[derive(Debug, Clone)]
pub struct ActivateDelivery {
    /// The trade concerned.
    pub trade_id: TradeId,

    /// Acting seller.
    pub seller_id: PartyId,
}

impl ActivateDelivery {
    /// Creates a new ActivateDelivery command.
    pub fn new(trade_id: TradeId, seller_id: PartyId) -> Self {
        Self { trade_id, seller_id }
    }
}

/// Command for the buyer to report a failed delivery activation.
#[derive(Debug, Clone)]
pub struct ReportDeliveryFailed {
    /// The trade concerned.
    pub trade_id: TradeId,

    /// Acting buyer.
    pub buyer_id: PartyId,

    /// Description of the failure.
    pub note: String,
}

impl ReportDeliveryFailed {
    /// Creates a new ReportDeliveryFailed command.
    pub fn new(trade_id: TradeId, buyer_id: PartyId, note: impl Into<String>) -> Self {
        Self {
            trade_id,
            buyer_id,
            note: note.into(),
        }
    }
}

/// Command for the buyer to confirm delivery has started.
#[derive(Debug, Clone)]
pub struct ConfirmDeliveryStarted {
    /// The trade concerned.
    pub trade_id: TradeId,

    /// Acting buyer.
    pub buyer_id: PartyId,
}

impl ConfirmDeliveryStarted {
    /// Creates a new ConfirmDeliveryStarted command.
    pub fn new(trade_id: TradeId, buyer_id: PartyId) -> Self {
        Self { trade_id, buyer_id }
    }
}

/// Command for the buyer to declare the delivered quantity.
#[derive(Debug, Clone)]
pub struct DeclareQuantity {
    /// The trade concerned.
    pub trade_id: TradeId,

    /// Acting buyer.
    pub buyer_id: PartyId,

    /// Delivered quantity as read by the buyer.
    pub quantity: Decimal,
}

impl DeclareQuantity {
    /// Creates a new DeclareQuantity command.
    pub fn new(trade_id: TradeId, buyer_id: PartyId, quantity: Decimal) -> Self {
        Self {
            trade_id,
            buyer_id,
            quantity,
        }
    }
}

/// Command for the seller to confirm the declared quantity.
#[derive(Debug, Clone)]
pub struct ConfirmQuantity {
    /// The trade concerned.
    pub trade_id: TradeId,

    /// Acting seller.
    pub seller_id: PartyId,
}

impl ConfirmQuantity {
    /// Creates a new ConfirmQuantity command.
    pub fn new(trade_id: TradeId, seller_id: PartyId) -> Self {
        Self { trade_id, seller_id }
    }
}

/// Command for the seller to dispute the declared quantity.
#[derive(Debug, Clone)]
pub struct DisputeQuantity {
    /// The trade concerned.
    pub trade_id: TradeId,

    /// Acting seller.
    pub seller_id: PartyId,

    /// Grounds for the dispute.
    pub note: String,
}

impl DisputeQuantity {
    /// Creates a new DisputeQuantity command.
    pub fn new(trade_id: TradeId, seller_id: PartyId, note: impl Into<String>) -> Self {
        Self {
            trade_id,
            seller_id,
            note: note.into(),
        }
    }
}

/// Command for the buyer to declare payment as sent.
#[derive(Debug, Clone)]
pub struct DeclarePayment {
    /// The trade concerned.
    pub trade_id: TradeId,

    /// Acting buyer.
    pub buyer_id: PartyId,
}

impl DeclarePayment {
    /// Creates a new DeclarePayment command.
    pub fn new(trade_id: TradeId, buyer_id: PartyId) -> Self {
        Self { trade_id, buyer_id }
    }
}

/// Command for the seller to confirm payment receipt.
#[derive(Debug, Clone)]
pub struct ConfirmPaymentReceived {
    /// The trade concerned.
    pub trade_id: TradeId,

    /// Acting seller.
    pub seller_id: PartyId,
}

impl ConfirmPaymentReceived {
    /// Creates a new ConfirmPaymentReceived command.
    pub fn new(trade_id: TradeId, seller_id: PartyId) -> Self {
        Self { trade_id, seller_id }
    }
}

/// Command for the seller to report the declared payment as missing.
#[derive(Debug, Clone)]
pub struct ReportPaymentNotReceived {
    /// The trade concerned.
    pub trade_id: TradeId,

    /// Acting seller.
    pub seller_id: PartyId,

    /// Description of the discrepancy.
    pub note: String,
}

impl ReportPaymentNotReceived {
    /// Creates a new ReportPaymentNotReceived command.
    pub fn new(trade_id: TradeId, seller_id: PartyId, note: impl Into<String>) -> Self {
        Self {
            trade_id,
            seller_id,
            note: note.into(),
        }
    }
}

/// Command for either party to cancel the trade.
#[derive(Debug, Clone)]
pub struct CancelTrade {
    /// The trade to cancel.
    pub trade_id: TradeId,

    /// Acting party (buyer or seller).
    pub party_id: PartyId,

    /// Stated reason, recorded on the audit trail.
    pub reason: String,
}

impl CancelTrade {
    /// Creates a new CancelTrade command.
    pub fn new(trade_id: TradeId, party_id: PartyId, reason: impl Into<String>) -> Self {
        Self {
            trade_id,
            party_id,
            reason: reason.into(),
        }
    }
}
