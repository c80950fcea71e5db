//! Trade status state machine.

use serde::{Deserialize, Serialize};

/// The status of a trade in its lifecycle.
///
/// This enum is the single source of truth for which operation is legal
/// next; no parallel "waiting for" state exists anywhere else.
///
/// State transitions:
/// ```text
/// AwaitingSellerConfirmation ──► Confirmed ──► BuyerArrived ──┐
///                                    │                        │
///                                    └──► DeliveryActivated ◄─┘
///                                              │    ▲
///                                              ▼    │ (delivery failed)
///                                       DeliveryInProgress
///                                              │
///                                              ▼
///                                       QuantityDeclared ──► PaymentRequested
///                                         (re-declare ↺)          │    ▲
///                                                                 ▼    │ (not received)
///                                                          PaymentDeclared ──► Completed
///
/// every non-terminal state ──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TradeStatus {
    /// Buyer has requested the trade; waiting for the seller to accept.
    #[default]
    AwaitingSellerConfirmation,

    /// Seller accepted; waiting for the buyer to show up.
    Confirmed,

    /// Buyer reported arrival at the delivery point.
    BuyerArrived,

    /// Seller switched delivery on; waiting for the buyer to confirm flow.
    DeliveryActivated,

    /// Buyer confirmed the commodity is flowing.
    DeliveryInProgress,

    /// Buyer declared the delivered quantity; waiting for seller sign-off.
    QuantityDeclared,

    /// Quantity agreed; buyer owes the quoted amount.
    PaymentRequested,

    /// Buyer declared the payment as sent.
    PaymentDeclared,

    /// Seller confirmed payment receipt (terminal state).
    Completed,

    /// Trade was rejected or cancelled (terminal state).
    Cancelled,
}

impl TradeStatus {
    /// Returns true if the seller can accept or reject the trade.
    pub fn can_accept(&self) -> bool {
        matches!(self, TradeStatus::AwaitingSellerConfirmation)
    }

    /// Returns true if the buyer can report arrival.
    pub fn can_mark_arrived(&self) -> bool {
        matches!(self, TradeStatus::Confirmed)
    }

    /// Returns true if the seller can activate delivery.
    pub fn can_activate_delivery(&self) -> bool {
        matches!(self, TradeStatus::Confirmed | TradeStatus::BuyerArrived)
    }

    /// Returns true if the buyer can report a failed activation.
    pub fn can_report_delivery_failed(&self) -> bool {
        matches!(self, TradeStatus::DeliveryActivated)
    }

    /// Returns true if the buyer can confirm delivery has started.
    pub fn can_confirm_delivery_started(&self) -> bool {
        matches!(self, TradeStatus::DeliveryActivated)
    }

    /// Returns true if the buyer can declare the delivered quantity.
    ///
    /// Re-declaring from `QuantityDeclared` is how a seller dispute gets
    /// resolved: the buyer submits a corrected quantity and the quote is
    /// recomputed.
    pub fn can_declare_quantity(&self) -> bool {
        matches!(
            self,
            TradeStatus::DeliveryInProgress | TradeStatus::QuantityDeclared
        )
    }

    /// Returns true if the seller can confirm or dispute the declared
    /// quantity.
    pub fn can_confirm_quantity(&self) -> bool {
        matches!(self, TradeStatus::QuantityDeclared)
    }

    /// Returns true if the buyer can declare payment as sent.
    pub fn can_declare_payment(&self) -> bool {
        matches!(self, TradeStatus::PaymentRequested)
    }

    /// Returns true if the seller can confirm or deny payment receipt.
    pub fn can_confirm_payment(&self) -> bool {
        matches!(self, TradeStatus::PaymentDeclared)
    }

    /// Returns true if either party can cancel the trade.
    pub fn can_cancel(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if this is a terminal status (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, TradeStatus::Completed | TradeStatus::Cancelled)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::AwaitingSellerConfirmation => "AwaitingSellerConfirmation",
            TradeStatus::Confirmed => "Confirmed",
            TradeStatus::BuyerArrived => "BuyerArrived",
            TradeStatus::DeliveryActivated => "DeliveryActivated",
            TradeStatus::DeliveryInProgress => "DeliveryInProgress",
            TradeStatus::QuantityDeclared => "QuantityDeclared",
            TradeStatus::PaymentRequested => "PaymentRequested",
            TradeStatus::PaymentDeclared => "PaymentDeclared",
            TradeStatus::Completed => "Completed",
            TradeStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
