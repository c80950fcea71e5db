//! Notification intents.
//!
//! Each committed transition's outbound messages are returned as data; the
//! caller owns delivery (best-effort, at-least-once). Keeping fan-out out of
//! the state machine keeps transitions unit-testable without a transport
//! double.

use common::PartyId;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::events::TradeEvent;
use crate::trade::Trade;

/// Which message template the transport should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    /// A buyer requested a trade against the recipient's offer.
    TradeRequested,

    /// The seller accepted the recipient's trade request.
    TradeAccepted,

    /// The seller rejected the recipient's trade request.
    TradeRejected,

    /// The buyer arrived at the delivery point.
    BuyerArrived,

    /// Delivery was switched on for the recipient.
    DeliveryActivated,

    /// Activation failed; the recipient is asked to re-attempt it.
    DeliveryRetryRequested,

    /// The buyer confirmed the commodity is flowing.
    DeliveryStarted,

    /// The buyer declared a delivered quantity for sign-off.
    QuantityDeclared,

    /// The seller disputed the declared quantity.
    QuantityDisputed,

    /// The quantity was agreed; the recipient owes the quoted amount.
    PaymentRequested,

    /// The buyer declared the payment as sent.
    PaymentDeclared,

    /// The trade completed.
    TradeCompleted,

    /// The seller reported the declared payment as missing.
    PaymentNotReceived,

    /// The counterparty cancelled the trade.
    TradeCancelled,
}

/// A message to send to a party, decoupled from actual delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationIntent {
    /// Party to notify.
    pub recipient: PartyId,

    /// Template the transport should render.
    pub kind: NotificationKind,

    /// Template parameters.
    pub payload: serde_json::Value,
}

impl NotificationIntent {
    /// Creates a new notification intent.
    pub fn new(recipient: PartyId, kind: NotificationKind, payload: serde_json::Value) -> Self {
        Self {
            recipient,
            kind,
            payload,
        }
    }
}

/// Builds the notification intents for a committed event.
///
/// `trade` must already have the event applied. Most events notify the
/// counterparty of the acting party; completion fans out to both parties.
pub fn intents_for(trade: &Trade, event: &TradeEvent) -> Vec<NotificationIntent> {
    let trade_id = trade.id();
    let buyer = trade.buyer_id();
    let seller = trade.seller_id();

    match event {
        TradeEvent::TradeRequested(data) => vec![NotificationIntent::new(
            seller,
            NotificationKind::TradeRequested,
            json!({
                "trade_id": trade_id,
                "buyer_id": buyer,
                "requested_quantity": data.quote.requested_quantity,
                "total_amount": data.quote.total_amount,
            }),
        )],
        TradeEvent::TradeAccepted(_) => vec![NotificationIntent::new(
            buyer,
            NotificationKind::TradeAccepted,
            json!({ "trade_id": trade_id }),
        )],
        TradeEvent::TradeRejected(data) => vec![NotificationIntent::new(
            buyer,
            NotificationKind::TradeRejected,
            json!({ "trade_id": trade_id, "reason": data.reason }),
        )],
        TradeEvent::BuyerArrived(_) => vec![NotificationIntent::new(
            seller,
            NotificationKind::BuyerArrived,
            json!({ "trade_id": trade_id }),
        )],
        TradeEvent::DeliveryActivated(_) => vec![NotificationIntent::new(
            buyer,
            NotificationKind::DeliveryActivated,
            json!({ "trade_id": trade_id }),
        )],
        TradeEvent::DeliveryFailed(data) => vec![NotificationIntent::new(
            seller,
            NotificationKind::DeliveryRetryRequested,
            json!({
                "trade_id": trade_id,
                "note": data.note,
                "retry_count": trade.retry_count(),
            }),
        )],
        TradeEvent::DeliveryStarted(_) => vec![NotificationIntent::new(
            seller,
            NotificationKind::DeliveryStarted,
            json!({ "trade_id": trade_id }),
        )],
        TradeEvent::QuantityDeclared(data) => vec![NotificationIntent::new(
            seller,
            NotificationKind::QuantityDeclared,
            json!({
                "trade_id": trade_id,
                "declared_quantity": data.declared_quantity,
                "billed_quantity": data.quote.billed_quantity,
                "total_amount": data.quote.total_amount,
            }),
        )],
        TradeEvent::QuantityConfirmed(_) => vec![NotificationIntent::new(
            buyer,
            NotificationKind::PaymentRequested,
            json!({
                "trade_id": trade_id,
                "total_amount": trade.quote().total_amount,
            }),
        )],
        TradeEvent::QuantityDisputed(data) => vec![NotificationIntent::new(
            buyer,
            NotificationKind::QuantityDisputed,
            json!({ "trade_id": trade_id, "note": data.note }),
        )],
        TradeEvent::PaymentDeclared(_) => vec![NotificationIntent::new(
            seller,
            NotificationKind::PaymentDeclared,
            json!({
                "trade_id": trade_id,
                "total_amount": trade.quote().total_amount,
            }),
        )],
        TradeEvent::PaymentConfirmed(data) => {
            let payload = json!({
                "trade_id": trade_id,
                "billed_quantity": trade.quote().billed_quantity,
                "total_amount": trade.quote().total_amount,
                "completed_at": data.occurred_at,
            });
            vec![
                NotificationIntent::new(buyer, NotificationKind::TradeCompleted, payload.clone()),
                NotificationIntent::new(seller, NotificationKind::TradeCompleted, payload),
            ]
        }
        TradeEvent::PaymentNotReceived(data) => vec![NotificationIntent::new(
            buyer,
            NotificationKind::PaymentNotReceived,
            json!({ "trade_id": trade_id, "note": data.note }),
        )],
        TradeEvent::TradeCancelled(data) => {
            let recipient = trade
                .counterparty_of(data.cancelled_by)
                .unwrap_or(data.cancelled_by);
            vec![NotificationIntent::new(
                recipient,
                NotificationKind::TradeCancelled,
                json!({ "trade_id": trade_id, "reason": data.reason }),
            )]
        }
    }
}
