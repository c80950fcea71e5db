//! Trade aggregate implementation.

use chrono::{DateTime, Utc};
use common::{OfferId, PartyId, TradeId};
use pricing::Quote;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::TradeEvent;
use crate::state::TradeStatus;

/// The role a party plays in a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeRole {
    /// The party buying the commodity.
    Buyer,

    /// The party delivering the commodity.
    Seller,
}

impl std::fmt::Display for TradeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeRole::Buyer => write!(f, "buyer"),
            TradeRole::Seller => write!(f, "seller"),
        }
    }
}

/// One entry in a trade's append-only audit trail.
///
/// Issues record disputes, failures, and cancellations. They are never
/// deleted or edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Party who raised the issue.
    pub raised_by: PartyId,

    /// Free-text description supplied by that party.
    pub note: String,

    /// When the issue was raised.
    pub raised_at: DateTime<Utc>,
}

/// Errors that can occur during trade operations.
#[derive(Debug, Clone, Error)]
pub enum TradeError {
    /// The acting party is not allowed to perform this operation.
    #[error("Party {party} is not authorized to {action} trade {trade_id}")]
    Unauthorized {
        trade_id: TradeId,
        party: PartyId,
        action: &'static str,
    },

    /// A party tried to trade with itself.
    #[error("Buyer and seller must be distinct parties")]
    SelfTradeNotAllowed,

    /// The trade is not in a status that permits this operation.
    #[error("Illegal transition: cannot {action} from {status} status")]
    IllegalTransition {
        status: TradeStatus,
        action: &'static str,
    },

    /// The trade has reached a terminal status and can no longer change.
    #[error("Trade is finalized ({status}); no further operations are allowed")]
    TradeFinalized { status: TradeStatus },
}

/// Trade aggregate root.
///
/// One instance per accepted purchase intent, progressing through the
/// lifecycle state machine from creation to completion or cancellation.
/// Command methods validate authorization and state and return a
/// [`TradeEvent`]; [`Trade::apply`] folds a validated event into the
/// aggregate. The aggregate performs no I/O.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique trade identifier.
    id: TradeId,

    /// Party buying the commodity.
    buyer_id: PartyId,

    /// Party delivering the commodity.
    seller_id: PartyId,

    /// The offer the current quote was computed from.
    offer_id: OfferId,

    /// Current lifecycle status.
    status: TradeStatus,

    /// Current quote; recomputed whenever the billed quantity changes.
    quote: Quote,

    /// Append-only dispute/audit trail.
    issues: Vec<Issue>,

    /// Number of times the seller was asked to re-attempt delivery
    /// activation.
    retry_count: u32,

    /// When the trade was created.
    created_at: DateTime<Utc>,

    /// When the trade last changed.
    updated_at: DateTime<Utc>,

    /// When the trade reached `Completed`; set exactly once.
    completed_at: Option<DateTime<Utc>>,
}

// Query methods
impl Trade {
    /// Returns the trade ID.
    pub fn id(&self) -> TradeId {
        self.id
    }

    /// Returns the buyer.
    pub fn buyer_id(&self) -> PartyId {
        self.buyer_id
    }

    /// Returns the seller.
    pub fn seller_id(&self) -> PartyId {
        self.seller_id
    }

    /// Returns the offer this trade prices against.
    pub fn offer_id(&self) -> OfferId {
        self.offer_id
    }

    /// Returns the current status.
    pub fn status(&self) -> TradeStatus {
        self.status
    }

    /// Returns the current quote.
    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    /// Returns the audit trail, oldest first.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Returns the delivery-activation retry count.
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Returns when the trade was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the trade last changed.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns when the trade completed, if it has.
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns true if the trade is in a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns the role `party` plays in this trade, if any.
    pub fn role_of(&self, party: PartyId) -> Option<TradeRole> {
        if party == self.buyer_id {
            Some(TradeRole::Buyer)
        } else if party == self.seller_id {
            Some(TradeRole::Seller)
        } else {
            None
        }
    }

    /// Returns the other party of `party`, if `party` is part of the trade.
    pub fn counterparty_of(&self, party: PartyId) -> Option<PartyId> {
        match self.role_of(party)? {
            TradeRole::Buyer => Some(self.seller_id),
            TradeRole::Seller => Some(self.buyer_id),
        }
    }
}

// Command methods (return events)
impl Trade {
    /// Opens a new trade from a buyer's request.
    ///
    /// The quote must already be computed against the referenced offer;
    /// opening fails if buyer and seller are the same party.
    pub fn open(
        id: TradeId,
        buyer_id: PartyId,
        seller_id: PartyId,
        offer_id: OfferId,
        quote: Quote,
    ) -> Result<(Self, TradeEvent), TradeError> {
        if buyer_id == seller_id {
            return Err(TradeError::SelfTradeNotAllowed);
        }

        let event = TradeEvent::trade_requested(id, buyer_id, seller_id, offer_id, quote.clone());
        let occurred_at = event.occurred_at();

        let trade = Self {
            id,
            buyer_id,
            seller_id,
            offer_id,
            status: TradeStatus::AwaitingSellerConfirmation,
            quote,
            issues: Vec::new(),
            retry_count: 0,
            created_at: occurred_at,
            updated_at: occurred_at,
            completed_at: None,
        };

        Ok((trade, event))
    }

    /// Seller accepts the trade request.
    pub fn accept(&self, actor: PartyId) -> Result<TradeEvent, TradeError> {
        self.authorize(actor, TradeRole::Seller, "accept")?;
        self.check_transition(self.status.can_accept(), "accept")?;

        Ok(TradeEvent::trade_accepted())
    }

    /// Seller rejects the trade request.
    pub fn reject(
        &self,
        actor: PartyId,
        reason: impl Into<String>,
    ) -> Result<TradeEvent, TradeError> {
        self.authorize(actor, TradeRole::Seller, "reject")?;
        self.check_transition(self.status.can_accept(), "reject")?;

        Ok(TradeEvent::trade_rejected(reason))
    }

    /// Buyer reports arrival at the delivery point.
    pub fn mark_arrived(&self, actor: PartyId) -> Result<TradeEvent, TradeError> {
        self.authorize(actor, TradeRole::Buyer, "mark arrival on")?;
        self.check_transition(self.status.can_mark_arrived(), "mark arrival on")?;

        Ok(TradeEvent::buyer_arrived())
    }

    /// Seller activates delivery.
    pub fn activate_delivery(&self, actor: PartyId) -> Result<TradeEvent, TradeError> {
        self.authorize(actor, TradeRole::Seller, "activate delivery on")?;
        self.check_transition(self.status.can_activate_delivery(), "activate delivery on")?;

        Ok(TradeEvent::delivery_activated())
    }

    /// Buyer reports that activation did not result in delivery.
    pub fn report_delivery_failed(
        &self,
        actor: PartyId,
        note: impl Into<String>,
    ) -> Result<TradeEvent, TradeError> {
        self.authorize(actor, TradeRole::Buyer, "report delivery failure on")?;
        self.check_transition(
            self.status.can_report_delivery_failed(),
            "report delivery failure on",
        )?;

        Ok(TradeEvent::delivery_failed(note))
    }

    /// Buyer confirms the commodity is flowing.
    pub fn confirm_delivery_started(&self, actor: PartyId) -> Result<TradeEvent, TradeError> {
        self.authorize(actor, TradeRole::Buyer, "confirm delivery on")?;
        self.check_transition(
            self.status.can_confirm_delivery_started(),
            "confirm delivery on",
        )?;

        Ok(TradeEvent::delivery_started())
    }

    /// Checks that a quantity declaration by `actor` would be legal.
    ///
    /// Lets the caller gate quotation on authorization and state, so no
    /// price is computed for a declaration that would be rejected anyway.
    pub fn ensure_can_declare_quantity(&self, actor: PartyId) -> Result<(), TradeError> {
        self.authorize(actor, TradeRole::Buyer, "declare quantity on")?;
        self.check_transition(self.status.can_declare_quantity(), "declare quantity on")
    }

    /// Buyer declares the delivered quantity.
    ///
    /// `quote` must be freshly computed for the declared quantity against
    /// the trade's offer. From `QuantityDeclared` this re-declares,
    /// resolving an open dispute.
    pub fn declare_quantity(&self, actor: PartyId, quote: Quote) -> Result<TradeEvent, TradeError> {
        self.ensure_can_declare_quantity(actor)?;

        Ok(TradeEvent::quantity_declared(quote))
    }

    /// Seller confirms the declared quantity; payment becomes due.
    pub fn confirm_quantity(&self, actor: PartyId) -> Result<TradeEvent, TradeError> {
        self.authorize(actor, TradeRole::Seller, "confirm quantity on")?;
        self.check_transition(self.status.can_confirm_quantity(), "confirm quantity on")?;

        Ok(TradeEvent::quantity_confirmed())
    }

    /// Seller disputes the declared quantity.
    ///
    /// The trade stays in `QuantityDeclared` with the billed quantity
    /// unchanged; the buyer resolves the dispute by re-declaring.
    pub fn dispute_quantity(
        &self,
        actor: PartyId,
        note: impl Into<String>,
    ) -> Result<TradeEvent, TradeError> {
        self.authorize(actor, TradeRole::Seller, "dispute quantity on")?;
        self.check_transition(self.status.can_confirm_quantity(), "dispute quantity on")?;

        Ok(TradeEvent::quantity_disputed(note))
    }

    /// Buyer declares the payment as sent.
    pub fn declare_payment(&self, actor: PartyId) -> Result<TradeEvent, TradeError> {
        self.authorize(actor, TradeRole::Buyer, "declare payment on")?;
        self.check_transition(self.status.can_declare_payment(), "declare payment on")?;

        Ok(TradeEvent::payment_declared())
    }

    /// Seller confirms payment receipt; the trade completes.
    pub fn confirm_payment_received(&self, actor: PartyId) -> Result<TradeEvent, TradeError> {
        self.authorize(actor, TradeRole::Seller, "confirm payment on")?;
        self.check_transition(self.status.can_confirm_payment(), "confirm payment on")?;

        Ok(TradeEvent::payment_confirmed())
    }

    /// Seller reports the declared payment never arrived.
    ///
    /// The trade moves back to `PaymentRequested` so the buyer can declare
    /// again.
    pub fn report_payment_not_received(
        &self,
        actor: PartyId,
        note: impl Into<String>,
    ) -> Result<TradeEvent, TradeError> {
        self.authorize(actor, TradeRole::Seller, "report missing payment on")?;
        self.check_transition(self.status.can_confirm_payment(), "report missing payment on")?;

        Ok(TradeEvent::payment_not_received(note))
    }

    /// Either party cancels the trade.
    pub fn cancel(
        &self,
        actor: PartyId,
        reason: impl Into<String>,
    ) -> Result<TradeEvent, TradeError> {
        if self.role_of(actor).is_none() {
            return Err(TradeError::Unauthorized {
                trade_id: self.id,
                party: actor,
                action: "cancel",
            });
        }
        self.check_transition(self.status.can_cancel(), "cancel")?;

        Ok(TradeEvent::trade_cancelled(actor, reason))
    }

    /// Verifies `actor` holds `role` in this trade.
    fn authorize(
        &self,
        actor: PartyId,
        role: TradeRole,
        action: &'static str,
    ) -> Result<(), TradeError> {
        if self.role_of(actor) == Some(role) {
            Ok(())
        } else {
            Err(TradeError::Unauthorized {
                trade_id: self.id,
                party: actor,
                action,
            })
        }
    }

    /// Verifies the current status admits the transition.
    ///
    /// A terminal trade always fails with `TradeFinalized`, whatever the
    /// operation.
    fn check_transition(&self, allowed: bool, action: &'static str) -> Result<(), TradeError> {
        if self.status.is_terminal() {
            return Err(TradeError::TradeFinalized {
                status: self.status,
            });
        }
        if !allowed {
            return Err(TradeError::IllegalTransition {
                status: self.status,
                action,
            });
        }
        Ok(())
    }
}

// Apply (fold a validated event into state)
impl Trade {
    /// Applies an event to the aggregate, updating its state.
    ///
    /// Pure and deterministic: events are facts, so apply never fails and
    /// has no side effects beyond the aggregate itself.
    pub fn apply(&mut self, event: &TradeEvent) {
        self.updated_at = event.occurred_at();

        match event {
            TradeEvent::TradeRequested(_) => {
                // Aggregate construction happens in `open`.
            }
            TradeEvent::TradeAccepted(_) => {
                self.status = TradeStatus::Confirmed;
            }
            TradeEvent::TradeRejected(data) => {
                self.push_issue(self.seller_id, data.reason.clone(), data.occurred_at);
                self.status = TradeStatus::Cancelled;
            }
            TradeEvent::BuyerArrived(_) => {
                self.status = TradeStatus::BuyerArrived;
            }
            TradeEvent::DeliveryActivated(_) => {
                self.status = TradeStatus::DeliveryActivated;
            }
            TradeEvent::DeliveryFailed(data) => {
                self.retry_count += 1;
                self.push_issue(self.buyer_id, data.note.clone(), data.occurred_at);
                self.status = TradeStatus::DeliveryActivated;
            }
            TradeEvent::DeliveryStarted(_) => {
                self.status = TradeStatus::DeliveryInProgress;
            }
            TradeEvent::QuantityDeclared(data) => {
                self.quote = data.quote.clone();
                self.status = TradeStatus::QuantityDeclared;
            }
            TradeEvent::QuantityConfirmed(_) => {
                self.status = TradeStatus::PaymentRequested;
            }
            TradeEvent::QuantityDisputed(data) => {
                self.push_issue(self.seller_id, data.note.clone(), data.occurred_at);
                self.status = TradeStatus::QuantityDeclared;
            }
            TradeEvent::PaymentDeclared(_) => {
                self.status = TradeStatus::PaymentDeclared;
            }
            TradeEvent::PaymentConfirmed(data) => {
                if self.completed_at.is_none() {
                    self.completed_at = Some(data.occurred_at);
                }
                self.status = TradeStatus::Completed;
            }
            TradeEvent::PaymentNotReceived(data) => {
                self.push_issue(self.seller_id, data.note.clone(), data.occurred_at);
                self.status = TradeStatus::PaymentRequested;
            }
            TradeEvent::TradeCancelled(data) => {
                self.push_issue(data.cancelled_by, data.reason.clone(), data.occurred_at);
                self.status = TradeStatus::Cancelled;
            }
        }
    }

    fn push_issue(&mut self, raised_by: PartyId, note: String, raised_at: DateTime<Utc>) {
        self.issues.push(Issue {
            raised_by,
            note,
            raised_at,
        });
    }
}
