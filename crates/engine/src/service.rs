//! Trade service providing a simplified API for lifecycle operations.

use common::TradeId;

use crate::commands::{
    AcceptTrade, ActivateDelivery, CancelTrade, ConfirmDeliveryStarted, ConfirmPaymentReceived,
    ConfirmQuantity, DeclarePayment, DeclareQuantity, DisputeQuantity, MarkArrived, OpenTrade,
    RejectTrade, ReportDeliveryFailed, ReportPaymentNotReceived,
};
use crate::error::EngineError;
use crate::events::TradeEvent;
use crate::notification::{self, NotificationIntent};
use crate::state::TradeStatus;
use crate::stats::TradeStatistics;
use crate::store::{StoreError, TradeStore};
use crate::trade::{Trade, TradeError, TradeRole};

/// Result of a successful lifecycle operation.
#[derive(Debug)]
pub struct TradeOutcome {
    /// The trade after the committed transition.
    pub trade: Trade,

    /// The event that was committed.
    pub event: TradeEvent,

    /// Notification intents for the caller to deliver.
    pub intents: Vec<NotificationIntent>,
}

/// Service for driving trades through their lifecycle.
///
/// Each operation loads the trade, validates authorization and state,
/// applies the transition, and commits it with a compare-and-swap on the
/// prior status. A failed compare-and-swap surfaces as
/// [`StoreError::Conflict`]; the service never retries on its own.
pub struct TradeService<S: TradeStore, X: TradeStatistics> {
    store: S,
    stats: X,
}

impl<S: TradeStore, X: TradeStatistics> TradeService<S, X> {
    /// Creates a new trade service over a store and a statistics sink.
    pub fn new(store: S, stats: X) -> Self {
        Self { store, stats }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the statistics sink.
    pub fn statistics(&self) -> &X {
        &self.stats
    }

    /// Opens a new trade: quotes the requested quantity against the offer
    /// and persists the trade awaiting seller confirmation.
    #[tracing::instrument(skip(self))]
    pub async fn open_trade(&self, cmd: OpenTrade) -> Result<TradeOutcome, EngineError> {
        let offer = self.store.load_offer(cmd.offer_id).await?;

        if cmd.buyer_id == offer.seller_id() {
            return Err(TradeError::SelfTradeNotAllowed.into());
        }

        let quote = offer.quote(cmd.requested_quantity)?;
        let (trade, event) = Trade::open(
            cmd.trade_id,
            cmd.buyer_id,
            offer.seller_id(),
            cmd.offer_id,
            quote,
        )?;

        self.store.save_trade(&trade, None).await?;
        metrics::counter!("trades_opened_total").increment(1);

        let intents = notification::intents_for(&trade, &event);
        Ok(TradeOutcome {
            trade,
            event,
            intents,
        })
    }

    /// Seller accepts a trade request.
    #[tracing::instrument(skip(self))]
    pub async fn accept_trade(&self, cmd: AcceptTrade) -> Result<TradeOutcome, EngineError> {
        self.execute(cmd.trade_id, |trade| trade.accept(cmd.seller_id))
            .await
    }

    /// Seller rejects a trade request.
    #[tracing::instrument(skip(self))]
    pub async fn reject_trade(&self, cmd: RejectTrade) -> Result<TradeOutcome, EngineError> {
        self.execute(cmd.trade_id, |trade| trade.reject(cmd.seller_id, cmd.reason.clone()))
            .await
    }

    /// Buyer reports arrival at the delivery point.
    #[tracing::instrument(skip(self))]
    pub async fn mark_arrived(&self, cmd: MarkArrived) -> Result<TradeOutcome, EngineError> {
        self.execute(cmd.trade_id, |trade| trade.mark_arrived(cmd.buyer_id))
            .await
    }

    /// Seller activates delivery.
    #[tracing::instrument(skip(self))]
    pub async fn activate_delivery(
        &self,
        cmd: ActivateDelivery,
    ) -> Result<TradeOutcome, EngineError> {
        self.execute(cmd.trade_id, |trade| trade.activate_delivery(cmd.seller_id))
            .await
    }

    /// Buyer reports that activation did not result in delivery.
    #[tracing::instrument(skip(self))]
    pub async fn report_delivery_failed(
        &self,
        cmd: ReportDeliveryFailed,
    ) -> Result<TradeOutcome, EngineError> {
        self.execute(cmd.trade_id, |trade| {
            trade.report_delivery_failed(cmd.buyer_id, cmd.note.clone())
        })
        .await
    }

    /// Buyer confirms the commodity is flowing.
    #[tracing::instrument(skip(self))]
    pub async fn confirm_delivery_started(
        &self,
        cmd: ConfirmDeliveryStarted,
    ) -> Result<TradeOutcome, EngineError> {
        self.execute(cmd.trade_id, |trade| {
            trade.confirm_delivery_started(cmd.buyer_id)
        })
        .await
    }

    /// Buyer declares the delivered quantity; the quote is recomputed
    /// against the trade's offer.
    #[tracing::instrument(skip(self))]
    pub async fn declare_quantity(
        &self,
        cmd: DeclareQuantity,
    ) -> Result<TradeOutcome, EngineError> {
        let mut trade = self.store.load_trade(cmd.trade_id).await?;

        // Gate quotation on authorization and state so no price is computed
        // for a declaration that would be rejected anyway.
        trade.ensure_can_declare_quantity(cmd.buyer_id)?;

        let offer = self.store.load_offer(trade.offer_id()).await?;
        let quote = offer.quote(cmd.quantity)?;

        let prior_status = trade.status();
        let event = trade.declare_quantity(cmd.buyer_id, quote)?;
        trade.apply(&event);

        self.commit(trade, prior_status, event).await
    }

    /// Seller confirms the declared quantity; payment becomes due.
    #[tracing::instrument(skip(self))]
    pub async fn confirm_quantity(
        &self,
        cmd: ConfirmQuantity,
    ) -> Result<TradeOutcome, EngineError> {
        self.execute(cmd.trade_id, |trade| trade.confirm_quantity(cmd.seller_id))
            .await
    }

    /// Seller disputes the declared quantity.
    #[tracing::instrument(skip(self))]
    pub async fn dispute_quantity(
        &self,
        cmd: DisputeQuantity,
    ) -> Result<TradeOutcome, EngineError> {
        self.execute(cmd.trade_id, |trade| {
            trade.dispute_quantity(cmd.seller_id, cmd.note.clone())
        })
        .await
    }

    /// Buyer declares the payment as sent.
    #[tracing::instrument(skip(self))]
    pub async fn declare_payment(
        &self,
        cmd: DeclarePayment,
    ) -> Result<TradeOutcome, EngineError> {
        self.execute(cmd.trade_id, |trade| trade.declare_payment(cmd.buyer_id))
            .await
    }

    /// Seller confirms payment receipt; the trade completes and both
    /// parties' statistics are credited.
    #[tracing::instrument(skip(self))]
    pub async fn confirm_payment_received(
        &self,
        cmd: ConfirmPaymentReceived,
    ) -> Result<TradeOutcome, EngineError> {
        self.execute(cmd.trade_id, |trade| {
            trade.confirm_payment_received(cmd.seller_id)
        })
        .await
    }

    /// Seller reports the declared payment never arrived.
    #[tracing::instrument(skip(self))]
    pub async fn report_payment_not_received(
        &self,
        cmd: ReportPaymentNotReceived,
    ) -> Result<TradeOutcome, EngineError> {
        self.execute(cmd.trade_id, |trade| {
            trade.report_payment_not_received(cmd.seller_id, cmd.note.clone())
        })
        .await
    }

    /// Either party cancels the trade.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_trade(&self, cmd: CancelTrade) -> Result<TradeOutcome, EngineError> {
        self.execute(cmd.trade_id, |trade| {
            trade.cancel(cmd.party_id, cmd.reason.clone())
        })
        .await
    }

    /// Loads a trade by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_trade(&self, trade_id: TradeId) -> Result<Trade, EngineError> {
        Ok(self.store.load_trade(trade_id).await?)
    }

    /// Executes a command against a loaded trade and commits the result.
    ///
    /// The command function receives the current aggregate state and returns
    /// either the event to apply, or an error. Rejections leave the stored
    /// trade untouched.
    async fn execute<F>(
        &self,
        trade_id: TradeId,
        command_fn: F,
    ) -> Result<TradeOutcome, EngineError>
    where
        F: FnOnce(&Trade) -> Result<TradeEvent, TradeError>,
    {
        let mut trade = self.store.load_trade(trade_id).await?;
        let prior_status = trade.status();

        let event = command_fn(&trade)?;
        trade.apply(&event);

        self.commit(trade, prior_status, event).await
    }

    /// Commits an applied transition with a compare-and-swap on the prior
    /// status, then performs post-commit side effects.
    async fn commit(
        &self,
        trade: Trade,
        prior_status: TradeStatus,
        event: TradeEvent,
    ) -> Result<TradeOutcome, EngineError> {
        if let Err(err) = self.store.save_trade(&trade, Some(prior_status)).await {
            if matches!(err, StoreError::Conflict { .. }) {
                metrics::counter!("trade_conflicts_total").increment(1);
            }
            return Err(err.into());
        }

        match &event {
            // Crediting is gated on the CAS-protected transition into
            // Completed, so it runs exactly once per trade: a retried
            // confirmation hits TradeFinalized before this point.
            TradeEvent::PaymentConfirmed(_) => {
                self.credit_completed(&trade).await?;
                metrics::counter!("trades_completed_total").increment(1);
            }
            TradeEvent::TradeRejected(_) | TradeEvent::TradeCancelled(_) => {
                metrics::counter!("trades_cancelled_total").increment(1);
            }
            _ => {}
        }

        let intents = notification::intents_for(&trade, &event);
        Ok(TradeOutcome {
            trade,
            event,
            intents,
        })
    }

    async fn credit_completed(&self, trade: &Trade) -> Result<(), EngineError> {
        let quantity = trade.quote().billed_quantity;
        self.stats
            .credit_completed_trade(trade.buyer_id(), TradeRole::Buyer, quantity)
            .await?;
        self.stats
            .credit_completed_trade(trade.seller_id(), TradeRole::Seller, quantity)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryTradeStore;
    use crate::stats::InMemoryStatistics;
    use common::{OfferId, PartyId};
    use pricing::Offer;
    use rust_decimal_macros::dec;

    async fn service_with_offer() -> (
        TradeService<InMemoryTradeStore, InMemoryStatistics>,
        Offer,
        PartyId,
    ) {
        let store = InMemoryTradeStore::new();
        let stats = InMemoryStatistics::new();
        let seller = PartyId::new();
        let offer = Offer::flat(OfferId::new(), seller, dec!(0.40)).with_minimum_quantity(dec!(10));
        store.insert_offer(offer.clone()).await;
        (TradeService::new(store, stats), offer, seller)
    }

    #[tokio::test]
    async fn open_trade_persists_and_notifies_the_seller() {
        let (service, offer, seller) = service_with_offer().await;
        let buyer = PartyId::new();

        let outcome = service
            .open_trade(OpenTrade::for_buyer(buyer, offer.id(), dec!(20)))
            .await
            .unwrap();

        assert_eq!(outcome.trade.status(), TradeStatus::AwaitingSellerConfirmation);
        assert_eq!(outcome.intents.len(), 1);
        assert_eq!(outcome.intents[0].recipient, seller);
        assert_eq!(service.store().trade_count().await, 1);
    }

    #[tokio::test]
    async fn open_trade_applies_the_minimum_guarantee() {
        let (service, offer, _) = service_with_offer().await;

        let outcome = service
            .open_trade(OpenTrade::for_buyer(PartyId::new(), offer.id(), dec!(5)))
            .await
            .unwrap();

        let quote = outcome.trade.quote();
        assert_eq!(quote.billed_quantity, dec!(10));
        assert_eq!(quote.total_amount, dec!(4.00));
        assert!(quote.minimum_applied);
    }

    #[tokio::test]
    async fn self_trade_is_rejected_and_nothing_is_persisted() {
        let (service, offer, seller) = service_with_offer().await;

        let result = service
            .open_trade(OpenTrade::for_buyer(seller, offer.id(), dec!(20)))
            .await;

        assert!(matches!(
            result,
            Err(EngineError::Trade(TradeError::SelfTradeNotAllowed))
        ));
        assert_eq!(service.store().trade_count().await, 0);
    }

    #[tokio::test]
    async fn invalid_quantity_is_rejected_and_nothing_is_persisted() {
        let (service, offer, _) = service_with_offer().await;

        let result = service
            .open_trade(OpenTrade::for_buyer(PartyId::new(), offer.id(), dec!(0)))
            .await;

        assert!(matches!(result, Err(EngineError::Pricing(_))));
        assert_eq!(service.store().trade_count().await, 0);
    }

    #[tokio::test]
    async fn unknown_offer_is_not_found() {
        let (service, _, _) = service_with_offer().await;

        let result = service
            .open_trade(OpenTrade::for_buyer(PartyId::new(), OfferId::new(), dec!(20)))
            .await;

        assert!(matches!(
            result,
            Err(EngineError::Store(StoreError::OfferNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn declare_quantity_requotes_against_the_offer() {
        let (service, offer, seller) = service_with_offer().await;
        let buyer = PartyId::new();

        let outcome = service
            .open_trade(OpenTrade::for_buyer(buyer, offer.id(), dec!(20)))
            .await
            .unwrap();
        let trade_id = outcome.trade.id();

        service
            .accept_trade(AcceptTrade::new(trade_id, seller))
            .await
            .unwrap();
        service
            .activate_delivery(ActivateDelivery::new(trade_id, seller))
            .await
            .unwrap();
        service
            .confirm_delivery_started(ConfirmDeliveryStarted::new(trade_id, buyer))
            .await
            .unwrap();

        let outcome = service
            .declare_quantity(DeclareQuantity::new(trade_id, buyer, dec!(17.5)))
            .await
            .unwrap();

        assert_eq!(outcome.trade.status(), TradeStatus::QuantityDeclared);
        assert_eq!(outcome.trade.quote().billed_quantity, dec!(17.5));
        assert_eq!(outcome.trade.quote().total_amount, dec!(7.00));
    }

    #[tokio::test]
    async fn completion_credits_both_parties_exactly_once() {
        let (service, offer, seller) = service_with_offer().await;
        let buyer = PartyId::new();

        let trade_id = service
            .open_trade(OpenTrade::for_buyer(buyer, offer.id(), dec!(20)))
            .await
            .unwrap()
            .trade
            .id();

        service
            .accept_trade(AcceptTrade::new(trade_id, seller))
            .await
            .unwrap();
        service
            .activate_delivery(ActivateDelivery::new(trade_id, seller))
            .await
            .unwrap();
        service
            .confirm_delivery_started(ConfirmDeliveryStarted::new(trade_id, buyer))
            .await
            .unwrap();
        service
            .declare_quantity(DeclareQuantity::new(trade_id, buyer, dec!(18)))
            .await
            .unwrap();
        service
            .confirm_quantity(ConfirmQuantity::new(trade_id, seller))
            .await
            .unwrap();
        service
            .declare_payment(DeclarePayment::new(trade_id, buyer))
            .await
            .unwrap();

        let outcome = service
            .confirm_payment_received(ConfirmPaymentReceived::new(trade_id, seller))
            .await
            .unwrap();

        assert_eq!(outcome.trade.status(), TradeStatus::Completed);
        assert_eq!(service.statistics().credit_count(), 2);
        assert_eq!(service.statistics().credits_for(buyer), 1);
        assert_eq!(service.statistics().credits_for(seller), 1);

        // A repeated confirmation fails on the terminal state and credits
        // nothing further.
        let retry = service
            .confirm_payment_received(ConfirmPaymentReceived::new(trade_id, seller))
            .await;
        assert!(matches!(
            retry,
            Err(EngineError::Trade(TradeError::TradeFinalized { .. }))
        ));
        assert_eq!(service.statistics().credit_count(), 2);
    }

    #[tokio::test]
    async fn rejection_leaves_the_stored_trade_unchanged() {
        let (service, offer, seller) = service_with_offer().await;
        let buyer = PartyId::new();

        let trade_id = service
            .open_trade(OpenTrade::for_buyer(buyer, offer.id(), dec!(20)))
            .await
            .unwrap()
            .trade
            .id();

        // Scenario: confirm-payment on a freshly opened trade.
        let result = service
            .confirm_payment_received(ConfirmPaymentReceived::new(trade_id, seller))
            .await;
        assert!(matches!(
            result,
            Err(EngineError::Trade(TradeError::IllegalTransition { .. }))
        ));

        let stored = service.get_trade(trade_id).await.unwrap();
        assert_eq!(stored.status(), TradeStatus::AwaitingSellerConfirmation);
        assert!(stored.issues().is_empty());
    }

    #[tokio::test]
    async fn get_trade_not_found() {
        let (service, _, _) = service_with_offer().await;

        let result = service.get_trade(TradeId::new()).await;
        assert!(matches!(
            result,
            Err(EngineError::Store(StoreError::TradeNotFound(_)))
        ));
    }
}
