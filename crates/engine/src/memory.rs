//! In-memory trade store implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{OfferId, TradeId};
use pricing::Offer;
use tokio::sync::RwLock;

use crate::state::TradeStatus;
use crate::store::{Result, StoreError, TradeStore};
use crate::trade::Trade;

/// In-memory trade store for testing.
///
/// Provides the same compare-and-swap semantics a database-backed
/// implementation must provide: the status check and the write happen under
/// one write lock, so a concurrent transition can never be silently
/// overwritten.
#[derive(Clone, Default)]
pub struct InMemoryTradeStore {
    trades: Arc<RwLock<HashMap<TradeId, Trade>>>,
    offers: Arc<RwLock<HashMap<OfferId, Offer>>>,
}

impl InMemoryTradeStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an offer to the catalog.
    pub async fn insert_offer(&self, offer: Offer) {
        self.offers.write().await.insert(offer.id(), offer);
    }

    /// Returns the number of stored trades.
    pub async fn trade_count(&self) -> usize {
        self.trades.read().await.len()
    }

    /// Clears all trades and offers.
    pub async fn clear(&self) {
        self.trades.write().await.clear();
        self.offers.write().await.clear();
    }
}

#[async_trait]
impl TradeStore for InMemoryTradeStore {
    async fn load_trade(&self, trade_id: TradeId) -> Result<Trade> {
        let trades = self.trades.read().await;
        trades
            .get(&trade_id)
            .cloned()
            .ok_or(StoreError::TradeNotFound(trade_id))
    }

    async fn save_trade(
        &self,
        trade: &Trade,
        expected_prior_status: Option<TradeStatus>,
    ) -> Result<()> {
        let mut trades = self.trades.write().await;

        match expected_prior_status {
            None => {
                if trades.contains_key(&trade.id()) {
                    return Err(StoreError::TradeExists(trade.id()));
                }
            }
            Some(expected) => {
                let stored = trades
                    .get(&trade.id())
                    .ok_or(StoreError::TradeNotFound(trade.id()))?;
                if stored.status() != expected {
                    return Err(StoreError::Conflict {
                        trade_id: trade.id(),
                        expected,
                        actual: stored.status(),
                    });
                }
            }
        }

        trades.insert(trade.id(), trade.clone());
        Ok(())
    }

    async fn load_offer(&self, offer_id: OfferId) -> Result<Offer> {
        let offers = self.offers.read().await;
        offers
            .get(&offer_id)
            .cloned()
            .ok_or(StoreError::OfferNotFound(offer_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::PartyId;
    use rust_decimal_macros::dec;

    fn sample_trade() -> Trade {
        let seller = PartyId::new();
        let offer = Offer::flat(OfferId::new(), seller, dec!(0.40));
        let quote = offer.quote(dec!(10)).unwrap();
        let (trade, _) =
            Trade::open(TradeId::new(), PartyId::new(), seller, offer.id(), quote).unwrap();
        trade
    }

    #[tokio::test]
    async fn save_new_and_load() {
        let store = InMemoryTradeStore::new();
        let trade = sample_trade();

        store.save_trade(&trade, None).await.unwrap();

        let loaded = store.load_trade(trade.id()).await.unwrap();
        assert_eq!(loaded, trade);
        assert_eq!(store.trade_count().await, 1);
    }

    #[tokio::test]
    async fn save_new_twice_conflicts() {
        let store = InMemoryTradeStore::new();
        let trade = sample_trade();

        store.save_trade(&trade, None).await.unwrap();
        let result = store.save_trade(&trade, None).await;

        assert!(matches!(result, Err(StoreError::TradeExists(_))));
    }

    #[tokio::test]
    async fn cas_succeeds_on_matching_status() {
        let store = InMemoryTradeStore::new();
        let mut trade = sample_trade();
        store.save_trade(&trade, None).await.unwrap();

        let seller = trade.seller_id();
        let prior = trade.status();
        trade.apply(&trade.accept(seller).unwrap());

        store.save_trade(&trade, Some(prior)).await.unwrap();

        let loaded = store.load_trade(trade.id()).await.unwrap();
        assert_eq!(loaded.status(), TradeStatus::Confirmed);
    }

    #[tokio::test]
    async fn cas_conflicts_on_stale_status() {
        let store = InMemoryTradeStore::new();
        let mut trade = sample_trade();
        store.save_trade(&trade, None).await.unwrap();

        let seller = trade.seller_id();
        let prior = trade.status();
        trade.apply(&trade.accept(seller).unwrap());
        store.save_trade(&trade, Some(prior)).await.unwrap();

        // A second writer still holding the pre-accept snapshot loses.
        let result = store
            .save_trade(&trade, Some(TradeStatus::AwaitingSellerConfirmation))
            .await;

        assert!(matches!(
            result,
            Err(StoreError::Conflict {
                expected: TradeStatus::AwaitingSellerConfirmation,
                actual: TradeStatus::Confirmed,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn cas_on_missing_trade_is_not_found() {
        let store = InMemoryTradeStore::new();
        let trade = sample_trade();

        let result = store
            .save_trade(&trade, Some(TradeStatus::AwaitingSellerConfirmation))
            .await;

        assert!(matches!(result, Err(StoreError::TradeNotFound(_))));
    }

    #[tokio::test]
    async fn missing_trade_and_offer_are_not_found() {
        let store = InMemoryTradeStore::new();

        assert!(matches!(
            store.load_trade(TradeId::new()).await,
            Err(StoreError::TradeNotFound(_))
        ));
        assert!(matches!(
            store.load_offer(OfferId::new()).await,
            Err(StoreError::OfferNotFound(_))
        ));
    }

    #[tokio::test]
    async fn offers_roundtrip() {
        let store = InMemoryTradeStore::new();
        let offer = Offer::flat(OfferId::new(), PartyId::new(), dec!(0.40));

        store.insert_offer(offer.clone()).await;

        let loaded = store.load_offer(offer.id()).await.unwrap();
        assert_eq!(loaded, offer);
    }
}
