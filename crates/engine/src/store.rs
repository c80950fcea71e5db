//! Persistent store collaborator.

use async_trait::async_trait;
use common::{OfferId, TradeId};
use pricing::Offer;
use thiserror::Error;

use crate::state::TradeStatus;
use crate::trade::Trade;

/// Errors that can occur when interacting with the trade store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The trade was not found.
    #[error("Trade not found: {0}")]
    TradeNotFound(TradeId),

    /// The offer was not found.
    #[error("Offer not found: {0}")]
    OfferNotFound(OfferId),

    /// A new trade collides with an already-stored one.
    #[error("Trade already exists: {0}")]
    TradeExists(TradeId),

    /// A concurrency conflict occurred when saving a trade.
    /// The expected prior status did not match the stored status.
    #[error(
        "Concurrency conflict for trade {trade_id}: expected {expected} status, found {actual}"
    )]
    Conflict {
        trade_id: TradeId,
        expected: TradeStatus,
        actual: TradeStatus,
    },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Narrow persistence contract for the lifecycle engine.
///
/// The engine never issues ad-hoc queries; every access goes through these
/// three operations. Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait TradeStore: Send + Sync {
    /// Loads a trade by ID.
    async fn load_trade(&self, trade_id: TradeId) -> Result<Trade>;

    /// Saves a trade, conditionally on its stored status.
    ///
    /// With `expected_prior_status = Some(status)` the write commits only if
    /// the stored trade still has that status (compare-and-swap); a mismatch
    /// fails with [`StoreError::Conflict`] and writes nothing. With `None`
    /// the trade must not exist yet.
    ///
    /// The save is atomic: either the whole aggregate is written or nothing
    /// is.
    async fn save_trade(
        &self,
        trade: &Trade,
        expected_prior_status: Option<TradeStatus>,
    ) -> Result<()>;

    /// Loads an offer by ID.
    async fn load_offer(&self, offer_id: OfferId) -> Result<Offer>;
}
