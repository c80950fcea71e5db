//! Engine error types.

use pricing::PricingError;
use thiserror::Error;

use crate::stats::StatisticsError;
use crate::store::StoreError;
use crate::trade::TradeError;

/// Errors that can occur during engine operations.
///
/// `Store(Conflict)` is the only transient variant: the caller may retry
/// with a fresh read. Every other variant means the operation was rejected
/// and the trade is unchanged.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An error occurred in the store collaborator.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The trade rejected the operation.
    #[error("Trade error: {0}")]
    Trade(#[from] TradeError),

    /// The pricing engine rejected the quantity or offer.
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// The statistics sink failed after the trade was committed.
    #[error("Statistics error: {0}")]
    Statistics(#[from] StatisticsError),
}

impl EngineError {
    /// Returns true if the error is transient and safe to retry with a
    /// fresh read.
    pub fn is_conflict(&self) -> bool {
        matches!(self, EngineError::Store(StoreError::Conflict { .. }))
    }
}
