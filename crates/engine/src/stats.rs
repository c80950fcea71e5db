//! Statistics collaborator.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::PartyId;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::trade::TradeRole;

/// Errors that can occur when crediting trade statistics.
#[derive(Debug, Clone, Error)]
pub enum StatisticsError {
    /// The statistics sink rejected or lost the credit.
    #[error("Statistics sink error: {0}")]
    Sink(String),
}

/// Counterparty statistics sink.
///
/// `credit_completed_trade` is invoked exactly once per trade, for each
/// party, on the committed transition into `Completed`; the engine never
/// re-invokes it for the same trade.
#[async_trait]
pub trait TradeStatistics: Send + Sync {
    /// Credits a completed trade to a party's statistics.
    async fn credit_completed_trade(
        &self,
        user_id: PartyId,
        role: TradeRole,
        quantity: Decimal,
    ) -> Result<(), StatisticsError>;
}

/// One recorded credit.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditRecord {
    /// Credited party.
    pub user_id: PartyId,

    /// Role the party played in the completed trade.
    pub role: TradeRole,

    /// Billed quantity of the completed trade.
    pub quantity: Decimal,
}

#[derive(Debug, Default)]
struct StatisticsState {
    credits: Vec<CreditRecord>,
    fail_on_credit: bool,
}

/// In-memory statistics sink for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStatistics {
    state: Arc<RwLock<StatisticsState>>,
}

impl InMemoryStatistics {
    /// Creates a new in-memory statistics sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the sink to fail on subsequent credit calls.
    pub fn set_fail_on_credit(&self, fail: bool) {
        self.state.write().unwrap().fail_on_credit = fail;
    }

    /// Returns the total number of recorded credits.
    pub fn credit_count(&self) -> usize {
        self.state.read().unwrap().credits.len()
    }

    /// Returns the number of credits recorded for a party.
    pub fn credits_for(&self, user_id: PartyId) -> usize {
        self.state
            .read()
            .unwrap()
            .credits
            .iter()
            .filter(|credit| credit.user_id == user_id)
            .count()
    }

    /// Returns all recorded credits, oldest first.
    pub fn credits(&self) -> Vec<CreditRecord> {
        self.state.read().unwrap().credits.clone()
    }
}

#[async_trait]
impl TradeStatistics for InMemoryStatistics {
    async fn credit_completed_trade(
        &self,
        user_id: PartyId,
        role: TradeRole,
        quantity: Decimal,
    ) -> Result<(), StatisticsError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_credit {
            return Err(StatisticsError::Sink("credit rejected".to_string()));
        }

        state.credits.push(CreditRecord {
            user_id,
            role,
            quantity,
        });

        Ok(())
    }
}
