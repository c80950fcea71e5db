//! Trade lifecycle engine for peer-to-peer energy trades.
//!
//! This crate owns the [`Trade`] aggregate and its state machine. Every
//! inbound party action maps to one role-gated operation on
//! [`TradeService`]: the operation loads the trade, verifies authorization
//! and current-state legality, optionally re-quotes through the pricing
//! engine, commits the new state with a compare-and-swap on the prior
//! status, and returns the updated trade plus a list of
//! [`NotificationIntent`] values for the caller to deliver.
//!
//! The engine never talks to a transport, never retries internally, and
//! never mutates a trade that has reached a terminal status.

pub mod commands;
pub mod error;
pub mod events;
pub mod memory;
pub mod notification;
pub mod service;
pub mod state;
pub mod stats;
pub mod store;
pub mod trade;

pub use commands::{
    AcceptTrade, ActivateDelivery, CancelTrade, ConfirmDeliveryStarted, ConfirmPaymentReceived,
    ConfirmQuantity, DeclarePayment, DeclareQuantity, DisputeQuantity, MarkArrived, OpenTrade,
    RejectTrade, ReportDeliveryFailed, ReportPaymentNotReceived,
};
pub use error::EngineError;
pub use events::TradeEvent;
pub use memory::InMemoryTradeStore;
pub use notification::{NotificationIntent, NotificationKind};
pub use service::{TradeOutcome, TradeService};
pub use state::TradeStatus;
pub use stats::{CreditRecord, InMemoryStatistics, StatisticsError, TradeStatistics};
pub use store::{StoreError, TradeStore};
pub use trade::{Issue, Trade, TradeError, TradeRole};
