use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while validating an offer or computing a quote.
#[derive(Debug, Clone, Error)]
pub enum PricingError {
    /// The requested quantity is not a positive amount.
    #[error("Invalid quantity: {0} (must be greater than 0)")]
    InvalidQuantity(Decimal),

    /// The offer's pricing configuration violates an invariant.
    #[error("Invalid offer configuration: {0}")]
    InvalidOfferConfiguration(String),

    /// The catalog supplied a pricing policy tag this engine does not know.
    #[error("Unsupported pricing policy: {0}")]
    UnsupportedPricingPolicy(String),
}

/// Result type for pricing operations.
pub type Result<T> = std::result::Result<T, PricingError>;
