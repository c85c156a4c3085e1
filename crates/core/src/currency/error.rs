//! Currency error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while building a rate table or normalizing an amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// The currency code is malformed or missing from the rate table.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// The amount to normalize is zero or negative.
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// A rate table entry is zero or negative.
    #[error("Exchange rate {from}/{to} must be positive, got {rate}")]
    NonPositiveRate {
        /// Source currency code.
        from: String,
        /// Target currency code.
        to: String,
        /// The offending rate.
        rate: Decimal,
    },

    /// The converted amount does not fit in a decimal.
    #[error("Amount {0} is out of range after conversion")]
    AmountOutOfRange(Decimal),

    /// Chaining two rates through the base currency does not fit in a decimal.
    #[error("Exchange rate {0} is out of range")]
    RateOutOfRange(String),

    /// A rate table entry converts a currency into itself.
    #[error("Exchange rate must convert between two different currencies, got {0}/{0}")]
    SameCurrency(String),
}

impl CurrencyError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::UnknownCurrency(_) | Self::AmountOutOfRange(_) | Self::RateOutOfRange(_) => 422,
            Self::NonPositiveAmount(_) | Self::NonPositiveRate { .. } | Self::SameCurrency(_) => {
                400
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::NonPositiveRate { .. } => "NON_POSITIVE_RATE",
            Self::SameCurrency(_) => "SAME_CURRENCY",
            Self::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
            Self::RateOutOfRange(_) => "RATE_OUT_OF_RANGE",
        }
    }
}
