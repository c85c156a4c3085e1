//! Currency normalization into the organization's base currency.
//!
//! # Modules
//!
//! - `conversion` - Rounding-aware amount conversion
//! - `exchange` - Exchange rate entries
//! - `rates` - Immutable rate table with direct, inverse and triangulated lookup
//! - `service` - The normalizer used at claim submission
//! - `error` - Currency error types

pub mod conversion;
pub mod error;
pub mod exchange;
pub mod rates;
pub mod service;

#[cfg(test)]
mod props;

pub use conversion::{MINOR_UNIT_PRECISION, convert_amount};
pub use error::CurrencyError;
pub use exchange::ExchangeRate;
pub use rates::{RateLookup, RateLookupMethod, RateTable};
pub use service::CurrencyNormalizer;
