//! Currency normalizer for claim submission.
//!
//! Converts a claim's original amount into the organization's base currency
//! using the current rate table, rounding to the base currency's minor unit
//! with round half up.

use rust_decimal::Decimal;
use spendflow_shared::types::CurrencyCode;

use super::conversion::{MINOR_UNIT_PRECISION, convert_amount};
use super::error::CurrencyError;
use super::rates::RateTable;

/// Stateless normalizer over a rate table.
pub struct CurrencyNormalizer;

impl CurrencyNormalizer {
    /// Normalize `amount` in `source` into `base`.
    ///
    /// # Arguments
    ///
    /// * `rates` - The rate table snapshot to convert with
    /// * `amount` - The original amount, must be positive
    /// * `source` - The original currency
    /// * `base` - The target (base) currency
    ///
    /// # Returns
    ///
    /// * `Ok(amount)` rounded to two decimal places
    /// * `Err(CurrencyError::NonPositiveAmount)` for zero or negative amounts
    /// * `Err(CurrencyError::UnknownCurrency)` if either code is not in the table
    /// * `Err(CurrencyError::AmountOutOfRange)` if the converted amount overflows
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use rust_decimal_macros::dec;
    /// use spendflow_core::currency::{CurrencyNormalizer, ExchangeRate, RateTable};
    /// use spendflow_shared::types::CurrencyCode;
    ///
    /// let usd = CurrencyCode::parse("USD").unwrap();
    /// let eur = CurrencyCode::parse("EUR").unwrap();
    /// let date = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
    /// let rates = RateTable::new(
    ///     usd.clone(),
    ///     [ExchangeRate::new(eur.clone(), usd.clone(), dec!(1.10), date)],
    /// )
    /// .unwrap();
    ///
    /// let result = CurrencyNormalizer::normalize(&rates, dec!(100), &eur, &usd).unwrap();
    /// assert_eq!(result, dec!(110.00));
    /// ```
    pub fn normalize(
        rates: &RateTable,
        amount: Decimal,
        source: &CurrencyCode,
        base: &CurrencyCode,
    ) -> Result<Decimal, CurrencyError> {
        if amount <= Decimal::ZERO {
            return Err(CurrencyError::NonPositiveAmount(amount));
        }

        let lookup = rates.lookup(source, base)?;
        convert_amount(amount, lookup.rate, MINOR_UNIT_PRECISION)
            .ok_or(CurrencyError::AmountOutOfRange(amount))
    }

    /// Parses a raw currency code, reporting malformed codes as unknown.
    pub fn parse_code(raw: &str) -> Result<CurrencyCode, CurrencyError> {
        CurrencyCode::parse(raw).map_err(|_| CurrencyError::UnknownCurrency(raw.to_string()))
    }
}
