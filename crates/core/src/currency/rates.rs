//! Immutable exchange rate table.
//!
//! The table is process-wide and read-only during evaluation. Refreshing the
//! rates means building a new table and swapping it in; a table is never
//! mutated after construction.

use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;
use spendflow_shared::types::CurrencyCode;

use super::error::CurrencyError;
use super::exchange::ExchangeRate;

/// How an exchange rate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLookupMethod {
    /// Source and target are the same currency.
    Identity,
    /// Direct rate found (from_currency -> to_currency).
    Direct,
    /// Inverse rate calculated (to_currency -> from_currency, then inverted).
    Inverse,
    /// Chained through the table's base currency.
    Triangulated,
}

/// Result of an exchange rate lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLookup {
    /// The effective rate (1 source = rate target).
    pub rate: Decimal,
    /// How the rate was obtained.
    pub method: RateLookupMethod,
}

/// A validated set of exchange rates anchored on a base currency.
#[derive(Debug, Clone)]
pub struct RateTable {
    base: CurrencyCode,
    rates: HashMap<(CurrencyCode, CurrencyCode), ExchangeRate>,
    known: BTreeSet<CurrencyCode>,
}

impl RateTable {
    /// Builds a table from rate entries.
    ///
    /// When the same pair appears more than once the entry with the latest
    /// effective date wins.
    pub fn new(
        base: CurrencyCode,
        entries: impl IntoIterator<Item = ExchangeRate>,
    ) -> Result<Self, CurrencyError> {
        let mut rates: HashMap<(CurrencyCode, CurrencyCode), ExchangeRate> = HashMap::new();
        let mut known = BTreeSet::from([base.clone()]);

        for entry in entries {
            if entry.from_currency == entry.to_currency {
                return Err(CurrencyError::SameCurrency(entry.from_currency.to_string()));
            }
            if entry.rate <= Decimal::ZERO {
                return Err(CurrencyError::NonPositiveRate {
                    from: entry.from_currency.to_string(),
                    to: entry.to_currency.to_string(),
                    rate: entry.rate,
                });
            }

            known.insert(entry.from_currency.clone());
            known.insert(entry.to_currency.clone());

            let key = (entry.from_currency.clone(), entry.to_currency.clone());
            match rates.get(&key) {
                Some(existing) if existing.effective_date > entry.effective_date => {}
                _ => {
                    rates.insert(key, entry);
                }
            }
        }

        Ok(Self { base, rates, known })
    }

    /// Creates a table that only knows the base currency.
    #[must_use]
    pub fn empty(base: CurrencyCode) -> Self {
        Self {
            known: BTreeSet::from([base.clone()]),
            base,
            rates: HashMap::new(),
        }
    }

    /// Returns the base currency the table is anchored on.
    #[must_use]
    pub fn base_currency(&self) -> &CurrencyCode {
        &self.base
    }

    /// Returns true if the code appears anywhere in the table.
    #[must_use]
    pub fn is_known(&self, code: &CurrencyCode) -> bool {
        self.known.contains(code)
    }

    /// Returns every recognized currency code, sorted.
    #[must_use]
    pub fn currencies(&self) -> Vec<CurrencyCode> {
        self.known.iter().cloned().collect()
    }

    /// Returns the raw entries, sorted by pair.
    #[must_use]
    pub fn entries(&self) -> Vec<ExchangeRate> {
        let mut entries: Vec<_> = self.rates.values().cloned().collect();
        entries.sort_by(|a, b| {
            (&a.from_currency, &a.to_currency).cmp(&(&b.from_currency, &b.to_currency))
        });
        entries
    }

    /// Looks up the rate converting `from` into `to`.
    ///
    /// Tries identity, direct, inverse, then triangulation through the base
    /// currency.
    pub fn lookup(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<RateLookup, CurrencyError> {
        for code in [from, to] {
            if !self.is_known(code) {
                return Err(CurrencyError::UnknownCurrency(code.to_string()));
            }
        }

        if from == to {
            return Ok(RateLookup {
                rate: Decimal::ONE,
                method: RateLookupMethod::Identity,
            });
        }

        if let Some(lookup) = self.single_hop(from, to) {
            return Ok(lookup);
        }

        if from != &self.base
            && to != &self.base
            && let (Some(first), Some(second)) = (
                self.single_hop(from, &self.base),
                self.single_hop(&self.base, to),
            )
        {
            let rate = first
                .rate
                .checked_mul(second.rate)
                .ok_or_else(|| CurrencyError::RateOutOfRange(format!("{from}/{to}")))?;
            return Ok(RateLookup {
                rate,
                method: RateLookupMethod::Triangulated,
            });
        }

        // Both codes are known but no path connects them.
        Err(CurrencyError::UnknownCurrency(format!("{from}/{to}")))
    }

    fn single_hop(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<RateLookup> {
        if let Some(direct) = self.rates.get(&(from.clone(), to.clone())) {
            return Some(RateLookup {
                rate: direct.rate,
                method: RateLookupMethod::Direct,
            });
        }
        self.rates
            .get(&(to.clone(), from.clone()))
            .map(|reverse| RateLookup {
                rate: reverse.inverse().rate,
                method: RateLookupMethod::Inverse,
            })
    }
}
