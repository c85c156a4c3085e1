//! Exchange rate repository.
//!
//! Holds the current rate table. A refresh swaps in a whole new table;
//! readers keep the `Arc` they took, so an in-flight conversion always sees
//! one consistent table.

use spendflow_core::currency::{CurrencyError, ExchangeRate, RateTable};
use spendflow_shared::types::CurrencyCode;
use std::sync::{Arc, PoisonError, RwLock};

/// Exchange rate repository.
#[derive(Debug)]
pub struct ExchangeRateRepository {
    table: RwLock<Arc<RateTable>>,
}

impl ExchangeRateRepository {
    /// Creates a repository that only knows the base currency.
    #[must_use]
    pub fn new(base: CurrencyCode) -> Self {
        Self {
            table: RwLock::new(Arc::new(RateTable::empty(base))),
        }
    }

    /// Returns the current table.
    #[must_use]
    pub fn current(&self) -> Arc<RateTable> {
        Arc::clone(&self.table.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replaces the table with one built from `entries`, keeping the base.
    ///
    /// # Errors
    ///
    /// Returns the table construction error; the current table stays in
    /// place.
    pub fn refresh(
        &self,
        entries: impl IntoIterator<Item = ExchangeRate>,
    ) -> Result<Arc<RateTable>, CurrencyError> {
        let base = self.current().base_currency().clone();
        let table = Arc::new(RateTable::new(base, entries)?);
        *self.table.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&table);
        Ok(table)
    }
}
