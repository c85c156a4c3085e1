//! Currency and exchange rate routes.

use axum::{Json, Router, extract::State, routing::get};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spendflow_core::currency::{CurrencyError, CurrencyNormalizer, ExchangeRate};
use spendflow_shared::types::CurrencyCode;

use crate::{AppState, error::ApiError, middleware::AuthActor};

/// Creates the currency routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/currencies", get(list_currencies))
        .route("/exchange-rates", get(list_exchange_rates).put(replace_exchange_rates))
}

/// Currencies accepted for submission.
#[derive(Debug, Serialize)]
pub struct CurrenciesResponse {
    /// Currency every claim is normalized into.
    pub base_currency: CurrencyCode,
    /// Every code the rate table recognizes, sorted.
    pub currencies: Vec<CurrencyCode>,
}

/// One exchange rate in a table replacement.
#[derive(Debug, Deserialize)]
pub struct ExchangeRateRequest {
    /// Source currency code.
    pub from_currency: String,
    /// Target currency code.
    pub to_currency: String,
    /// 1 `from_currency` = `rate` `to_currency`.
    pub rate: Decimal,
    /// Defaults to today.
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
}

/// Request body replacing the rate table.
#[derive(Debug, Deserialize)]
pub struct ReplaceExchangeRatesRequest {
    /// The complete new table.
    pub rates: Vec<ExchangeRateRequest>,
}

impl ExchangeRateRequest {
    fn into_rate(self, today: NaiveDate) -> Result<ExchangeRate, CurrencyError> {
        Ok(ExchangeRate::new(
            CurrencyNormalizer::parse_code(&self.from_currency)?,
            CurrencyNormalizer::parse_code(&self.to_currency)?,
            self.rate,
            self.effective_date.unwrap_or(today),
        ))
    }
}

/// GET `/currencies` - Base currency and recognized codes.
async fn list_currencies(
    State(state): State<AppState>,
    _auth: AuthActor,
) -> Json<CurrenciesResponse> {
    Json(CurrenciesResponse {
        base_currency: state.store.base_currency(),
        currencies: state.store.currencies(),
    })
}

/// GET `/exchange-rates` - The current rate table.
async fn list_exchange_rates(
    State(state): State<AppState>,
    _auth: AuthActor,
) -> Json<Vec<ExchangeRate>> {
    Json(state.store.exchange_rates())
}

/// PUT `/exchange-rates` - Replace the rate table (admin only).
///
/// The whole table is validated before it is swapped in; on error the
/// current table stays.
async fn replace_exchange_rates(
    State(state): State<AppState>,
    auth: AuthActor,
    Json(payload): Json<ReplaceExchangeRatesRequest>,
) -> Result<Json<CurrenciesResponse>, ApiError> {
    auth.require_admin()?;

    let today = Utc::now().date_naive();
    let entries = payload
        .rates
        .into_iter()
        .map(|rate| rate.into_rate(today))
        .collect::<Result<Vec<_>, _>>()?;
    let currencies = state.store.refresh_rates(entries)?;

    Ok(Json(CurrenciesResponse {
        base_currency: state.store.base_currency(),
        currencies,
    }))
}
