//! Building a store from configuration.

use chrono::Utc;
use spendflow_core::currency::{CurrencyError, CurrencyNormalizer, ExchangeRate};
use spendflow_core::workflow::{Role, RuleSetDefinition, WorkflowError};
use spendflow_shared::AppConfig;
use spendflow_shared::types::{ActorId, CurrencyCode, InvalidCurrencyCode, RuleSetId};
use thiserror::Error;

use crate::repositories::NewActor;
use crate::store::ExpenseStore;

/// Errors raised while applying seed data.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The configured base currency is malformed.
    #[error("Invalid base currency: {0}")]
    BaseCurrency(#[from] InvalidCurrencyCode),

    /// A seeded actor, rule set or default is invalid.
    #[error("Invalid seed data: {0}")]
    Workflow(#[from] WorkflowError),

    /// A seeded exchange rate is invalid.
    #[error("Invalid seed exchange rate: {0}")]
    Currency(#[from] CurrencyError),
}

impl ExpenseStore {
    /// Builds a store from `config`, applying its seed section.
    ///
    /// Actors are registered in order, so managers must precede their
    /// reports. The configured default rule set, if any, must be seeded.
    ///
    /// # Errors
    ///
    /// Returns the first invalid seed entry.
    pub fn from_config(config: &AppConfig) -> Result<Self, SeedError> {
        let base = CurrencyCode::parse(&config.workflow.base_currency)?;
        let store = Self::new(base);
        let seed = &config.seed;

        for actor in &seed.actors {
            let role = Role::parse(&actor.role)
                .ok_or_else(|| WorkflowError::UnknownRole(actor.role.clone()))?;
            store.register_actor_with_id(
                ActorId::from_uuid(actor.id),
                NewActor {
                    name: actor.name.clone(),
                    email: actor.email.clone(),
                    role,
                    manager_id: actor.manager_id.map(ActorId::from_uuid),
                },
            )?;
        }

        if !seed.exchange_rates.is_empty() {
            let today = Utc::now().date_naive();
            let entries = seed
                .exchange_rates
                .iter()
                .map(|rate| {
                    Ok(ExchangeRate::new(
                        CurrencyNormalizer::parse_code(&rate.from)?,
                        CurrencyNormalizer::parse_code(&rate.to)?,
                        rate.rate,
                        rate.effective_date.unwrap_or(today),
                    ))
                })
                .collect::<Result<Vec<_>, CurrencyError>>()?;
            store.refresh_rates(entries)?;
        }

        for rule_set in &seed.rule_sets {
            let definition = RuleSetDefinition::parse(
                rule_set.name.clone(),
                &rule_set.steps,
                &rule_set.combinator,
                rule_set.percentage_threshold,
                rule_set.specific_approver.as_deref(),
            )?;
            store.create_or_update_rule(RuleSetId::from_uuid(rule_set.id), definition)?;
        }

        if let Some(id) = config.workflow.default_rule_set {
            store.set_default_rule_set(RuleSetId::from_uuid(id))?;
        }

        tracing::info!(
            actors = seed.actors.len(),
            exchange_rates = seed.exchange_rates.len(),
            rule_sets = seed.rule_sets.len(),
            base_currency = %store.base_currency(),
            "Store seeded"
        );
        Ok(store)
    }
}
