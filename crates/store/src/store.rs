//! The expense store facade.
//!
//! Composes the repositories and drives the pure workflow engine. This is the
//! only place that writes claims, so every decision goes through the
//! per-claim lock in [`ClaimRepository::update`].

use spendflow_core::currency::{CurrencyError, ExchangeRate};
use spendflow_core::workflow::{
    Actor, ActorDirectory, ApprovalEngine, Claim, ClaimQueries, ClaimSubmission, Decision,
    RuleSet, RuleSetDefinition, WorkflowError, WorkflowService,
};
use spendflow_shared::types::{ActorId, ClaimId, CurrencyCode, RuleSetId};
use std::sync::{PoisonError, RwLock};

use crate::repositories::{
    ActorRepository, ClaimRepository, ExchangeRateRepository, NewActor, RuleSetRepository,
};

/// Owned store for actors, rule sets, claims and exchange rates.
#[derive(Debug)]
pub struct ExpenseStore {
    actors: ActorRepository,
    rule_sets: RuleSetRepository,
    claims: ClaimRepository,
    rates: ExchangeRateRepository,
    default_rule_set: RwLock<Option<RuleSetId>>,
}

impl ExpenseStore {
    /// Creates an empty store normalizing into `base_currency`.
    #[must_use]
    pub fn new(base_currency: CurrencyCode) -> Self {
        Self {
            actors: ActorRepository::new(),
            rule_sets: RuleSetRepository::new(),
            claims: ClaimRepository::new(),
            rates: ExchangeRateRepository::new(base_currency),
            default_rule_set: RwLock::new(None),
        }
    }

    /// The organization's base currency.
    #[must_use]
    pub fn base_currency(&self) -> CurrencyCode {
        self.rates.current().base_currency().clone()
    }

    // ------------------------------------------------------------------
    // Actors
    // ------------------------------------------------------------------

    /// Registers an actor.
    ///
    /// # Errors
    ///
    /// Returns `InvalidActor` for blank fields or an unregistered manager.
    pub fn register_actor(&self, input: NewActor) -> Result<Actor, WorkflowError> {
        let actor = log_rejection("register_actor", self.actors.register(input))?;
        tracing::info!(actor_id = %actor.id, role = %actor.role, "Actor registered");
        Ok(actor)
    }

    /// Registers an actor under a fixed id.
    ///
    /// # Errors
    ///
    /// Same as [`register_actor`](Self::register_actor), plus a taken id.
    pub fn register_actor_with_id(
        &self,
        id: ActorId,
        input: NewActor,
    ) -> Result<Actor, WorkflowError> {
        let actor = log_rejection("register_actor", self.actors.register_with_id(id, input))?;
        tracing::info!(actor_id = %actor.id, role = %actor.role, "Actor registered");
        Ok(actor)
    }

    /// Lists actors ordered by name.
    #[must_use]
    pub fn list_actors(&self) -> Vec<Actor> {
        self.actors.list()
    }

    // ------------------------------------------------------------------
    // Rule sets
    // ------------------------------------------------------------------

    /// Creates or edits a rule set.
    ///
    /// An edit produces a new version; claims already bound to an older
    /// version keep it. The first rule set created becomes the default for
    /// new submissions unless one is already set.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the definition is malformed. Nothing changes.
    pub fn create_or_update_rule(
        &self,
        id: RuleSetId,
        definition: RuleSetDefinition,
    ) -> Result<RuleSet, WorkflowError> {
        let rule_set = log_rejection(
            "create_or_update_rule",
            self.rule_sets.create_or_update(id, definition),
        )?;

        let mut default = self
            .default_rule_set
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if default.is_none() {
            *default = Some(rule_set.id);
        }

        tracing::info!(
            rule_set_id = %rule_set.id,
            version = rule_set.version,
            steps = rule_set.step_count(),
            combinator = %rule_set.conditional.combinator,
            "Rule set saved"
        );
        Ok(rule_set)
    }

    /// Chooses the rule set bound to new submissions.
    ///
    /// # Errors
    ///
    /// Returns `RuleSetNotFound` if `id` does not exist.
    pub fn set_default_rule_set(&self, id: RuleSetId) -> Result<(), WorkflowError> {
        if self.rule_sets.find_by_id(id).is_none() {
            return log_rejection("set_default_rule_set", Err(WorkflowError::RuleSetNotFound(id)));
        }
        *self
            .default_rule_set
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(id);
        tracing::info!(rule_set_id = %id, "Default rule set changed");
        Ok(())
    }

    /// The latest version of the default rule set, if any.
    #[must_use]
    pub fn default_rule_set(&self) -> Option<RuleSet> {
        let id = (*self
            .default_rule_set
            .read()
            .unwrap_or_else(PoisonError::into_inner))?;
        self.rule_sets.find_by_id(id)
    }

    /// Finds the latest version of a rule set.
    #[must_use]
    pub fn find_rule_set(&self, id: RuleSetId) -> Option<RuleSet> {
        self.rule_sets.find_by_id(id)
    }

    /// Lists the latest version of every rule set.
    #[must_use]
    pub fn list_rule_sets(&self) -> Vec<RuleSet> {
        self.rule_sets.list()
    }

    // ------------------------------------------------------------------
    // Exchange rates
    // ------------------------------------------------------------------

    /// Replaces the exchange rate table.
    ///
    /// Claims already submitted keep their normalized amounts.
    ///
    /// # Errors
    ///
    /// Returns the rate validation error; the current table stays.
    pub fn refresh_rates(
        &self,
        entries: impl IntoIterator<Item = ExchangeRate>,
    ) -> Result<Vec<CurrencyCode>, CurrencyError> {
        match self.rates.refresh(entries) {
            Ok(table) => {
                let currencies = table.currencies();
                tracing::info!(
                    base = %table.base_currency(),
                    currencies = currencies.len(),
                    "Exchange rate table refreshed"
                );
                Ok(currencies)
            }
            Err(e) => {
                tracing::warn!(error_code = e.error_code(), error = %e, "Rate refresh rejected");
                Err(e)
            }
        }
    }

    /// Currency codes the current table recognizes, sorted.
    #[must_use]
    pub fn currencies(&self) -> Vec<CurrencyCode> {
        self.rates.current().currencies()
    }

    /// Entries of the current table.
    #[must_use]
    pub fn exchange_rates(&self) -> Vec<ExchangeRate> {
        self.rates.current().entries()
    }

    // ------------------------------------------------------------------
    // Claims
    // ------------------------------------------------------------------

    /// Submits a claim bound to the default rule set.
    ///
    /// # Errors
    ///
    /// * `ActorNotFound` if the submitter is unknown
    /// * `InvalidSubmission` if no rule set is configured or the data is incomplete
    /// * `Currency` if the amount cannot be normalized
    pub fn submit(
        &self,
        submitter_id: ActorId,
        submission: ClaimSubmission,
    ) -> Result<Claim, WorkflowError> {
        log_rejection("submit", self.try_submit(submitter_id, submission))
    }

    fn try_submit(
        &self,
        submitter_id: ActorId,
        submission: ClaimSubmission,
    ) -> Result<Claim, WorkflowError> {
        let submitter = self
            .actors
            .find_actor(submitter_id)
            .ok_or(WorkflowError::ActorNotFound(submitter_id))?;
        let rule_set = self.default_rule_set().ok_or_else(|| {
            WorkflowError::InvalidSubmission("no approval rule set is configured".to_string())
        })?;
        let rates = self.rates.current();

        let claim = WorkflowService::submit(&submitter, submission, &rule_set, &rates)?;
        self.claims.insert(claim.clone());

        tracing::info!(
            claim_id = %claim.id,
            submitter_id = %claim.submitter_id,
            rule_set_id = %rule_set.id,
            rule_set_version = rule_set.version,
            original = %claim.original(),
            normalized = %claim.normalized(),
            "Claim submitted"
        );
        Ok(claim)
    }

    /// Applies a decision to a claim, serialized with any other decision on
    /// the same claim.
    ///
    /// # Errors
    ///
    /// * `ActorNotFound` / `ClaimNotFound` for unknown ids
    /// * any error from [`ApprovalEngine::decide`]; the claim is unchanged
    pub fn decide(
        &self,
        claim_id: ClaimId,
        actor_id: ActorId,
        decision: Decision,
        comment: Option<&str>,
    ) -> Result<Claim, WorkflowError> {
        log_rejection(
            "decide",
            self.try_decide(claim_id, actor_id, decision, comment),
        )
    }

    fn try_decide(
        &self,
        claim_id: ClaimId,
        actor_id: ActorId,
        decision: Decision,
        comment: Option<&str>,
    ) -> Result<Claim, WorkflowError> {
        let actor = self
            .actors
            .find_actor(actor_id)
            .ok_or(WorkflowError::ActorNotFound(actor_id))?;

        let claim = self.claims.update(claim_id, |current| {
            ApprovalEngine::decide(current, &actor, decision, comment, &self.actors)
        })?;

        tracing::info!(
            claim_id = %claim.id,
            actor_id = %actor.id,
            decision = ?decision,
            status = %claim.status,
            step = %claim.current_step,
            "Decision applied"
        );
        Ok(claim)
    }

    /// Finds a claim.
    #[must_use]
    pub fn find_claim(&self, id: ClaimId) -> Option<Claim> {
        self.claims.find_by_id(id)
    }

    /// Claims currently waiting on the actor, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ActorNotFound` for an unknown actor.
    pub fn pending_for(&self, actor_id: ActorId) -> Result<Vec<Claim>, WorkflowError> {
        let actor = self
            .actors
            .find_actor(actor_id)
            .ok_or(WorkflowError::ActorNotFound(actor_id))?;
        let claims = self.claims.snapshot();
        Ok(ClaimQueries::pending_for(&actor, &claims, &self.actors)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Claims the actor may see, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ActorNotFound` for an unknown actor.
    pub fn history_for(&self, actor_id: ActorId) -> Result<Vec<Claim>, WorkflowError> {
        let actor = self
            .actors
            .find_actor(actor_id)
            .ok_or(WorkflowError::ActorNotFound(actor_id))?;
        let claims = self.claims.snapshot();
        Ok(ClaimQueries::history_for(&actor, &claims)
            .into_iter()
            .cloned()
            .collect())
    }
}

impl ActorDirectory for ExpenseStore {
    fn find_actor(&self, id: ActorId) -> Option<Actor> {
        self.actors.find_actor(id)
    }
}

fn log_rejection<T>(
    operation: &'static str,
    result: Result<T, WorkflowError>,
) -> Result<T, WorkflowError> {
    if let Err(e) = &result {
        tracing::warn!(operation, error_code = e.error_code(), error = %e, "Operation rejected");
    }
    result
}
