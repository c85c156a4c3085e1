//! Claim intake.
//!
//! Turns a submission into a pending claim bound to a rule set snapshot,
//! with its amount normalized into the base currency.

use chrono::Utc;
use spendflow_shared::types::ClaimId;

use crate::currency::{CurrencyNormalizer, RateTable};
use crate::workflow::actor::Actor;
use crate::workflow::claim::{Claim, ClaimSubmission};
use crate::workflow::error::WorkflowError;
use crate::workflow::rule::RuleSet;
use crate::workflow::types::ClaimStatus;

/// Stateless service for creating claims.
pub struct WorkflowService;

impl WorkflowService {
    /// Create a pending claim.
    ///
    /// # Arguments
    /// * `submitter` - The actor submitting the claim
    /// * `submission` - Intake data
    /// * `rule_set` - The rule set version to bind (cloned into the claim)
    /// * `rates` - Rate table used to normalize into its base currency
    ///
    /// # Returns
    /// * `Ok(Claim)` pending at step 0
    /// * `Err(WorkflowError::InvalidSubmission)` if the category is blank
    /// * `Err(WorkflowError::Currency)` for a non-positive amount, an
    ///   unknown currency or a converted amount that overflows
    /// * `Err(WorkflowError::Validation)` if the rule set is malformed
    pub fn submit(
        submitter: &Actor,
        submission: ClaimSubmission,
        rule_set: &RuleSet,
        rates: &RateTable,
    ) -> Result<Claim, WorkflowError> {
        let category = submission.category.trim();
        if category.is_empty() {
            return Err(WorkflowError::InvalidSubmission(
                "category is required".to_string(),
            ));
        }

        rule_set.validate()?;

        let original_currency = CurrencyNormalizer::parse_code(&submission.original_currency)?;
        let base_currency = rates.base_currency().clone();
        let base_amount = CurrencyNormalizer::normalize(
            rates,
            submission.original_amount,
            &original_currency,
            &base_currency,
        )?;

        let current_step = rule_set
            .step(0)
            .map(|step| step.approver.label().to_string())
            .unwrap_or_default();

        Ok(Claim {
            id: ClaimId::new(),
            submitter_id: submitter.id,
            submitter_name: submitter.name.clone(),
            category: category.to_string(),
            description: submission.description.trim().to_string(),
            original_amount: submission.original_amount,
            original_currency,
            base_amount,
            base_currency,
            date: submission.date,
            submitted_at: Utc::now(),
            status: ClaimStatus::Pending,
            step_index: 0,
            current_step,
            resolution: None,
            decision_log: Vec::new(),
            rule_set: rule_set.clone(),
        })
    }
}
