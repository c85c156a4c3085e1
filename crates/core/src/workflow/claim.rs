//! Expense claim state.
//!
//! A claim is created at submission with the rule set snapshot in effect at
//! that moment, and is only ever replaced wholesale by the approval engine.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spendflow_shared::types::{ActorId, ClaimId, CurrencyCode, Money};

use crate::workflow::rule::{RuleSet, RuleStep};
use crate::workflow::types::{ClaimStatus, Decision, DecisionEntry, Resolution};

/// Label shown once a claim is approved.
pub const COMPLETED_LABEL: &str = "Completed";

/// Submission intake data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSubmission {
    /// Expense category (e.g. "Travel", "Meals").
    pub category: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Amount in the original currency.
    pub original_amount: Decimal,
    /// Original currency code as entered.
    pub original_currency: String,
    /// Date the expense was incurred.
    pub date: NaiveDate,
}

/// One expense claim under approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique, time-ordered id.
    pub id: ClaimId,
    /// Who submitted the claim.
    pub submitter_id: ActorId,
    /// Submitter's display name at submission time.
    pub submitter_name: String,
    /// Expense category.
    pub category: String,
    /// Free-text description.
    pub description: String,
    /// Amount in the original currency.
    pub original_amount: Decimal,
    /// Original currency.
    pub original_currency: CurrencyCode,
    /// Amount normalized into the base currency.
    pub base_amount: Decimal,
    /// The base currency `base_amount` is expressed in.
    pub base_currency: CurrencyCode,
    /// Date the expense was incurred.
    pub date: NaiveDate,
    /// When the claim was submitted.
    pub submitted_at: DateTime<Utc>,
    /// Current status.
    pub status: ClaimStatus,
    /// Index of the current step. Meaningless once the status is terminal.
    pub step_index: usize,
    /// Human-readable current step ("Finance", "Completed", "Rejected by ...").
    pub current_step: String,
    /// How the claim reached its terminal status.
    pub resolution: Option<Resolution>,
    /// One entry per step acted on, in order.
    pub decision_log: Vec<DecisionEntry>,
    /// The rule set version bound at submission.
    pub rule_set: RuleSet,
}

impl Claim {
    /// Returns true if the claim is still waiting on an approver.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == ClaimStatus::Pending
    }

    /// Returns the step the claim is waiting on, if pending.
    #[must_use]
    pub fn current_rule_step(&self) -> Option<&RuleStep> {
        if self.is_pending() {
            self.rule_set.step(self.step_index)
        } else {
            None
        }
    }

    /// The amount as submitted.
    #[must_use]
    pub fn original(&self) -> Money {
        Money::new(self.original_amount, self.original_currency.clone())
    }

    /// The amount in the base currency.
    #[must_use]
    pub fn normalized(&self) -> Money {
        Money::new(self.base_amount, self.base_currency.clone())
    }

    /// Counts approve entries in the decision log.
    #[must_use]
    pub fn approval_count(&self) -> usize {
        self.decision_log
            .iter()
            .filter(|entry| entry.decision == Decision::Approve)
            .count()
    }
}
