//! Workflow domain types for expense claim approval.
//!
//! This module defines the claim status machine and the audit records
//! appended for every decision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spendflow_shared::types::ActorId;
use std::fmt;

use crate::workflow::actor::Role;

/// Claim status in the approval workflow.
///
/// The valid transitions are:
/// - Pending → Pending (approval advances to the next step)
/// - Pending → Approved (last step approved, or conditional auto-approval)
/// - Pending → Rejected (rejection at any step)
///
/// Approved and Rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    /// Claim is waiting on the approver of its current step.
    Pending,
    /// Claim has been approved (terminal).
    Approved,
    /// Claim has been rejected (terminal).
    Rejected,
}

impl ClaimStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Returns true if no further decision can be applied.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An approver's decision on the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Approve the step.
    Approve,
    /// Reject the whole claim.
    Reject,
}

/// One entry in a claim's decision log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionEntry {
    /// Who decided.
    pub actor_id: ActorId,
    /// Display name of the actor at decision time.
    pub actor_name: String,
    /// Role the actor held at decision time.
    pub actor_role: Role,
    /// Index of the step acted on.
    pub step_index: usize,
    /// Approve or reject.
    pub decision: Decision,
    /// Comment from the approver. Always present on rejections.
    pub comment: Option<String>,
    /// When the decision was recorded.
    pub decided_at: DateTime<Utc>,
}

/// Which conditional rule triggered an auto-approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoApprovalTrigger {
    /// The approval percentage threshold was met.
    Percentage,
    /// The designated specific approver approved.
    SpecificApprover,
    /// Both conditions held at the same time.
    Both,
}

/// How a claim reached its terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "trigger")]
pub enum Resolution {
    /// Every step approved in sequence.
    SequenceCompleted,
    /// A conditional rule short-circuited the sequence.
    AutoApproved(AutoApprovalTrigger),
    /// An approver rejected the claim.
    Rejected,
}
