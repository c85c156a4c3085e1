//! Workflow error types for expense claim approval.
//!
//! This module defines all error types that can occur during rule
//! administration, claim submission and approval decisions.

use spendflow_shared::types::{ActorId, ClaimId, RuleSetId};
use thiserror::Error;

use crate::currency::CurrencyError;
use crate::workflow::rule::Combinator;
use crate::workflow::types::ClaimStatus;

/// A rule set definition that violates the rule model invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuleValidationError {
    /// Rule set has no name.
    #[error("Rule set name is required")]
    EmptyName,

    /// Rule set has no steps.
    #[error("Rule set must contain at least one step")]
    NoSteps,

    /// Percentage threshold outside 1..=100.
    #[error("Percentage threshold must be between 1 and 100, got {0}")]
    ThresholdOutOfRange(u8),

    /// Active combinator without a percentage threshold.
    #[error("Combinator {0} requires a percentage threshold")]
    MissingThreshold(Combinator),

    /// Active combinator without a specific approver.
    #[error("Combinator {0} requires a specific approver")]
    MissingSpecificApprover(Combinator),
}

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Malformed rule set on create or edit.
    #[error("Invalid rule set: {0}")]
    Validation(#[from] RuleValidationError),

    /// Currency normalization failed.
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// Submission is missing required data.
    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),

    /// A role name that is not one of the known roles.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// A combinator name other than NONE, OR or AND.
    #[error("Unknown combinator: {0}")]
    UnknownCombinator(String),

    /// Actor registration is missing required data.
    #[error("Invalid actor: {0}")]
    InvalidActor(String),

    /// The submitter's manager could not be resolved.
    #[error("Cannot resolve the manager of submitter {submitter_id} for claim {claim_id}")]
    UnresolvedManager {
        /// The claim being evaluated.
        claim_id: ClaimId,
        /// The submitter whose manager is missing.
        submitter_id: ActorId,
    },

    /// The actor is not the required approver for the current step.
    #[error("Actor {actor_id} is not authorized to act on this step (requires {required})")]
    UnauthorizedApprover {
        /// The actor who attempted the decision.
        actor_id: ActorId,
        /// Label of the required approver.
        required: String,
    },

    /// Rejection without a comment.
    #[error("A comment is required to reject a claim")]
    CommentRequired,

    /// Decision on a claim that is already approved or rejected.
    #[error("Claim {claim_id} is already {status}")]
    AlreadyFinalized {
        /// The claim.
        claim_id: ClaimId,
        /// Its terminal status.
        status: ClaimStatus,
    },

    /// Claim not found.
    #[error("Claim {0} not found")]
    ClaimNotFound(ClaimId),

    /// Actor not found.
    #[error("Actor {0} not found")]
    ActorNotFound(ActorId),

    /// Rule set not found.
    #[error("Rule set {0} not found")]
    RuleSetNotFound(RuleSetId),
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_)
            | Self::InvalidSubmission(_)
            | Self::InvalidActor(_)
            | Self::UnknownRole(_)
            | Self::UnknownCombinator(_)
            | Self::CommentRequired => 400,

            Self::Currency(e) => e.status_code(),

            Self::UnauthorizedApprover { .. } => 403,

            Self::ClaimNotFound(_) | Self::ActorNotFound(_) | Self::RuleSetNotFound(_) => 404,

            Self::AlreadyFinalized { .. } => 409,

            Self::UnresolvedManager { .. } => 422,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Currency(e) => e.error_code(),
            Self::InvalidSubmission(_) => "INVALID_SUBMISSION",
            Self::InvalidActor(_) => "INVALID_ACTOR",
            Self::UnknownRole(_) => "UNKNOWN_ROLE",
            Self::UnknownCombinator(_) => "UNKNOWN_COMBINATOR",
            Self::UnresolvedManager { .. } => "UNRESOLVED_MANAGER",
            Self::UnauthorizedApprover { .. } => "UNAUTHORIZED_APPROVER",
            Self::CommentRequired => "COMMENT_REQUIRED",
            Self::AlreadyFinalized { .. } => "ALREADY_FINALIZED",
            Self::ClaimNotFound(_) => "CLAIM_NOT_FOUND",
            Self::ActorNotFound(_) => "ACTOR_NOT_FOUND",
            Self::RuleSetNotFound(_) => "RULE_SET_NOT_FOUND",
        }
    }
}
