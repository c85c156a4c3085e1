//! Approval evaluation engine.
//!
//! Given a claim, the acting actor and a decision, computes the next claim
//! state: authorizes the actor against the current step, records the
//! decision, evaluates the conditional auto-approval rules and only then
//! advances the sequence. Conditional evaluation runs before the sequential
//! advance after every single approval; that ordering is what lets a
//! conditional rule preempt the remaining steps.

use chrono::Utc;
use spendflow_shared::types::ActorId;

use crate::workflow::actor::{Actor, ActorDirectory, Role};
use crate::workflow::claim::{COMPLETED_LABEL, Claim};
use crate::workflow::error::{RuleValidationError, WorkflowError};
use crate::workflow::rule::{Combinator, RoleSpecifier, RuleStep};
use crate::workflow::types::{AutoApprovalTrigger, ClaimStatus, Decision, DecisionEntry, Resolution};

/// The approver a step resolves to for a particular claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequiredApprover {
    /// Any actor holding the role.
    Role(Role),
    /// Exactly this actor (the submitter's manager).
    Actor {
        /// Manager's id.
        id: ActorId,
        /// Manager's display name.
        name: String,
        /// Manager's role.
        role: Role,
    },
}

impl RequiredApprover {
    /// Returns true if `actor` satisfies this requirement.
    ///
    /// Admin override is not considered here.
    #[must_use]
    pub fn admits(&self, actor: &Actor) -> bool {
        match self {
            Self::Role(role) => actor.role == *role,
            Self::Actor { id, .. } => actor.id == *id,
        }
    }

    /// Returns a human-readable description of the requirement.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Role(role) => role.to_string(),
            Self::Actor { name, role, .. } => format!("{name} ({role})"),
        }
    }
}

/// Stateless engine for evaluating approval decisions.
pub struct ApprovalEngine;

impl ApprovalEngine {
    /// Resolve who must approve `step` for `claim`.
    ///
    /// Fixed roles resolve to themselves. The submitter-manager sentinel is
    /// resolved at evaluation time through `directory`.
    ///
    /// # Returns
    /// * `Ok(RequiredApprover)` with the fixed role or the manager's identity
    /// * `Err(WorkflowError::UnresolvedManager)` if the submitter, their
    ///   manager reference, or the manager record is missing
    pub fn resolve_step_role<D>(
        step: &RuleStep,
        claim: &Claim,
        directory: &D,
    ) -> Result<RequiredApprover, WorkflowError>
    where
        D: ActorDirectory + ?Sized,
    {
        match step.approver {
            RoleSpecifier::Fixed(role) => Ok(RequiredApprover::Role(role)),
            RoleSpecifier::SubmitterManager => {
                let unresolved = || WorkflowError::UnresolvedManager {
                    claim_id: claim.id,
                    submitter_id: claim.submitter_id,
                };

                let manager = directory
                    .find_actor(claim.submitter_id)
                    .and_then(|submitter| submitter.manager_id)
                    .and_then(|manager_id| directory.find_actor(manager_id))
                    .ok_or_else(unresolved)?;

                Ok(RequiredApprover::Actor {
                    id: manager.id,
                    name: manager.name,
                    role: manager.role,
                })
            }
        }
    }

    /// Resolve the approver of the claim's current step.
    ///
    /// Returns `Ok(None)` once the claim is terminal.
    pub fn current_approver<D>(
        claim: &Claim,
        directory: &D,
    ) -> Result<Option<RequiredApprover>, WorkflowError>
    where
        D: ActorDirectory + ?Sized,
    {
        claim
            .current_rule_step()
            .map(|step| Self::resolve_step_role(step, claim, directory))
            .transpose()
    }

    /// Check that `actor` may decide on the claim's current step.
    ///
    /// Admins may act at any step without resolving the step's approver.
    ///
    /// # Returns
    /// * `Ok(())` if the actor may decide
    /// * `Err(WorkflowError::AlreadyFinalized)` if the claim is terminal
    /// * `Err(WorkflowError::UnresolvedManager)` if the step cannot be resolved
    /// * `Err(WorkflowError::UnauthorizedApprover)` otherwise
    pub fn authorize<D>(claim: &Claim, actor: &Actor, directory: &D) -> Result<(), WorkflowError>
    where
        D: ActorDirectory + ?Sized,
    {
        if claim.status.is_terminal() {
            return Err(WorkflowError::AlreadyFinalized {
                claim_id: claim.id,
                status: claim.status,
            });
        }

        // Only an empty step list leaves a pending claim without a current
        // step, and rule sets with no steps never validate.
        let step = claim
            .rule_set
            .step(claim.step_index)
            .ok_or(RuleValidationError::NoSteps)?;

        if actor.is_admin() {
            return Ok(());
        }

        let required = Self::resolve_step_role(step, claim, directory)?;
        if required.admits(actor) {
            Ok(())
        } else {
            Err(WorkflowError::UnauthorizedApprover {
                actor_id: actor.id,
                required: required.label(),
            })
        }
    }

    /// Returns true if `approvals` out of `total_steps` meets `threshold` percent.
    ///
    /// Compared exactly: 2 of 3 against 60 is 66.6...% and passes.
    #[must_use]
    pub fn percentage_satisfied(threshold: u8, approvals: usize, total_steps: usize) -> bool {
        if total_steps == 0 {
            return false;
        }
        approvals.saturating_mul(100) >= usize::from(threshold).saturating_mul(total_steps)
    }

    /// Evaluate the claim's conditional auto-approval rules against its
    /// decision log.
    ///
    /// # Returns
    /// The trigger if the claim should be auto-approved, `None` otherwise
    /// (always `None` for the `NONE` combinator).
    #[must_use]
    pub fn evaluate_conditional(claim: &Claim) -> Option<AutoApprovalTrigger> {
        let spec = &claim.rule_set.conditional;
        if !spec.is_active() {
            return None;
        }

        let approvals = claim.approval_count();
        let total_steps = claim.rule_set.step_count();

        let percentage = spec
            .percentage_threshold
            .is_some_and(|threshold| Self::percentage_satisfied(threshold, approvals, total_steps));

        let specific = spec.specific_approver.is_some_and(|role| {
            claim
                .decision_log
                .iter()
                .any(|entry| entry.decision == Decision::Approve && entry.actor_role == role)
        });

        match spec.combinator {
            Combinator::None => None,
            Combinator::Or => match (percentage, specific) {
                (true, true) => Some(AutoApprovalTrigger::Both),
                (true, false) => Some(AutoApprovalTrigger::Percentage),
                (false, true) => Some(AutoApprovalTrigger::SpecificApprover),
                (false, false) => None,
            },
            Combinator::And => (percentage && specific).then_some(AutoApprovalTrigger::Both),
        }
    }

    /// Apply a decision to a claim.
    ///
    /// The input claim is never modified; on success the returned claim is
    /// the complete next state, on failure nothing has changed.
    ///
    /// # Arguments
    /// * `claim` - The claim's current state
    /// * `actor` - The actor deciding
    /// * `decision` - Approve or reject
    /// * `comment` - Optional comment, required (non-blank) for rejections
    /// * `directory` - Actor lookup for manager resolution
    ///
    /// # Returns
    /// * `Ok(Claim)` with the next state
    /// * `Err(WorkflowError::AlreadyFinalized)` if the claim is terminal
    /// * `Err(WorkflowError::UnauthorizedApprover)` if the actor may not act
    /// * `Err(WorkflowError::UnresolvedManager)` if the step cannot be resolved
    /// * `Err(WorkflowError::CommentRequired)` for a rejection without comment
    pub fn decide<D>(
        claim: &Claim,
        actor: &Actor,
        decision: Decision,
        comment: Option<&str>,
        directory: &D,
    ) -> Result<Claim, WorkflowError>
    where
        D: ActorDirectory + ?Sized,
    {
        Self::authorize(claim, actor, directory)?;

        let comment = comment
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        if decision == Decision::Reject && comment.is_none() {
            return Err(WorkflowError::CommentRequired);
        }

        let mut next = claim.clone();
        next.decision_log.push(DecisionEntry {
            actor_id: actor.id,
            actor_name: actor.name.clone(),
            actor_role: actor.role,
            step_index: claim.step_index,
            decision,
            comment,
            decided_at: Utc::now(),
        });

        if decision == Decision::Reject {
            next.status = ClaimStatus::Rejected;
            next.resolution = Some(Resolution::Rejected);
            next.current_step = format!("Rejected by {}", actor.name);
            return Ok(next);
        }

        if let Some(trigger) = Self::evaluate_conditional(&next) {
            next.status = ClaimStatus::Approved;
            next.resolution = Some(Resolution::AutoApproved(trigger));
            next.current_step = COMPLETED_LABEL.to_string();
            return Ok(next);
        }

        if next.rule_set.is_last_step(claim.step_index) {
            next.status = ClaimStatus::Approved;
            next.resolution = Some(Resolution::SequenceCompleted);
            next.current_step = COMPLETED_LABEL.to_string();
        } else {
            next.step_index = claim.step_index + 1;
            next.current_step = next.rule_set.steps[next.step_index]
                .approver
                .label()
                .to_string();
        }

        Ok(next)
    }
}
