//! Claim queries for approvers and submitters.

use crate::workflow::actor::{Actor, ActorDirectory, Role};
use crate::workflow::approval::ApprovalEngine;
use crate::workflow::claim::Claim;
use crate::workflow::error::WorkflowError;

/// Stateless read-side helpers over a collection of claims.
pub struct ClaimQueries;

impl ClaimQueries {
    /// Returns true if `claim` is currently waiting on `actor`.
    ///
    /// Admins see every pending claim. Fixed-role steps match by role,
    /// submitter-manager steps match the resolved manager's identity.
    pub fn is_awaiting<D>(
        claim: &Claim,
        actor: &Actor,
        directory: &D,
    ) -> Result<bool, WorkflowError>
    where
        D: ActorDirectory + ?Sized,
    {
        if !claim.is_pending() {
            return Ok(false);
        }
        if actor.is_admin() {
            return Ok(true);
        }
        Ok(ApprovalEngine::current_approver(claim, directory)?
            .is_some_and(|required| required.admits(actor)))
    }

    /// Claims whose current step resolves to `actor`, newest first.
    ///
    /// A claim whose step cannot be resolved is left out and logged rather
    /// than failing the whole listing.
    pub fn pending_for<'a, D>(
        actor: &Actor,
        claims: impl IntoIterator<Item = &'a Claim>,
        directory: &D,
    ) -> Vec<&'a Claim>
    where
        D: ActorDirectory + ?Sized,
    {
        let mut pending: Vec<&Claim> = claims
            .into_iter()
            .filter(|claim| match Self::is_awaiting(claim, actor, directory) {
                Ok(awaiting) => awaiting,
                Err(e) => {
                    tracing::warn!(
                        claim_id = %claim.id,
                        actor_id = %actor.id,
                        error = %e,
                        "Skipping claim with unresolvable approver"
                    );
                    false
                }
            })
            .collect();
        Self::sort_newest_first(&mut pending);
        pending
    }

    /// Returns true if `actor` may see `claim` in their history.
    ///
    /// Employees see only their own claims; every other role sees all claims.
    pub fn is_visible_to(claim: &Claim, actor: &Actor) -> bool {
        actor.role != Role::Employee || claim.submitter_id == actor.id
    }

    /// Claims visible to `actor`, newest first, any status.
    pub fn history_for<'a>(
        actor: &Actor,
        claims: impl IntoIterator<Item = &'a Claim>,
    ) -> Vec<&'a Claim> {
        let mut history: Vec<&Claim> = claims
            .into_iter()
            .filter(|claim| Self::is_visible_to(claim, actor))
            .collect();
        Self::sort_newest_first(&mut history);
        history
    }

    fn sort_newest_first(claims: &mut [&Claim]) {
        claims.sort_by(|a, b| {
            b.submitted_at
                .cmp(&a.submitted_at)
                .then_with(|| b.id.cmp(&a.id))
        });
    }
}
