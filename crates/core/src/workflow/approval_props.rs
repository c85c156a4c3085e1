//! Property-based tests for ApprovalEngine.
//!
//! Exercise the engine over arbitrary step chains and decision sequences.

use proptest::prelude::*;

use crate::workflow::actor::{Actor, Role};
use crate::workflow::approval::ApprovalEngine;
use crate::workflow::error::WorkflowError;
use crate::workflow::rule::{ConditionalSpec, RuleStep};
use crate::workflow::testing::{Org, rule_set};
use crate::workflow::types::{AutoApprovalTrigger, ClaimStatus, Decision, Resolution};

/// Strategy for a chain of fixed-role steps.
fn arb_steps(max: usize) -> impl Strategy<Value = Vec<Role>> {
    prop::collection::vec(
        prop_oneof![Just(Role::Finance), Just(Role::Hr), Just(Role::Director)],
        1..=max,
    )
}

fn holder<'a>(org: &'a Org, role: Role) -> &'a Actor {
    match role {
        Role::Finance => &org.finance,
        Role::Hr => &org.hr,
        _ => &org.director,
    }
}

fn to_steps(roles: &[Role]) -> Vec<RuleStep> {
    roles.iter().copied().map(RuleStep::fixed).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Property 1: Sequential completion
    // =========================================================================

    /// Without conditional rules, a claim completes after exactly one
    /// approval per step, advancing one step at a time.
    #[test]
    fn prop_sequential_flow_needs_every_step(roles in arb_steps(6)) {
        let org = Org::new();
        let mut claim = org.submit(
            &org.employee,
            rule_set(to_steps(&roles), ConditionalSpec::none()),
        );

        for (i, role) in roles.iter().enumerate() {
            prop_assert_eq!(claim.status, ClaimStatus::Pending);
            prop_assert_eq!(claim.step_index, i);
            claim = ApprovalEngine::decide(
                &claim,
                holder(&org, *role),
                Decision::Approve,
                None,
                &org.directory,
            )
            .unwrap();
        }

        prop_assert_eq!(claim.status, ClaimStatus::Approved);
        prop_assert_eq!(claim.resolution, Some(Resolution::SequenceCompleted));
        prop_assert_eq!(claim.decision_log.len(), roles.len());
        for (i, entry) in claim.decision_log.iter().enumerate() {
            prop_assert_eq!(entry.step_index, i);
        }
    }

    // =========================================================================
    // Property 2: Rejection is immediate
    // =========================================================================

    /// A rejection at any step ends the claim with exactly k+1 log entries.
    #[test]
    fn prop_rejection_at_any_step_is_terminal(
        (roles, k) in arb_steps(6).prop_flat_map(|roles| {
            let len = roles.len();
            (Just(roles), 0..len)
        })
    ) {
        let org = Org::new();
        let mut claim = org.submit(
            &org.employee,
            rule_set(to_steps(&roles), ConditionalSpec::none()),
        );

        for role in roles.iter().take(k) {
            claim = ApprovalEngine::decide(
                &claim,
                holder(&org, *role),
                Decision::Approve,
                None,
                &org.directory,
            )
            .unwrap();
        }

        let rejected = ApprovalEngine::decide(
            &claim,
            holder(&org, roles[k]),
            Decision::Reject,
            Some("Not reimbursable"),
            &org.directory,
        )
        .unwrap();

        prop_assert_eq!(rejected.status, ClaimStatus::Rejected);
        prop_assert_eq!(rejected.decision_log.len(), k + 1);
        prop_assert_eq!(rejected.step_index, k);
    }

    // =========================================================================
    // Property 3: Terminal claims are immutable
    // =========================================================================

    /// Every decision on a terminal claim fails and leaves it unchanged.
    #[test]
    fn prop_terminal_claims_reject_further_decisions(
        roles in arb_steps(4),
        reject_first in any::<bool>(),
        approve_again in any::<bool>(),
    ) {
        let org = Org::new();
        let mut claim = org.submit(
            &org.employee,
            rule_set(to_steps(&roles), ConditionalSpec::none()),
        );

        if reject_first {
            claim = ApprovalEngine::decide(
                &claim,
                holder(&org, roles[0]),
                Decision::Reject,
                Some("No receipt"),
                &org.directory,
            )
            .unwrap();
        } else {
            for role in &roles {
                claim = ApprovalEngine::decide(
                    &claim,
                    holder(&org, *role),
                    Decision::Approve,
                    None,
                    &org.directory,
                )
                .unwrap();
            }
        }
        prop_assert!(claim.status.is_terminal());

        let before = claim.clone();
        let decision = if approve_again { Decision::Approve } else { Decision::Reject };
        let result =
            ApprovalEngine::decide(&claim, &org.admin, decision, Some("again"), &org.directory);

        let is_finalized = matches!(result, Err(WorkflowError::AlreadyFinalized { .. }));
        prop_assert!(is_finalized);
        prop_assert_eq!(claim, before);
    }

    // =========================================================================
    // Property 4: Percentage preempts the sequence
    // =========================================================================

    /// Under OR with an absent specific approver, the claim auto-approves
    /// after the smallest approval count meeting the threshold.
    #[test]
    fn prop_percentage_threshold_stops_at_smallest_count(
        roles in arb_steps(8),
        threshold in 1u8..=100,
    ) {
        let org = Org::new();
        let total = roles.len();
        let needed = (usize::from(threshold) * total).div_ceil(100);
        let spec = ConditionalSpec::any_of(threshold, Role::Ceo);
        let mut claim = org.submit(&org.employee, rule_set(to_steps(&roles), spec));

        for role in &roles {
            if !claim.is_pending() {
                break;
            }
            claim = ApprovalEngine::decide(
                &claim,
                holder(&org, *role),
                Decision::Approve,
                None,
                &org.directory,
            )
            .unwrap();
        }

        prop_assert_eq!(claim.status, ClaimStatus::Approved);
        prop_assert_eq!(claim.decision_log.len(), needed);
        prop_assert_eq!(
            claim.resolution,
            Some(Resolution::AutoApproved(AutoApprovalTrigger::Percentage))
        );
    }
}
