//! Concurrent access tests for claim decisions.
//!
//! These tests verify that:
//! - Racing decisions on one claim serialize, with exactly one winner per prior state
//! - Decisions on different claims proceed independently
//! - Rule edits racing with decisions never alter a pending claim's bound steps

use chrono::NaiveDate;
use futures::future::join_all;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tokio::sync::Barrier;

use spendflow_core::currency::ExchangeRate;
use spendflow_core::workflow::{
    Actor, ClaimStatus, ClaimSubmission, ConditionalSpec, Decision, Role, RuleSetDefinition,
    RuleStep, WorkflowError,
};
use spendflow_shared::types::{ActorId, CurrencyCode, RuleSetId};
use spendflow_store::{ExpenseStore, NewActor};

struct Org {
    store: Arc<ExpenseStore>,
    admin: Actor,
    manager: Actor,
    employees: Vec<Actor>,
    finance: Vec<Actor>,
}

fn register(store: &ExpenseStore, name: &str, role: Role, manager_id: Option<ActorId>) -> Actor {
    store
        .register_actor(NewActor {
            name: name.to_string(),
            email: format!("{}@company.com", name.to_lowercase().replace(' ', ".")),
            role,
            manager_id,
        })
        .unwrap()
}

fn setup(employees: usize, finance: usize) -> Org {
    let store = ExpenseStore::new(CurrencyCode::parse("USD").unwrap());
    let admin = register(&store, "Ava Admin", Role::Admin, None);
    let manager = register(&store, "Mike Manager", Role::Manager, Some(admin.id));
    let employees = (0..employees)
        .map(|i| register(&store, &format!("Employee {i}"), Role::Employee, Some(manager.id)))
        .collect();
    let finance = (0..finance)
        .map(|i| register(&store, &format!("Finance {i}"), Role::Finance, Some(admin.id)))
        .collect();

    store
        .refresh_rates([ExchangeRate::new(
            CurrencyCode::parse("EUR").unwrap(),
            CurrencyCode::parse("USD").unwrap(),
            dec!(1.10),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )])
        .unwrap();

    store
        .create_or_update_rule(
            RuleSetId::new(),
            RuleSetDefinition {
                name: "Standard Travel Flow".to_string(),
                steps: vec![
                    RuleStep::submitter_manager(),
                    RuleStep::fixed(Role::Finance),
                    RuleStep::fixed(Role::Director),
                ],
                conditional: ConditionalSpec::none(),
            },
        )
        .unwrap();

    Org {
        store: Arc::new(store),
        admin,
        manager,
        employees,
        finance,
    }
}

fn submission(amount: rust_decimal::Decimal) -> ClaimSubmission {
    ClaimSubmission {
        category: "Travel".to_string(),
        description: String::new(),
        original_amount: amount,
        original_currency: "EUR".to_string(),
        date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
    }
}

/// Many approvers race on the same step: exactly one approval lands.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_same_claim_decisions_serialize() {
    const RACERS: usize = 16;
    let org = setup(1, RACERS);
    let claim = org
        .store
        .submit(org.employees[0].id, submission(dec!(450)))
        .unwrap();
    org.store
        .decide(claim.id, org.manager.id, Decision::Approve, None)
        .unwrap();

    let barrier = Arc::new(Barrier::new(RACERS));
    let tasks = org.finance.iter().map(|actor| {
        let store = Arc::clone(&org.store);
        let barrier = Arc::clone(&barrier);
        let actor_id = actor.id;
        tokio::spawn(async move {
            barrier.wait().await;
            store.decide(claim.id, actor_id, Decision::Approve, None)
        })
    });

    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one finance approval may land");
    for result in &results {
        if let Err(e) = result {
            assert!(
                matches!(e, WorkflowError::UnauthorizedApprover { .. }),
                "losers see the advanced state, got {e:?}"
            );
        }
    }

    let stored = org.store.find_claim(claim.id).unwrap();
    assert_eq!(stored.status, ClaimStatus::Pending);
    assert_eq!(stored.step_index, 2);
    assert_eq!(stored.decision_log.len(), 2);
}

/// A manager approval and an admin rejection race on step 0. The rejection
/// always lands; the approval either lands first or finds the claim final.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_approve_and_reject_lose_no_update() {
    for _ in 0..20 {
        let org = setup(1, 1);
        let claim = org
            .store
            .submit(org.employees[0].id, submission(dec!(100)))
            .unwrap();

        let barrier = Arc::new(Barrier::new(2));
        let approve = {
            let store = Arc::clone(&org.store);
            let barrier = Arc::clone(&barrier);
            let actor_id = org.manager.id;
            tokio::spawn(async move {
                barrier.wait().await;
                store.decide(claim.id, actor_id, Decision::Approve, None)
            })
        };
        let reject = {
            let store = Arc::clone(&org.store);
            let barrier = Arc::clone(&barrier);
            let actor_id = org.admin.id;
            tokio::spawn(async move {
                barrier.wait().await;
                store.decide(claim.id, actor_id, Decision::Reject, Some("Duplicate claim"))
            })
        };

        let approve = approve.await.unwrap();
        let rejected = reject.await.unwrap().unwrap();
        let stored = org.store.find_claim(claim.id).unwrap();

        assert_eq!(rejected.status, ClaimStatus::Rejected);
        assert_eq!(stored, rejected);
        match approve {
            Ok(_) => assert_eq!(stored.decision_log.len(), 2),
            Err(e) => {
                assert!(matches!(e, WorkflowError::AlreadyFinalized { .. }), "{e:?}");
                assert_eq!(stored.decision_log.len(), 1);
            }
        }
    }
}

/// Claims of different employees are decided in parallel without
/// interference.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_cross_claim_decisions_are_independent() {
    const CLAIMS: usize = 50;
    let org = setup(CLAIMS, 1);
    let claims: Vec<_> = org
        .employees
        .iter()
        .enumerate()
        .map(|(i, employee)| {
            org.store
                .submit(employee.id, submission(dec!(10) + rust_decimal::Decimal::from(i)))
                .unwrap()
        })
        .collect();

    let barrier = Arc::new(Barrier::new(CLAIMS));
    let tasks = claims.iter().map(|claim| {
        let store = Arc::clone(&org.store);
        let barrier = Arc::clone(&barrier);
        let manager_id = org.manager.id;
        let claim_id = claim.id;
        tokio::spawn(async move {
            barrier.wait().await;
            store.decide(claim_id, manager_id, Decision::Approve, None)
        })
    });

    for joined in join_all(tasks).await {
        let claim = joined.unwrap().unwrap();
        assert_eq!(claim.step_index, 1);
        assert_eq!(claim.decision_log.len(), 1);
    }

    assert_eq!(org.store.pending_for(org.finance[0].id).unwrap().len(), CLAIMS);
    assert!(org.store.pending_for(org.manager.id).unwrap().is_empty());
}

/// Rule edits racing with decisions leave bound snapshots alone.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rule_edits_do_not_reach_pending_claims() {
    let org = setup(1, 1);
    let rule_set = org.store.default_rule_set().unwrap();
    let claim = org
        .store
        .submit(org.employees[0].id, submission(dec!(75)))
        .unwrap();

    let barrier = Arc::new(Barrier::new(2));
    let edit = {
        let store = Arc::clone(&org.store);
        let barrier = Arc::clone(&barrier);
        let id = rule_set.id;
        tokio::spawn(async move {
            barrier.wait().await;
            for _ in 0..10 {
                store
                    .create_or_update_rule(
                        id,
                        RuleSetDefinition {
                            name: "Finance Only".to_string(),
                            steps: vec![RuleStep::fixed(Role::Finance)],
                            conditional: ConditionalSpec::none(),
                        },
                    )
                    .unwrap();
            }
        })
    };
    let decide = {
        let store = Arc::clone(&org.store);
        let barrier = Arc::clone(&barrier);
        let manager_id = org.manager.id;
        tokio::spawn(async move {
            barrier.wait().await;
            store.decide(claim.id, manager_id, Decision::Approve, None)
        })
    };

    edit.await.unwrap();
    let decided = decide.await.unwrap().unwrap();

    assert_eq!(decided.rule_set.version, 1);
    assert_eq!(decided.rule_set.step_count(), 3);
    assert_eq!(decided.current_step, "Finance");
    assert_eq!(org.store.find_rule_set(rule_set.id).unwrap().version, 11);
}
