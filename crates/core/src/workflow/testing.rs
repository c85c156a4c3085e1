//! Shared fixtures for workflow tests.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use spendflow_shared::types::{ActorId, CurrencyCode, RuleSetId};
use std::collections::HashMap;

use crate::currency::{ExchangeRate, RateTable};
use crate::workflow::actor::{Actor, Role};
use crate::workflow::claim::{Claim, ClaimSubmission};
use crate::workflow::rule::{ConditionalSpec, RuleSet, RuleStep};
use crate::workflow::service::WorkflowService;

pub fn usd() -> CurrencyCode {
    CurrencyCode::parse("USD").unwrap()
}

pub fn code(raw: &str) -> CurrencyCode {
    CurrencyCode::parse(raw).unwrap()
}

pub fn rate_table() -> RateTable {
    let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    RateTable::new(
        usd(),
        vec![
            ExchangeRate::new(code("EUR"), usd(), dec!(1.10), date),
            ExchangeRate::new(code("GBP"), usd(), dec!(1.27), date),
            ExchangeRate::new(code("INR"), usd(), dec!(0.012), date),
        ],
    )
    .unwrap()
}

pub fn rule_set(steps: Vec<RuleStep>, conditional: ConditionalSpec) -> RuleSet {
    RuleSet::new(RuleSetId::new(), "Test Flow", steps, conditional).unwrap()
}

/// Employee's manager, then Finance, then Director.
pub fn travel_flow(conditional: ConditionalSpec) -> RuleSet {
    rule_set(
        vec![
            RuleStep::submitter_manager(),
            RuleStep::fixed(Role::Finance),
            RuleStep::fixed(Role::Director),
        ],
        conditional,
    )
}

pub fn submission(amount: rust_decimal::Decimal, currency: &str) -> ClaimSubmission {
    ClaimSubmission {
        category: "Travel".to_string(),
        description: "Client visit".to_string(),
        original_amount: amount,
        original_currency: currency.to_string(),
        date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
    }
}

fn actor(name: &str, role: Role, manager_id: Option<ActorId>) -> Actor {
    Actor {
        id: ActorId::new(),
        name: name.to_string(),
        email: format!("{}@company.com", name.to_lowercase().replace(' ', ".")),
        role,
        manager_id,
    }
}

/// A small organization covering every reporting shape the engine handles.
pub struct Org {
    pub admin: Actor,
    pub manager: Actor,
    pub other_manager: Actor,
    pub employee: Actor,
    pub orphan: Actor,
    pub finance: Actor,
    pub hr: Actor,
    pub director: Actor,
    pub director_report: Actor,
    pub directory: HashMap<ActorId, Actor>,
}

impl Org {
    pub fn new() -> Self {
        let admin = actor("Ava Admin", Role::Admin, None);
        let manager = actor("Mike Manager", Role::Manager, Some(admin.id));
        let other_manager = actor("Mona Manager", Role::Manager, Some(admin.id));
        let employee = actor("Emily Employee", Role::Employee, Some(manager.id));
        let orphan = actor("Oscar Orphan", Role::Employee, None);
        let finance = actor("Fiona Finance", Role::Finance, Some(admin.id));
        let hr = actor("Hana HR", Role::Hr, Some(admin.id));
        let director = actor("Dan Director", Role::Director, Some(admin.id));
        let director_report = actor("Rita Report", Role::Employee, Some(director.id));

        let directory = [
            &admin,
            &manager,
            &other_manager,
            &employee,
            &orphan,
            &finance,
            &hr,
            &director,
            &director_report,
        ]
        .into_iter()
        .map(|a| (a.id, a.clone()))
        .collect();

        Self {
            admin,
            manager,
            other_manager,
            employee,
            orphan,
            finance,
            hr,
            director,
            director_report,
            directory,
        }
    }

    /// Submits a 450 EUR travel claim bound to `rule_set`.
    pub fn submit(&self, submitter: &Actor, rule_set: RuleSet) -> Claim {
        WorkflowService::submit(submitter, submission(dec!(450), "EUR"), &rule_set, &rate_table())
            .unwrap()
    }
}
