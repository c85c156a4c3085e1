//! Shared fixtures for route tests.

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use serde_json::Value;
use spendflow_core::currency::ExchangeRate;
use spendflow_core::workflow::{Actor, Role, RuleSet, RuleSetDefinition};
use spendflow_shared::types::{ActorId, CurrencyCode, RuleSetId};
use spendflow_store::{ExpenseStore, NewActor};
use std::sync::Arc;
use tower::ServiceExt;

use crate::middleware::ACTOR_HEADER;
use crate::{AppState, create_router};

/// A seeded organization behind the full router.
pub(crate) struct TestApp {
    pub router: Router,
    pub store: Arc<ExpenseStore>,
    pub admin: Actor,
    pub manager: Actor,
    pub employee: Actor,
    pub colleague: Actor,
    pub finance: Actor,
    pub director: Actor,
    pub rule_set: RuleSet,
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

impl TestApp {
    pub fn new() -> Self {
        let store = ExpenseStore::new(CurrencyCode::parse("USD").unwrap());
        let admin = register(&store, "Ava Admin", Role::Admin, None);
        let manager = register(&store, "Mike Manager", Role::Manager, Some(admin.id));
        let employee = register(&store, "Emily Employee", Role::Employee, Some(manager.id));
        let colleague = register(&store, "Carl Colleague", Role::Employee, Some(manager.id));
        let finance = register(&store, "Fiona Finance", Role::Finance, Some(admin.id));
        let director = register(&store, "Dana Director", Role::Director, Some(admin.id));

        store
            .refresh_rates([ExchangeRate::new(
                CurrencyCode::parse("EUR").unwrap(),
                CurrencyCode::parse("USD").unwrap(),
                dec!(1.10),
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            )])
            .unwrap();

        let rule_set = store
            .create_or_update_rule(
                RuleSetId::new(),
                RuleSetDefinition::parse(
                    "Standard Travel Flow",
                    &["manager", "Finance", "Director"],
                    "none",
                    None,
                    None,
                )
                .unwrap(),
            )
            .unwrap();

        let state = AppState::new(store);
        Self {
            router: create_router(state.clone()),
            store: state.store,
            admin,
            manager,
            employee,
            colleague,
            finance,
            director,
            rule_set,
        }
    }

    /// Sends a request and returns the status with the JSON body
    /// (`Value::Null` when the body is empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        actor: Option<&Actor>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(actor) = actor {
            builder = builder.header(ACTOR_HEADER, actor.id.to_string());
        }
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, actor: &Actor) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(actor), None).await
    }

    pub async fn post(&self, uri: &str, actor: &Actor, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(actor), Some(body)).await
    }

    pub async fn put(&self, uri: &str, actor: &Actor, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(actor), Some(body)).await
    }
}
