//! Approval rule set routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use spendflow_core::workflow::{RuleSet, RuleSetDefinition, WorkflowError};
use spendflow_shared::types::RuleSetId;

use crate::{AppState, error::ApiError, middleware::AuthActor};

/// Creates the rule set routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rule-sets", get(list_rule_sets))
        .route("/rule-sets/{rule_set_id}", get(get_rule_set).put(save_rule_set))
        .route("/rule-sets/{rule_set_id}/default", put(make_default))
}

/// Request body for creating or editing a rule set.
#[derive(Debug, Deserialize)]
pub struct SaveRuleSetRequest {
    /// Display name.
    pub name: String,
    /// Ordered step roles; `"manager"` is the submitter's manager and
    /// `"role:manager"` is anyone holding the Manager role.
    pub steps: Vec<String>,
    /// `none`, `or` or `and`. Defaults to `none`.
    #[serde(default)]
    pub combinator: Option<String>,
    /// Percentage of steps that must approve.
    #[serde(default)]
    pub percentage_threshold: Option<u8>,
    /// Role whose approval auto-approves.
    #[serde(default)]
    pub specific_approver: Option<String>,
}

/// A rule set with display helpers.
#[derive(Debug, Serialize)]
pub struct RuleSetResponse {
    /// The latest version.
    #[serde(flatten)]
    pub rule_set: RuleSet,
    /// Step labels in order.
    pub step_labels: Vec<&'static str>,
    /// Whether new submissions bind to this rule set.
    pub is_default: bool,
}

impl RuleSetResponse {
    fn new(rule_set: RuleSet, default: Option<RuleSetId>) -> Self {
        Self {
            step_labels: rule_set.steps.iter().map(|s| s.approver.label()).collect(),
            is_default: default == Some(rule_set.id),
            rule_set,
        }
    }
}

/// GET `/rule-sets` - Latest version of every rule set.
async fn list_rule_sets(State(state): State<AppState>, _auth: AuthActor) -> impl IntoResponse {
    let default = state.store.default_rule_set().map(|r| r.id);
    let rule_sets: Vec<_> = state
        .store
        .list_rule_sets()
        .into_iter()
        .map(|r| RuleSetResponse::new(r, default))
        .collect();
    Json(rule_sets)
}

/// GET `/rule-sets/{rule_set_id}` - Latest version of one rule set.
async fn get_rule_set(
    State(state): State<AppState>,
    _auth: AuthActor,
    Path(rule_set_id): Path<RuleSetId>,
) -> Result<Json<RuleSetResponse>, ApiError> {
    let rule_set = state
        .store
        .find_rule_set(rule_set_id)
        .ok_or(WorkflowError::RuleSetNotFound(rule_set_id))?;
    let default = state.store.default_rule_set().map(|r| r.id);
    Ok(Json(RuleSetResponse::new(rule_set, default)))
}

/// PUT `/rule-sets/{rule_set_id}` - Create or edit a rule set (admin only).
///
/// Responds 201 for a new rule set and 200 for a new version of an existing
/// one. Claims already submitted keep the version they were bound to.
async fn save_rule_set(
    State(state): State<AppState>,
    auth: AuthActor,
    Path(rule_set_id): Path<RuleSetId>,
    Json(payload): Json<SaveRuleSetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;

    let definition = RuleSetDefinition::parse(
        payload.name,
        &payload.steps,
        payload.combinator.as_deref().unwrap_or("none"),
        payload.percentage_threshold,
        payload.specific_approver.as_deref(),
    )?;
    let rule_set = state.store.create_or_update_rule(rule_set_id, definition)?;

    let status = if rule_set.version == 1 {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let default = state.store.default_rule_set().map(|r| r.id);
    Ok((status, Json(RuleSetResponse::new(rule_set, default))))
}

/// PUT `/rule-sets/{rule_set_id}/default` - Bind new submissions to this rule set (admin only).
async fn make_default(
    State(state): State<AppState>,
    auth: AuthActor,
    Path(rule_set_id): Path<RuleSetId>,
) -> Result<Json<RuleSetResponse>, ApiError> {
    auth.require_admin()?;
    state.store.set_default_rule_set(rule_set_id)?;
    let rule_set = state
        .store
        .find_rule_set(rule_set_id)
        .ok_or(WorkflowError::RuleSetNotFound(rule_set_id))?;
    Ok(Json(RuleSetResponse::new(rule_set, Some(rule_set_id))))
}

#[cfg(test)]
mod tests {
    use crate::testing::TestApp;
    use axum::http::{Method, StatusCode};
    use rstest::rstest;
    use serde_json::json;
    use spendflow_shared::types::RuleSetId;

    #[tokio::test]
    async fn test_list_marks_default() {
        let app = TestApp::new();
        let (status, body) = app.get("/api/v1/rule-sets", &app.employee).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["name"], "Standard Travel Flow");
        assert_eq!(body[0]["is_default"], true);
        assert_eq!(
            body[0]["step_labels"],
            json!(["Employee's Manager", "Finance", "Director"])
        );
    }

    #[tokio::test]
    async fn test_edit_creates_new_version_without_touching_pending_claims() {
        let app = TestApp::new();
        let (_, claim) = app
            .post(
                "/api/v1/claims",
                &app.employee,
                json!({
                    "category": "Meals",
                    "original_amount": "40",
                    "original_currency": "USD",
                    "date": "2025-03-14"
                }),
            )
            .await;

        let uri = format!("/api/v1/rule-sets/{}", app.rule_set.id);
        let (status, body) = app
            .put(
                &uri,
                &app.admin,
                json!({
                    "name": "Finance Only",
                    "steps": ["Finance"],
                    "combinator": "or",
                    "percentage_threshold": 100,
                    "specific_approver": "CFO"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["version"], 2);
        assert_eq!(body["conditional"]["combinator"], "OR");

        let claim_uri = format!("/api/v1/claims/{}", claim["id"].as_str().unwrap());
        let (_, claim) = app.get(&claim_uri, &app.employee).await;
        assert_eq!(claim["rule_set"]["version"], 1);
        assert_eq!(claim["rule_set"]["steps"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_create_and_make_default() {
        let app = TestApp::new();
        let id = RuleSetId::new();
        let (status, body) = app
            .put(
                &format!("/api/v1/rule-sets/{id}"),
                &app.admin,
                json!({ "name": "Quick", "steps": ["Finance"] }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["is_default"], false);

        let (status, body) = app
            .send(
                Method::PUT,
                &format!("/api/v1/rule-sets/{id}/default"),
                Some(&app.admin),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_default"], true);
        assert_eq!(app.store.default_rule_set().unwrap().id, id);
    }

    #[tokio::test]
    async fn test_fixed_manager_role_step() {
        let app = TestApp::new();
        let id = RuleSetId::new();
        let (status, body) = app
            .put(
                &format!("/api/v1/rule-sets/{id}"),
                &app.admin,
                json!({ "name": "Managers", "steps": ["manager", "role:manager"] }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["step_labels"], json!(["Employee's Manager", "Manager"]));
        assert_eq!(body["steps"][0]["approver"]["kind"], "submitter_manager");
        assert_eq!(body["steps"][1]["approver"]["kind"], "fixed");
        assert_eq!(body["steps"][1]["approver"]["role"], "Manager");
    }

    #[rstest]
    #[case::unknown_role(json!({ "name": "X", "steps": ["Wizard"] }), "unknown_role")]
    #[case::unknown_combinator(
        json!({ "name": "X", "steps": ["Finance"], "combinator": "xor" }),
        "unknown_combinator"
    )]
    #[case::no_steps(json!({ "name": "X", "steps": [] }), "validation_error")]
    #[case::or_without_condition(
        json!({ "name": "X", "steps": ["Finance"], "combinator": "or" }),
        "validation_error"
    )]
    #[tokio::test]
    async fn test_invalid_definitions_are_rejected(
        #[case] payload: serde_json::Value,
        #[case] code: &str,
    ) {
        let app = TestApp::new();
        let uri = format!("/api/v1/rule-sets/{}", app.rule_set.id);
        let (status, body) = app.put(&uri, &app.admin, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], code);
        assert_eq!(app.store.find_rule_set(app.rule_set.id).unwrap().version, 1);
    }

    #[tokio::test]
    async fn test_only_admins_edit_rule_sets() {
        let app = TestApp::new();
        let uri = format!("/api/v1/rule-sets/{}", app.rule_set.id);
        let (status, body) = app
            .put(&uri, &app.manager, json!({ "name": "X", "steps": ["Finance"] }))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "forbidden");
    }

    #[tokio::test]
    async fn test_unknown_rule_set_is_not_found() {
        let app = TestApp::new();
        let (status, body) = app
            .get(&format!("/api/v1/rule-sets/{}", RuleSetId::new()), &app.admin)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "rule_set_not_found");
    }
}
