//! Expense claim routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use spendflow_core::workflow::{
    ActorDirectory, ApprovalEngine, Claim, ClaimQueries, ClaimSubmission, Decision, WorkflowError,
};
use spendflow_shared::types::ClaimId;

use crate::{AppState, error::ApiError, middleware::AuthActor};

/// Creates the claim routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/claims", get(list_claims).post(submit_claim))
        .route("/claims/pending", get(pending_claims))
        .route("/claims/{claim_id}", get(get_claim))
        .route("/claims/{claim_id}/decision", post(decide_claim))
}

/// Request body for approving or rejecting a claim.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    /// `approve` or `reject`.
    pub decision: Decision,
    /// Required when rejecting.
    #[serde(default)]
    pub comment: Option<String>,
}

/// A claim together with who it is waiting on.
#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    /// The claim.
    #[serde(flatten)]
    pub claim: Claim,
    /// Label of the current approver, absent once the claim is final or when
    /// the approver cannot be resolved.
    pub awaiting: Option<String>,
}

impl ClaimResponse {
    fn new(claim: Claim, directory: &impl ActorDirectory) -> Self {
        let awaiting = ApprovalEngine::current_approver(&claim, directory)
            .ok()
            .flatten()
            .map(|approver| approver.label());
        Self { claim, awaiting }
    }
}

/// List of claims.
#[derive(Debug, Serialize)]
pub struct ClaimListResponse {
    /// Claims, newest first.
    pub claims: Vec<ClaimResponse>,
    /// Number of claims.
    pub total: usize,
}

impl ClaimListResponse {
    fn new(claims: Vec<Claim>, directory: &impl ActorDirectory) -> Self {
        let claims: Vec<_> = claims
            .into_iter()
            .map(|claim| ClaimResponse::new(claim, directory))
            .collect();
        Self {
            total: claims.len(),
            claims,
        }
    }
}

/// GET `/claims` - Claims visible to the caller.
async fn list_claims(
    State(state): State<AppState>,
    auth: AuthActor,
) -> Result<Json<ClaimListResponse>, ApiError> {
    let claims = state.store.history_for(auth.actor_id())?;
    Ok(Json(ClaimListResponse::new(claims, &*state.store)))
}

/// GET `/claims/pending` - Claims waiting on the caller.
async fn pending_claims(
    State(state): State<AppState>,
    auth: AuthActor,
) -> Result<Json<ClaimListResponse>, ApiError> {
    let claims = state.store.pending_for(auth.actor_id())?;
    Ok(Json(ClaimListResponse::new(claims, &*state.store)))
}

/// POST `/claims` - Submit a claim as the caller.
async fn submit_claim(
    State(state): State<AppState>,
    auth: AuthActor,
    Json(submission): Json<ClaimSubmission>,
) -> Result<impl IntoResponse, ApiError> {
    let claim = state.store.submit(auth.actor_id(), submission)?;
    Ok((
        StatusCode::CREATED,
        Json(ClaimResponse::new(claim, &*state.store)),
    ))
}

/// GET `/claims/{claim_id}` - A single claim, if the caller may see it.
async fn get_claim(
    State(state): State<AppState>,
    auth: AuthActor,
    Path(claim_id): Path<ClaimId>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let claim = state
        .store
        .find_claim(claim_id)
        .filter(|claim| ClaimQueries::is_visible_to(claim, auth.actor()))
        .ok_or(WorkflowError::ClaimNotFound(claim_id))?;
    Ok(Json(ClaimResponse::new(claim, &*state.store)))
}

/// POST `/claims/{claim_id}/decision` - Approve or reject the current step.
async fn decide_claim(
    State(state): State<AppState>,
    auth: AuthActor,
    Path(claim_id): Path<ClaimId>,
    Json(payload): Json<DecisionRequest>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let claim = state.store.decide(
        claim_id,
        auth.actor_id(),
        payload.decision,
        payload.comment.as_deref(),
    )?;
    Ok(Json(ClaimResponse::new(claim, &*state.store)))
}
