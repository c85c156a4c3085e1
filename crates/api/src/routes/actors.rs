//! Actor directory routes.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use spendflow_core::workflow::Actor;
use spendflow_store::NewActor;

use crate::{AppState, error::ApiError, middleware::AuthActor};

/// Creates the actor routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/actors", get(list_actors).post(register_actor))
        .route("/actors/me", get(current_actor))
}

/// GET `/actors/me` - The calling actor.
async fn current_actor(auth: AuthActor) -> Json<Actor> {
    Json(auth.0)
}

/// GET `/actors` - Every registered actor (admin only).
async fn list_actors(
    State(state): State<AppState>,
    auth: AuthActor,
) -> Result<Json<Vec<Actor>>, ApiError> {
    auth.require_admin()?;
    Ok(Json(state.store.list_actors()))
}

/// POST `/actors` - Register an actor (admin only).
async fn register_actor(
    State(state): State<AppState>,
    auth: AuthActor,
    Json(payload): Json<NewActor>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;
    let actor = state.store.register_actor(payload)?;
    Ok((StatusCode::CREATED, Json(actor)))
}
