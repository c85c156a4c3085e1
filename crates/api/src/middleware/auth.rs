//! Actor identification for protected routes.
//!
//! Callers identify themselves with the `X-Actor-Id` header. Authentication
//! proper is handled upstream; this layer only resolves the id against the
//! store so handlers work with a registered [`Actor`].

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use spendflow_core::workflow::{Actor, ActorDirectory};
use spendflow_shared::AppError;
use spendflow_shared::types::ActorId;

use crate::AppState;
use crate::error::ApiError;

/// Header carrying the calling actor's id.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Resolves the calling actor and stores it in request extensions.
///
/// Rejects with 401 when the header is missing, malformed or names an
/// unregistered actor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(raw) = request
        .headers()
        .get(ACTOR_HEADER)
        .and_then(|h| h.to_str().ok())
    else {
        return unauthorized("X-Actor-Id header is required");
    };

    let Ok(actor_id) = raw.trim().parse::<ActorId>() else {
        return unauthorized("X-Actor-Id is not a valid actor id");
    };

    let Some(actor) = state.store.find_actor(actor_id) else {
        tracing::debug!(%actor_id, "Unknown actor rejected");
        return unauthorized("Unknown actor");
    };

    request.extensions_mut().insert(actor);
    next.run(request).await
}

fn unauthorized(message: &str) -> Response {
    ApiError::from(AppError::Unauthorized(message.to_string())).into_response()
}

/// Extractor for the calling actor.
///
/// ```ignore
/// async fn handler(auth: AuthActor) -> impl IntoResponse {
///     let actor_id = auth.actor_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthActor(pub Actor);

impl AuthActor {
    /// The calling actor's id.
    #[must_use]
    pub fn actor_id(&self) -> ActorId {
        self.0.id
    }

    /// The calling actor.
    #[must_use]
    pub fn actor(&self) -> &Actor {
        &self.0
    }

    /// Fails with 403 unless the caller is an administrator.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.0.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("administrator role required".to_string()).into())
        }
    }
}

impl<S> FromRequestParts<S> for AuthActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Actor>()
            .cloned()
            .map(AuthActor)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()).into())
    }
}
