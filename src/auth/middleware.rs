use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

/// Identity resolved from a valid bearer token, scoped to one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
}

/// Guards protected routes. Nothing behind this layer runs unless the
/// request carries a valid `Authorization: Bearer <token>` header.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;

    let user_id = state.keys.verify(token).map_err(|e| {
        warn!(error = %e, "rejected bearer token");
        AppError::Unauthenticated
    })?;

    request.extensions_mut().insert(AuthContext { user_id });
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            warn!("missing Authorization header");
            AppError::Unauthenticated
        })?;

    auth.strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            warn!("invalid auth scheme");
            AppError::Unauthenticated
        })
}

/// The authenticated user's id, as bound by [`require_auth`].
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .map(|ctx| AuthUser(ctx.user_id))
            .ok_or(AppError::Unauthenticated)
    }
}
