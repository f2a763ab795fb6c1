use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{info, instrument};

use super::{
    dto::{LoginRequest, RegisterRequest, TokenResponse},
    services,
};
use crate::{
    error::{not_found_fallback, AppError},
    extract::ApiJson,
    state::AppState,
    store::User,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup).fallback(not_found_fallback))
        .route("/signin", post(signin).fallback(not_found_fallback))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = services::register(state.users.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user_id =
        services::verify_credentials(state.users.as_ref(), &payload.email, &payload.password)
            .await?;
    let token = state.keys.issue(user_id)?;

    info!(user_id = %user_id, "user logged in");
    Ok(Json(TokenResponse { token }))
}
