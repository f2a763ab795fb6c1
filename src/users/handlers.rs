use axum::{
    extract::State,
    routing::{get, patch},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{UpdateAvatarRequest, UpdateProfileRequest},
    services,
};
use crate::{
    auth::AuthUser,
    error::{not_found_fallback, AppError},
    extract::{parse_id, ApiJson, ApiPath},
    state::AppState,
    store::User,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).fallback(not_found_fallback))
        .route(
            "/users/me",
            get(get_me)
                .patch(update_profile)
                .fallback(not_found_fallback),
        )
        .route(
            "/users/me/avatar",
            patch(update_avatar).fallback(not_found_fallback),
        )
        .route("/users/:id", get(get_user).fallback(not_found_fallback))
}

// Protected, but the listing does not depend on who is asking.
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.users.list_users().await?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<User>, AppError> {
    Ok(Json(services::get_user(state.users.as_ref(), user_id).await?))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<User>, AppError> {
    let id = parse_id(&id, "user")?;
    Ok(Json(services::get_user(state.users.as_ref(), id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    Ok(Json(
        services::update_profile(state.users.as_ref(), user_id, payload).await?,
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_avatar(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<UpdateAvatarRequest>,
) -> Result<Json<User>, AppError> {
    Ok(Json(
        services::update_avatar(state.users.as_ref(), user_id, payload).await?,
    ))
}
