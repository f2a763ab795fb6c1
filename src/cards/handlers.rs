use axum::{
    extract::State,
    routing::{delete, get, put},
    Json, Router,
};
use tracing::instrument;

use super::{dto::CreateCardRequest, services};
use crate::{
    auth::AuthUser,
    error::{not_found_fallback, AppError},
    extract::{parse_id, ApiJson, ApiPath},
    state::AppState,
    store::Card,
};

pub fn card_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/cards",
            get(list_cards).post(create_card).fallback(not_found_fallback),
        )
        .route("/cards/:id", delete(delete_card).fallback(not_found_fallback))
        .route(
            "/cards/:id/likes",
            put(like_card)
                .delete(dislike_card)
                .fallback(not_found_fallback),
        )
}

// Protected, but the listing does not depend on who is asking.
#[instrument(skip(state))]
pub async fn list_cards(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<Card>>, AppError> {
    Ok(Json(state.cards.list_cards().await?))
}

#[instrument(skip(state, payload))]
pub async fn create_card(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<CreateCardRequest>,
) -> Result<Json<Card>, AppError> {
    let card = services::create_card(state.cards.as_ref(), user_id, payload).await?;
    Ok(Json(card))
}

#[instrument(skip(state))]
pub async fn delete_card(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Card>, AppError> {
    let id = parse_id(&id, "card")?;
    Ok(Json(services::delete_card(state.cards.as_ref(), id, user_id).await?))
}

#[instrument(skip(state))]
pub async fn like_card(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Card>, AppError> {
    let id = parse_id(&id, "card")?;
    Ok(Json(services::like_card(state.cards.as_ref(), id, user_id).await?))
}

#[instrument(skip(state))]
pub async fn dislike_card(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Card>, AppError> {
    let id = parse_id(&id, "card")?;
    Ok(Json(services::dislike_card(state.cards.as_ref(), id, user_id).await?))
}
