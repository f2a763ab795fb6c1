use tracing::{info, warn};
use uuid::Uuid;

use super::dto::CreateCardRequest;
use crate::{
    error::AppError,
    store::{Card, CardStore, NewCard},
    validation::{check_text, check_url},
};

const CARD_NOT_FOUND: &str = "Card not found";

pub async fn create_card(
    cards: &dyn CardStore,
    owner: Uuid,
    req: CreateCardRequest,
) -> Result<Card, AppError> {
    check_text(&req.name, "name")?;
    check_url(&req.link, "link")?;

    let card = cards
        .create_card(NewCard {
            name: req.name,
            link: req.link,
            owner,
        })
        .await?;
    info!(card_id = %card.id, %owner, "card created");
    Ok(card)
}

/// Only the card's creator may mutate it destructively.
pub fn authorize_owner(card: &Card, actor: Uuid) -> Result<(), AppError> {
    if card.owner != actor {
        warn!(card_id = %card.id, owner = %card.owner, %actor, "ownership mismatch");
        return Err(AppError::forbidden("You cannot delete another user's card"));
    }
    Ok(())
}

/// Existence is checked before permission: a missing card is reported as
/// missing to everyone, owner or not.
pub async fn delete_card(cards: &dyn CardStore, id: Uuid, actor: Uuid) -> Result<Card, AppError> {
    let card = cards
        .find_card(id)
        .await?
        .ok_or_else(|| AppError::not_found(CARD_NOT_FOUND))?;

    authorize_owner(&card, actor)?;

    let deleted = cards
        .delete_card(id)
        .await?
        .ok_or_else(|| AppError::not_found(CARD_NOT_FOUND))?;
    info!(card_id = %id, "card deleted");
    Ok(deleted)
}

pub async fn like_card(cards: &dyn CardStore, id: Uuid, user_id: Uuid) -> Result<Card, AppError> {
    cards
        .add_like(id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found(CARD_NOT_FOUND))
}

pub async fn dislike_card(
    cards: &dyn CardStore,
    id: Uuid,
    user_id: Uuid,
) -> Result<Card, AppError> {
    cards
        .remove_like(id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found(CARD_NOT_FOUND))
}
