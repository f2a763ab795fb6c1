//! Document store collaborator.
//!
//! The request pipeline only talks to the store through [`UserStore`] and
//! [`CardStore`]; backend-specific failures are folded into [`StoreError`]
//! before they leave the implementation.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub const DEFAULT_NAME: &str = "Jacques-Yves Cousteau";
pub const DEFAULT_ABOUT: &str = "Explorer";
pub const DEFAULT_AVATAR: &str =
    "https://pictures.s3.yandex.net/resources/jacques-cousteau_1604399756.png";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    UniqueViolation,
    #[error("invalid document: {0}")]
    Invalid(String),
    #[error(transparent)]
    Backend(anyhow::Error),
}

/// User document. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub about: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub link: String,
    pub owner: Uuid,
    pub likes: Vec<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub about: Option<String>,
    pub avatar: Option<String>,
}

impl NewUser {
    pub(crate) fn name_or_default(&self) -> String {
        self.name.clone().unwrap_or_else(|| DEFAULT_NAME.into())
    }

    pub(crate) fn about_or_default(&self) -> String {
        self.about.clone().unwrap_or_else(|| DEFAULT_ABOUT.into())
    }

    pub(crate) fn avatar_or_default(&self) -> String {
        self.avatar.clone().unwrap_or_else(|| DEFAULT_AVATAR.into())
    }
}

#[derive(Debug, Clone)]
pub struct NewCard {
    pub name: String,
    pub link: String,
    pub owner: Uuid,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::UniqueViolation`] when the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        about: &str,
    ) -> Result<Option<User>, StoreError>;
    async fn update_avatar(&self, id: Uuid, avatar: &str) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait CardStore: Send + Sync {
    async fn list_cards(&self) -> Result<Vec<Card>, StoreError>;
    async fn create_card(&self, card: NewCard) -> Result<Card, StoreError>;
    async fn find_card(&self, id: Uuid) -> Result<Option<Card>, StoreError>;
    async fn delete_card(&self, id: Uuid) -> Result<Option<Card>, StoreError>;
    /// Adds `user_id` to the card's likes unless already present.
    async fn add_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<Card>, StoreError>;
    /// Removes `user_id` from the card's likes; absent likers are a no-op.
    async fn remove_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<Card>, StoreError>;
}
