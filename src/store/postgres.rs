use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::{Card, CardStore, NewCard, NewUser, StoreError, User, UserStore};

const USER_COLUMNS: &str = "id, email, password_hash, name, about, avatar";
const CARD_COLUMNS: &str = "id, name, link, owner, likes, created_at";

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { db })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation;
            }
            if db_err.is_check_violation() || db_err.is_foreign_key_violation() {
                return StoreError::Invalid(db_err.message().to_string());
            }
        }
        StoreError::Backend(anyhow::Error::new(e))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (email, password_hash, name, about, avatar) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.name_or_default())
            .bind(user.about_or_default())
            .bind(user.avatar_or_default())
            .fetch_one(&self.db)
            .await?;
        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at");
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.db).await?;
        Ok(users)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        about: &str,
    ) -> Result<Option<User>, StoreError> {
        let sql = format!(
            "UPDATE users SET name = $2, about = $3 WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(name)
            .bind(about)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn update_avatar(&self, id: Uuid, avatar: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("UPDATE users SET avatar = $2 WHERE id = $1 RETURNING {USER_COLUMNS}");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(avatar)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl CardStore for PgStore {
    async fn list_cards(&self) -> Result<Vec<Card>, StoreError> {
        let sql = format!("SELECT {CARD_COLUMNS} FROM cards ORDER BY created_at DESC");
        let cards = sqlx::query_as::<_, Card>(&sql).fetch_all(&self.db).await?;
        Ok(cards)
    }

    async fn create_card(&self, card: NewCard) -> Result<Card, StoreError> {
        let sql = format!(
            "INSERT INTO cards (name, link, owner) VALUES ($1, $2, $3) RETURNING {CARD_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Card>(&sql)
            .bind(&card.name)
            .bind(&card.link)
            .bind(card.owner)
            .fetch_one(&self.db)
            .await?;
        Ok(created)
    }

    async fn find_card(&self, id: Uuid) -> Result<Option<Card>, StoreError> {
        let sql = format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = $1");
        let card = sqlx::query_as::<_, Card>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(card)
    }

    async fn delete_card(&self, id: Uuid) -> Result<Option<Card>, StoreError> {
        let sql = format!("DELETE FROM cards WHERE id = $1 RETURNING {CARD_COLUMNS}");
        let card = sqlx::query_as::<_, Card>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(card)
    }

    async fn add_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<Card>, StoreError> {
        // Single statement so concurrent likers never race on the array.
        let sql = format!(
            "UPDATE cards \
                SET likes = CASE WHEN $2 = ANY(likes) THEN likes ELSE array_append(likes, $2) END \
              WHERE id = $1 \
             RETURNING {CARD_COLUMNS}"
        );
        let card = sqlx::query_as::<_, Card>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;
        Ok(card)
    }

    async fn remove_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<Card>, StoreError> {
        let sql = format!(
            "UPDATE cards SET likes = array_remove(likes, $2) WHERE id = $1 RETURNING {CARD_COLUMNS}"
        );
        let card = sqlx::query_as::<_, Card>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;
        Ok(card)
    }
}
