use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Card, CardStore, NewCard, NewUser, StoreError, User, UserStore};

/// In-process store used by the unit tests.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<Uuid, User>>,
    cards: Mutex<HashMap<Uuid, Card>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation);
        }
        let created = User {
            id: Uuid::new_v4(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            name: user.name_or_default(),
            about: user.about_or_default(),
            avatar: user.avatar_or_default(),
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.lock().unwrap().values().cloned().collect())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        about: &str,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.users.lock().unwrap();
        Ok(users.get_mut(&id).map(|u| {
            u.name = name.to_string();
            u.about = about.to_string();
            u.clone()
        }))
    }

    async fn update_avatar(&self, id: Uuid, avatar: &str) -> Result<Option<User>, StoreError> {
        let mut users = self.users.lock().unwrap();
        Ok(users.get_mut(&id).map(|u| {
            u.avatar = avatar.to_string();
            u.clone()
        }))
    }
}

#[async_trait]
impl CardStore for MemoryStore {
    async fn list_cards(&self) -> Result<Vec<Card>, StoreError> {
        Ok(self.cards.lock().unwrap().values().cloned().collect())
    }

    async fn create_card(&self, card: NewCard) -> Result<Card, StoreError> {
        let created = Card {
            id: Uuid::new_v4(),
            name: card.name,
            link: card.link,
            owner: card.owner,
            likes: Vec::new(),
            created_at: OffsetDateTime::now_utc(),
        };
        self.cards.lock().unwrap().insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_card(&self, id: Uuid) -> Result<Option<Card>, StoreError> {
        Ok(self.cards.lock().unwrap().get(&id).cloned())
    }

    async fn delete_card(&self, id: Uuid) -> Result<Option<Card>, StoreError> {
        Ok(self.cards.lock().unwrap().remove(&id))
    }

    async fn add_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<Card>, StoreError> {
        let mut cards = self.cards.lock().unwrap();
        Ok(cards.get_mut(&id).map(|c| {
            if !c.likes.contains(&user_id) {
                c.likes.push(user_id);
            }
            c.clone()
        }))
    }

    async fn remove_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<Card>, StoreError> {
        let mut cards = self.cards.lock().unwrap();
        Ok(cards.get_mut(&id).map(|c| {
            c.likes.retain(|l| *l != user_id);
            c.clone()
        }))
    }
}
