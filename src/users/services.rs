use uuid::Uuid;

use super::dto::{UpdateAvatarRequest, UpdateProfileRequest};
use crate::{
    error::AppError,
    store::{User, UserStore},
    validation::{check_text, check_url},
};

const USER_NOT_FOUND: &str = "User not found";

pub async fn get_user(users: &dyn UserStore, id: Uuid) -> Result<User, AppError> {
    users
        .find_user(id)
        .await?
        .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))
}

/// Updates the caller's own profile; there is no way to target another user.
pub async fn update_profile(
    users: &dyn UserStore,
    me: Uuid,
    req: UpdateProfileRequest,
) -> Result<User, AppError> {
    check_text(&req.name, "name")?;
    check_text(&req.about, "about")?;
    users
        .update_profile(me, &req.name, &req.about)
        .await?
        .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))
}

pub async fn update_avatar(
    users: &dyn UserStore,
    me: Uuid,
    req: UpdateAvatarRequest,
) -> Result<User, AppError> {
    check_url(&req.avatar, "avatar")?;
    users
        .update_avatar(me, &req.avatar)
        .await?
        .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::{memory::MemoryStore, NewUser};

    async fn seed(store: &MemoryStore) -> User {
        store
            .create_user(NewUser {
                email: "a@b.com".into(),
                password_hash: "hash".into(),
                name: None,
                about: None,
                avatar: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn get_user_reports_missing_as_not_found() {
        let store = MemoryStore::new();
        let user = seed(&store).await;
        assert_eq!(get_user(&store, user.id).await.unwrap().id, user.id);

        let err = get_user(&store, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn update_profile_changes_only_the_caller() {
        let store = MemoryStore::new();
        let user = seed(&store).await;
        let updated = update_profile(
            &store,
            user.id,
            UpdateProfileRequest {
                name: "Marie".into(),
                about: "Chemist".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Marie");
        assert_eq!(updated.about, "Chemist");
        assert_eq!(updated.avatar, user.avatar);
    }

    #[tokio::test]
    async fn update_profile_rejects_short_fields() {
        let store = MemoryStore::new();
        let user = seed(&store).await;
        let err = update_profile(
            &store,
            user.id,
            UpdateProfileRequest {
                name: "M".into(),
                about: "Chemist".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn update_avatar_requires_url() {
        let store = MemoryStore::new();
        let user = seed(&store).await;

        let err = update_avatar(
            &store,
            user.id,
            UpdateAvatarRequest {
                avatar: "avatar.png".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let updated = update_avatar(
            &store,
            user.id,
            UpdateAvatarRequest {
                avatar: "https://example.com/me.png".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.avatar, "https://example.com/me.png");
    }
}
