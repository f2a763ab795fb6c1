use tracing::{info, warn};
use uuid::Uuid;

use super::dto::RegisterRequest;
use super::password::{hash_password, verify_against_decoy, verify_password};
use crate::{
    error::{AppError, CredentialFailure},
    store::{NewUser, StoreError, User, UserStore},
    validation::{check_text, check_url, is_valid_email, normalize_email},
};

/// Validates the request, hashes the password and creates the user.
pub async fn register(users: &dyn UserStore, req: RegisterRequest) -> Result<User, AppError> {
    let email = normalize_email(&req.email);
    if !is_valid_email(&email) {
        return Err(AppError::validation("Invalid email"));
    }
    if req.password.is_empty() {
        return Err(AppError::validation("Password is required"));
    }
    if let Some(name) = &req.name {
        check_text(name, "name")?;
    }
    if let Some(about) = &req.about {
        check_text(about, "about")?;
    }
    if let Some(avatar) = &req.avatar {
        check_url(avatar, "avatar")?;
    }

    let password_hash = hash_password(&req.password)?;
    let new_user = NewUser {
        email,
        password_hash,
        name: req.name,
        about: req.about,
        avatar: req.avatar,
    };

    let user = users.create_user(new_user).await.map_err(|e| match e {
        StoreError::UniqueViolation => AppError::DuplicateEmail,
        StoreError::Invalid(reason) => {
            warn!(%reason, "user document rejected by store");
            AppError::validation("Validation failed")
        }
        StoreError::Backend(e) => AppError::Internal(e),
    })?;

    info!(user_id = %user.id, "user registered");
    Ok(user)
}

/// Resolves an email/password pair to a user id. Unknown email and wrong
/// password fail identically; only the log line tells them apart.
pub async fn verify_credentials(
    users: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<Uuid, AppError> {
    let email = normalize_email(email);

    let Some(user) = users.find_user_by_email(&email).await? else {
        verify_against_decoy(password);
        return Err(reject(CredentialFailure::UnknownEmail));
    };

    if !verify_password(password, &user.password_hash)? {
        return Err(reject(CredentialFailure::PasswordMismatch));
    }

    Ok(user.id)
}

fn reject(cause: CredentialFailure) -> AppError {
    warn!(?cause, "login rejected");
    AppError::InvalidCredentials(cause)
}
