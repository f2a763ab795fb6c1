use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::store::StoreError;

/// The closed set of failure kinds visible over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Forbidden,
    NotFound,
    DuplicateEmail,
    Internal,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::DuplicateEmail => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Which credential check failed during login. Only ever logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialFailure {
    UnknownEmail,
    PasswordMismatch,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Authorization required")]
    Unauthenticated,
    #[error("Incorrect email or password")]
    InvalidCredentials(CredentialFailure),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("A user with this email already exists")]
    DuplicateEmail,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Unauthenticated | AppError::InvalidCredentials(_) => {
                ErrorKind::Authentication
            }
            AppError::Forbidden(_) => ErrorKind::Forbidden,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::DuplicateEmail => ErrorKind::DuplicateEmail,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Unknown paths and unsupported methods on known paths both surface as a
/// missing resource.
pub async fn not_found_fallback() -> AppError {
    AppError::not_found("Requested resource not found")
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UniqueViolation => AppError::DuplicateEmail,
            StoreError::Invalid(_) => AppError::validation("Invalid data"),
            StoreError::Backend(e) => AppError::Internal(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let message = match &self {
            AppError::Internal(e) => {
                error!(error = ?e, "unhandled error");
                "An error occurred on the server".to_string()
            }
            other => other.to_string(),
        };

        (kind.status(), Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn kinds_map_to_fixed_statuses() {
        assert_eq!(ErrorKind::Validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::Authentication.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorKind::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorKind::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorKind::DuplicateEmail.status(), StatusCode::CONFLICT);
        assert_eq!(ErrorKind::Internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn credential_failures_render_identically() {
        let unknown = render(AppError::InvalidCredentials(CredentialFailure::UnknownEmail)).await;
        let mismatch =
            render(AppError::InvalidCredentials(CredentialFailure::PasswordMismatch)).await;
        assert_eq!(unknown, mismatch);
        assert_eq!(unknown.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn internal_error_hides_cause() {
        let (status, body) =
            render(AppError::Internal(anyhow::anyhow!("connection refused (os error 111)"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "An error occurred on the server");
    }

    #[tokio::test]
    async fn message_body_carries_error_text() {
        let (status, body) = render(AppError::not_found("Card not found")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "Card not found" }));
    }

    #[test]
    fn store_errors_are_translated() {
        assert_eq!(AppError::from(StoreError::UniqueViolation).kind(), ErrorKind::DuplicateEmail);
        assert_eq!(
            AppError::from(StoreError::Invalid("likes".into())).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            AppError::from(StoreError::Backend(anyhow::anyhow!("pool timed out"))).kind(),
            ErrorKind::Internal
        );
    }
}
