use crate::state::AppState;
use axum::Router;

mod claims;
mod dto;
pub mod handlers;
pub mod jwt;
pub mod middleware;
mod password;
pub mod services;

pub use middleware::{require_auth, AuthUser};

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
