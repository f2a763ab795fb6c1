use std::sync::Arc;

mod app;
mod auth;
mod cards;
mod config;
mod cors;
mod error;
mod extract;
mod state;
mod store;
mod users;
mod validation;

use crate::{config::AppConfig, state::AppState, store::postgres::PgStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "mesto=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = Arc::new(AppConfig::from_env()?);
    tracing::info!(environment = ?config.environment, "configuration loaded");

    let store = Arc::new(PgStore::connect(&config.database_url).await?);
    if let Err(e) = store.migrate().await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    let state = AppState::from_parts(config, store.clone(), store);
    app::serve(app::build_app(state)).await
}
