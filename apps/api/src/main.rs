mod auth;
mod config;
mod contact;
mod content;
mod db;
mod errors;
mod mail;
mod routes;
mod site;
mod state;
mod storage;
mod store;

#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::identity::GoTrueClient;
use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::S3ResumeBucket;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Portfolio API v{}", env!("CARGO_PKG_VERSION"));

    // Hosted Postgres behind the content tables
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgStore::new(db));

    let identity = Arc::new(GoTrueClient::new(
        &config.supabase_url,
        config.supabase_anon_key.clone(),
    )?);
    info!("Identity client initialized");

    let mailer = mail::from_config(&config)?;
    if mailer.is_none() {
        warn!("No mail transport configured, contact form will fail");
    }

    let bucket = Arc::new(S3ResumeBucket::from_config(&config).await);
    info!("Storage client initialized (bucket: {})", config.resume_bucket);

    let state = AppState {
        store,
        identity,
        mailer,
        bucket,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
