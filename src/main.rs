// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use gestion_auth_server::{
    api::router,
    auth::{password::BcryptHasher, TokenService},
    clock::{Clock, SystemClock},
    config::{AuthSettings, LogFormat, ServerSettings, DEFAULT_LOG_FILTER},
    state::AppState,
    store::{seed_default_admin, InMemoryStore},
};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let server = ServerSettings::from_env()?;
    init_tracing(server.log_format);

    // A missing or blank secret stops the process here.
    let auth = AuthSettings::from_env()?;
    let tokens = TokenService::from_settings(&auth)?;
    tracing::info!(ttl_seconds = auth.ttl_seconds, "Token service configured");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = Arc::new(InMemoryStore::new());
    let passwords = Arc::new(BcryptHasher::new());

    if server.seed_admin {
        seed_default_admin(store.as_ref(), passwords.as_ref(), clock.now()).await?;
    }

    let state = AppState::new(tokens, clock, store, passwords);
    let app = router(state, &server.cors_allowed_origins);

    tracing::info!(origins = ?server.cors_allowed_origins, "CORS origins configured");

    let addr = server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Gestion auth server listening on http://{addr} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
