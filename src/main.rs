// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use forum_server::{
    api::router,
    auth::BcryptVerifier,
    config::{
        bcrypt_cost_from_env, AuthSettings, DEFAULT_HOST, DEFAULT_LOG_FILTER, DEFAULT_PORT,
        HOST_ENV, LOG_FORMAT_ENV, PORT_ENV,
    },
    state::AppState,
    store::InMemoryStore,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let settings = AuthSettings::from_env()?;
    let verifier = BcryptVerifier::with_cost(bcrypt_cost_from_env()?);
    tracing::info!(
        access_ttl_secs = settings.access_ttl_secs,
        refresh_ttl_secs = settings.refresh_ttl_secs,
        bcrypt_cost = verifier.cost(),
        "Loaded authentication settings"
    );

    let state = AppState::new(InMemoryStore::new(), settings).with_verifier(verifier);
    let app = router(state);

    let host = env::var(HOST_ENV).unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port: u16 = env::var(PORT_ENV)
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Forum server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// `LOG_FORMAT=json` switches to structured output; `RUST_LOG` sets the filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match env::var(LOG_FORMAT_ENV).as_deref() {
        Ok("json") => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
