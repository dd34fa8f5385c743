// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Aarvee CRM

use std::{env, net::SocketAddr, time::Duration};

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

use crm_custom_service::api::router;
use crm_custom_service::config::{
    AUTH_JWKS_URL_ENV, AUTH_KEYS_TTL_ENV, DEFAULT_KEYS_TTL_SECS, HOST_ENV, LOG_FORMAT_ENV,
    PORT_ENV,
};
use crm_custom_service::state::{AppState, AuthRuntime};
use crm_custom_service::store::InMemoryStore;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let json = env::var(LOG_FORMAT_ENV)
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Build the authentication runtime from the environment, or `None` when no
/// identity provider is configured.
fn auth_from_env() -> Option<AuthRuntime> {
    let raw_url = match env::var(AUTH_JWKS_URL_ENV) {
        Ok(url) => url,
        Err(_) => {
            warn!(
                "{AUTH_JWKS_URL_ENV} is not set; token verification is disabled and \
                 all lead routes will reject"
            );
            return None;
        }
    };

    let jwks_url = match Url::parse(&raw_url) {
        Ok(url) => url,
        Err(error) => {
            warn!(%error, url = raw_url, "invalid JWKS URL; token verification is disabled");
            return None;
        }
    };

    let keys_ttl = env::var(AUTH_KEYS_TTL_ENV)
        .ok()
        .and_then(|ttl| ttl.parse().ok())
        .unwrap_or(DEFAULT_KEYS_TTL_SECS);

    info!(url = %jwks_url, ttl_secs = keys_ttl, "token verification enabled");
    Some(AuthRuntime::new(
        jwks_url.to_string(),
        Duration::from_secs(keys_ttl),
    ))
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to install shutdown signal handler");
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() {
    init_tracing();

    let mut state = AppState::new(InMemoryStore::new());
    if let Some(auth) = auth_from_env() {
        state = state.with_auth(auth);
    }

    let app = router(state);

    let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var(PORT_ENV)
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");

    info!("CRM custom service listening on http://{addr} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}
