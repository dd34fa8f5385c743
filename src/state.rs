// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Aarvee CRM

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::auth::{JwksFetcher, KeyCache, TokenVerifier};
use crate::store::InMemoryStore;

/// The wired-up authentication layer: one key cache, one fetcher, one
/// verifier, shared by every request.
#[derive(Clone)]
pub struct AuthRuntime {
    pub verifier: Arc<TokenVerifier>,
}

impl AuthRuntime {
    /// Build the runtime for a JWKS endpoint with the given key TTL.
    pub fn new(jwks_url: impl Into<String>, keys_ttl: Duration) -> Self {
        let cache = Arc::new(KeyCache::new(keys_ttl));
        let fetcher = JwksFetcher::new(jwks_url);
        Self {
            verifier: Arc::new(TokenVerifier::new(cache, fetcher)),
        }
    }
}

#[derive(Clone, Default)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    /// `None` when no identity provider is configured; every request is
    /// then anonymous.
    pub auth: Option<AuthRuntime>,
}

impl AppState {
    pub fn new(store: InMemoryStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            auth: None,
        }
    }

    pub fn with_auth(mut self, auth: AuthRuntime) -> Self {
        self.auth = Some(auth);
        self
    }
}
