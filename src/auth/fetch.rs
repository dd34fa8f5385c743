// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Aarvee CRM

//! JWKS retrieval with single-flight refresh.
//!
//! [`JwksFetcher::refresh`] issues one HTTP GET against the provider's
//! key-set location, parses every usable entry, and returns a fresh
//! [`KeySnapshot`]. The caller commits the snapshot via
//! [`KeyCache::replace`](super::cache::KeyCache::replace); the fetcher
//! itself holds no cache state.
//!
//! ## Single-flight
//!
//! When many requests detect a stale cache at once, only the first starts a
//! network fetch. The in-progress fetch is kept as a shared future; every
//! concurrent caller attaches to it and observes the same outcome, success
//! or failure. This is what keeps a cache expiry under load from turning
//! into a request stampede against the identity provider.
//!
//! There is no retry or backoff here. A failed refresh is reported to the
//! callers of that one flight and the next stale detection simply starts a
//! new one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::cache::KeySnapshot;
use super::error::FetchError;
use super::keys::{parse_published_key, PublishedKey};

/// Bound on one key-set fetch, covering connect and body read. Expiry
/// surfaces as [`FetchError::Network`] rather than blocking the request
/// that triggered the refresh.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Wire shape of the key-set document. Anything without a `keys` array is
/// rejected whole.
#[derive(Deserialize)]
struct KeySetDocument {
    keys: Vec<serde_json::Value>,
}

type RefreshFuture = Shared<BoxFuture<'static, Result<Arc<KeySnapshot>, FetchError>>>;

/// Fetches and parses the provider's published key set.
///
/// Cheap to clone; clones share the single-flight slot.
#[derive(Clone)]
pub struct JwksFetcher {
    inner: Arc<Inner>,
}

struct Inner {
    jwks_url: String,
    client: reqwest::Client,
    /// In-progress flight, if any, keyed by a flight id so a finished
    /// caller only clears its own flight and never an unrelated later one.
    inflight: Mutex<Option<(u64, RefreshFuture)>>,
    next_flight_id: AtomicU64,
}

impl JwksFetcher {
    /// Create a fetcher for the given key-set URL with the default timeout.
    pub fn new(jwks_url: impl Into<String>) -> Self {
        Self::with_timeout(jwks_url, DEFAULT_FETCH_TIMEOUT)
    }

    /// Create a fetcher with an explicit fetch timeout.
    pub fn with_timeout(jwks_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                jwks_url: jwks_url.into(),
                client: reqwest::Client::builder()
                    .timeout(timeout)
                    .build()
                    .expect("failed to build HTTP client"),
                inflight: Mutex::new(None),
                next_flight_id: AtomicU64::new(0),
            }),
        }
    }

    /// The key-set URL this fetcher reads from.
    pub fn jwks_url(&self) -> &str {
        &self.inner.jwks_url
    }

    /// Fetch the key set, collapsing concurrent calls into one request.
    ///
    /// Every caller of the same flight receives the same result. The
    /// returned snapshot is not installed anywhere; commit it with
    /// `KeyCache::replace`.
    pub async fn refresh(&self) -> Result<Arc<KeySnapshot>, FetchError> {
        let (flight_id, fut) = {
            let mut slot = self.inner.inflight.lock().await;
            match slot.as_ref() {
                Some((id, fut)) => (*id, fut.clone()),
                None => {
                    let id = self.inner.next_flight_id.fetch_add(1, Ordering::Relaxed);
                    let inner = Arc::clone(&self.inner);
                    let fut: RefreshFuture =
                        async move { inner.fetch_once().await }.boxed().shared();
                    *slot = Some((id, fut.clone()));
                    (id, fut)
                }
            }
        };

        let result = fut.await;

        let mut slot = self.inner.inflight.lock().await;
        if matches!(slot.as_ref(), Some((id, _)) if *id == flight_id) {
            *slot = None;
        }

        result
    }
}

impl Inner {
    async fn fetch_once(&self) -> Result<Arc<KeySnapshot>, FetchError> {
        debug!(url = %self.jwks_url, "fetching JWKS");

        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let document: KeySetDocument = response
            .json()
            .await
            .map_err(|err| FetchError::InvalidDocument(err.to_string()))?;

        let mut keys = HashMap::new();
        for entry in document.keys {
            let jwk: PublishedKey = match serde_json::from_value(entry) {
                Ok(jwk) => jwk,
                Err(err) => {
                    warn!(error = %err, "skipping undecodable key entry");
                    continue;
                }
            };
            match parse_published_key(&jwk) {
                Ok(key) => {
                    keys.insert(key.kid.clone(), Arc::new(key));
                }
                // One bad or unknown entry must not take down the whole set.
                Err(err) => {
                    warn!(
                        kid = jwk.kid.as_deref().unwrap_or("<none>"),
                        kty = %jwk.kty,
                        error = %err,
                        "skipping unusable published key"
                    );
                }
            }
        }

        info!(url = %self.jwks_url, key_count = keys.len(), "key set refreshed");
        Ok(Arc::new(KeySnapshot::new(keys)))
    }
}
