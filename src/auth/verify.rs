// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Aarvee CRM

//! Bearer token verification.
//!
//! The verifier resolves the token's `kid` against the key cache (refreshing
//! through the fetcher on a miss or a stale snapshot), pins the signature
//! algorithm to the resolved key's family, verifies the signature, and only
//! then checks the time-bound claims. The `kid` taken from the unverified
//! header is advisory: it selects a candidate key and nothing else.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, decode_header, Validation};
use tracing::warn;

use super::cache::KeyCache;
use super::claims::{AuthenticatedIdentity, Claims};
use super::error::VerifyError;
use super::fetch::JwksFetcher;
use super::keys::VerificationKey;

/// Tolerated clock skew between this service and the identity provider,
/// applied to `exp` and `nbf`, in seconds.
pub const DEFAULT_CLOCK_SKEW_LEEWAY: i64 = 60;

/// Verifies compact bearer tokens against the cached published keys.
pub struct TokenVerifier {
    cache: Arc<KeyCache>,
    fetcher: JwksFetcher,
    leeway: i64,
}

impl TokenVerifier {
    pub fn new(cache: Arc<KeyCache>, fetcher: JwksFetcher) -> Self {
        Self {
            cache,
            fetcher,
            leeway: DEFAULT_CLOCK_SKEW_LEEWAY,
        }
    }

    /// Override the clock-skew leeway. Zero means exact comparison.
    pub fn with_leeway(mut self, leeway_secs: i64) -> Self {
        self.leeway = leeway_secs;
        self
    }

    /// The key cache this verifier resolves against.
    pub fn cache(&self) -> &KeyCache {
        &self.cache
    }

    /// Fetch the key set now and commit it, regardless of staleness.
    /// Used by readiness checks to warm the cache.
    pub async fn refresh_keys(&self) -> Result<(), super::error::FetchError> {
        let snapshot = self.fetcher.refresh().await?;
        self.cache.replace(snapshot);
        Ok(())
    }

    /// Verify a token against the current wall clock.
    pub async fn verify(&self, token: &str) -> Result<AuthenticatedIdentity, VerifyError> {
        self.verify_at(token, Utc::now().timestamp()).await
    }

    /// Verify a token as of `now` (Unix seconds).
    pub async fn verify_at(
        &self,
        token: &str,
        now: i64,
    ) -> Result<AuthenticatedIdentity, VerifyError> {
        let header = decode_header(token).map_err(|_| VerifyError::MalformedToken)?;
        let kid = header.kid.as_deref().ok_or(VerifyError::MissingKeyId)?;

        let key = self.resolve_key(kid).await?;

        // The declared algorithm is attacker-controlled. Binding the allowed
        // set to the resolved key's family closes the algorithm-confusion
        // hole before any crypto runs.
        if !key.family.permits(header.alg) {
            warn!(
                kid,
                declared_alg = ?header.alg,
                key_family = %key.family,
                "token algorithm does not match key family"
            );
            return Err(VerifyError::SignatureInvalid);
        }

        let mut validation = Validation::new(header.alg);
        // Time-bound claims are checked below against the supplied `now`;
        // the library would only consult the wall clock.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims = Default::default();

        let data = decode::<Claims>(token, &key.key, &validation).map_err(|err| {
            match err.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => VerifyError::SignatureInvalid,
                _ => VerifyError::MalformedToken,
            }
        })?;
        let claims = data.claims;

        // Claims are trusted from here on: the signature checked out.
        if claims.exp < now - self.leeway {
            return Err(VerifyError::TokenExpired);
        }
        if let Some(nbf) = claims.nbf {
            if nbf > now + self.leeway {
                return Err(VerifyError::TokenNotYetValid);
            }
        }

        Ok(AuthenticatedIdentity::new(claims.sub))
    }

    /// Resolve `kid`, refreshing on a miss or a stale snapshot and retrying
    /// the lookup once.
    ///
    /// A failed refresh keeps the last good snapshot: if the stale snapshot
    /// still binds this `kid`, that key is used rather than failing the
    /// request (fail-open for availability). With no binding at all, the
    /// fetch error surfaces.
    async fn resolve_key(&self, kid: &str) -> Result<Arc<VerificationKey>, VerifyError> {
        let cached = self.cache.lookup(kid);
        if let Some(key) = &cached {
            if !self.cache.is_stale() {
                return Ok(Arc::clone(key));
            }
        }

        match self.fetcher.refresh().await {
            Ok(snapshot) => {
                self.cache.replace(snapshot);
                self.cache.lookup(kid).ok_or(VerifyError::UnknownKey)
            }
            Err(err) => match cached {
                Some(key) => {
                    warn!(kid, error = %err, "key refresh failed; using stale key");
                    Ok(key)
                }
                None => Err(VerifyError::Jwks(err)),
            },
        }
    }
}
