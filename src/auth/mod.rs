// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Aarvee CRM

//! # Inbound Authentication
//!
//! Verifies bearer tokens issued by the external identity provider against
//! the public keys it publishes at a JWKS endpoint.
//!
//! ## Flow
//!
//! 1. The middleware pulls `Authorization: Bearer <token>` off the request
//! 2. The verifier reads the unverified header for a `kid` and resolves it
//!    against the key cache; a miss or a stale snapshot triggers a
//!    single-flight refresh through the fetcher
//! 3. The signature is verified with the algorithm pinned to the resolved
//!    key's family, then `exp`/`nbf` are checked
//! 4. Success attaches an [`AuthenticatedIdentity`] to the request;
//!    every failure collapses to an anonymous request
//!
//! ## Security
//!
//! - Nothing from the token is trusted before the signature verifies; the
//!   `kid` only selects a candidate key
//! - The declared algorithm must match the resolved key's family
//!   (algorithm-confusion guard)
//! - Key snapshots are immutable and replaced whole; a fetch failure keeps
//!   the last good snapshot

pub mod cache;
pub mod claims;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod keys;
pub mod middleware;
pub mod verify;

#[cfg(test)]
pub mod testutil;

pub use cache::{KeyCache, KeySnapshot, DEFAULT_KEYS_TTL};
pub use claims::AuthenticatedIdentity;
pub use error::{FetchError, KeyError, VerifyError};
pub use extractor::{Identity, MaybeIdentity};
pub use fetch::JwksFetcher;
pub use keys::{parse_published_key, KeyFamily, PublishedKey, VerificationKey};
pub use middleware::attach_identity;
pub use verify::TokenVerifier;
