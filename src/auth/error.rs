// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Aarvee CRM

//! Error taxonomy for the authentication layer.
//!
//! Three tiers, matching how failures propagate:
//!
//! - [`KeyError`]: one published key could not be used. Per-entry and
//!   non-fatal; the fetcher logs and skips the entry.
//! - [`FetchError`]: the whole key-set document could not be retrieved or
//!   parsed. Fatal to that refresh attempt only; the cached snapshot is
//!   left in place.
//! - [`VerifyError`]: one token failed verification. Fatal to that request's
//!   identity only; the middleware logs it and the request proceeds
//!   anonymous.

use thiserror::Error;

/// Failure to turn a single published key into a usable verification key.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Required key material is absent or not valid base64url.
    #[error("malformed key material: {0}")]
    MalformedKeyMaterial(String),

    /// The `kty` field names a key family this service does not verify.
    #[error("unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// An EC key on a curve outside P-256/P-384/P-521.
    #[error("unsupported curve: {0}")]
    UnsupportedCurve(String),
}

/// Failure to retrieve or parse the key-set document.
///
/// `Clone` because the single-flight refresh hands one outcome to every
/// concurrent caller.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Transport-level failure, including request timeout.
    #[error("JWKS request failed: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status.
    #[error("JWKS endpoint returned HTTP {0}")]
    Status(u16),

    /// The body was not a JWKS document with a `keys` array.
    #[error("invalid JWKS document: {0}")]
    InvalidDocument(String),
}

/// Failure to verify a single bearer token.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Not three base64url segments, or header/claims that do not decode.
    #[error("token is malformed")]
    MalformedToken,

    /// The token header carries no `kid`.
    #[error("token header has no key id")]
    MissingKeyId,

    /// The `kid` resolves to no key, even after a refresh.
    #[error("no published key matches the token's key id")]
    UnknownKey,

    /// Signature check failed, or the declared algorithm does not match the
    /// resolved key's family.
    #[error("token signature is invalid")]
    SignatureInvalid,

    /// `exp` is in the past.
    #[error("token has expired")]
    TokenExpired,

    /// `nbf` is in the future.
    #[error("token is not yet valid")]
    TokenNotYetValid,

    /// The key was unknown locally and the refresh that could have found it
    /// failed.
    #[error("key set unavailable: {0}")]
    Jwks(#[from] FetchError),
}

impl VerifyError {
    /// Stable identifier for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            VerifyError::MalformedToken => "malformed_token",
            VerifyError::MissingKeyId => "missing_key_id",
            VerifyError::UnknownKey => "unknown_key",
            VerifyError::SignatureInvalid => "signature_invalid",
            VerifyError::TokenExpired => "token_expired",
            VerifyError::TokenNotYetValid => "token_not_yet_valid",
            VerifyError::Jwks(_) => "jwks_unavailable",
        }
    }
}
