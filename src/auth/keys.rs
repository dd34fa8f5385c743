// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Aarvee CRM

//! Published key parsing.
//!
//! One [`PublishedKey`] is one entry of the provider's JWKS document.
//! [`parse_published_key`] turns it into a [`VerificationKey`]: a ready
//! `jsonwebtoken::DecodingKey` tagged with its [`KeyFamily`], so the
//! verifier can pin the signature algorithm to the key family and never
//! trust the algorithm a token declares on its own.

use jsonwebtoken::{Algorithm, DecodingKey};
use serde::Deserialize;

use super::error::KeyError;

/// One entry from the provider's key-set document, as published.
///
/// Family-specific material is optional at the serde level; the parser
/// enforces presence per family. Unknown fields (`use`, `alg`, `x5c`, ...)
/// are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishedKey {
    /// Opaque key identifier.
    #[serde(default)]
    pub kid: Option<String>,
    /// Key family: `RSA` or `EC`.
    pub kty: String,
    /// RSA modulus, base64url.
    #[serde(default)]
    pub n: Option<String>,
    /// RSA public exponent, base64url.
    #[serde(default)]
    pub e: Option<String>,
    /// EC curve name.
    #[serde(default)]
    pub crv: Option<String>,
    /// EC x coordinate, base64url.
    #[serde(default)]
    pub x: Option<String>,
    /// EC y coordinate, base64url.
    #[serde(default)]
    pub y: Option<String>,
}

/// Named curves this service verifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcCurve {
    P256,
    P384,
    P521,
}

impl EcCurve {
    fn from_crv(crv: &str) -> Result<Self, KeyError> {
        match crv {
            "P-256" => Ok(EcCurve::P256),
            "P-384" => Ok(EcCurve::P384),
            "P-521" => Ok(EcCurve::P521),
            other => Err(KeyError::UnsupportedCurve(other.to_string())),
        }
    }
}

/// Key family tag carried by every parsed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFamily {
    Rsa,
    Ec(EcCurve),
}

impl KeyFamily {
    /// Token algorithms a key of this family may verify.
    ///
    /// ECDSA algorithms are curve-specific, so each curve admits exactly
    /// one; RSASSA admits the three RSA-PKCS1 digests.
    pub fn allowed_algorithms(&self) -> &'static [Algorithm] {
        match self {
            KeyFamily::Rsa => &[Algorithm::RS256, Algorithm::RS384, Algorithm::RS512],
            KeyFamily::Ec(EcCurve::P256) => &[Algorithm::ES256],
            KeyFamily::Ec(EcCurve::P384) => &[Algorithm::ES384],
            KeyFamily::Ec(EcCurve::P521) => &[Algorithm::ES512],
        }
    }

    /// Whether `alg` is acceptable for a key of this family.
    pub fn permits(&self, alg: Algorithm) -> bool {
        self.allowed_algorithms().contains(&alg)
    }
}

impl std::fmt::Display for KeyFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyFamily::Rsa => write!(f, "RSA"),
            KeyFamily::Ec(EcCurve::P256) => write!(f, "EC/P-256"),
            KeyFamily::Ec(EcCurve::P384) => write!(f, "EC/P-384"),
            KeyFamily::Ec(EcCurve::P521) => write!(f, "EC/P-521"),
        }
    }
}

/// A parsed, ready-to-use public key. Immutable after construction.
pub struct VerificationKey {
    /// The `kid` this key was published under.
    pub kid: String,
    /// Family tag used to pin the signature algorithm.
    pub family: KeyFamily,
    /// The decoded public key.
    pub key: DecodingKey,
}

impl std::fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // DecodingKey has no Debug; the material is deliberately opaque.
        f.debug_struct("VerificationKey")
            .field("kid", &self.kid)
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

/// Parse one published key into a verification key.
pub fn parse_published_key(jwk: &PublishedKey) -> Result<VerificationKey, KeyError> {
    let kid = jwk
        .kid
        .as_deref()
        .ok_or_else(|| KeyError::MalformedKeyMaterial("entry has no kid".to_string()))?;

    match jwk.kty.as_str() {
        "RSA" => {
            let n = require(&jwk.n, "n")?;
            let e = require(&jwk.e, "e")?;
            let key = DecodingKey::from_rsa_components(n, e)
                .map_err(|err| KeyError::MalformedKeyMaterial(err.to_string()))?;
            Ok(VerificationKey {
                kid: kid.to_string(),
                family: KeyFamily::Rsa,
                key,
            })
        }
        "EC" => {
            let crv = require(&jwk.crv, "crv")?;
            let curve = EcCurve::from_crv(crv)?;
            let x = require(&jwk.x, "x")?;
            let y = require(&jwk.y, "y")?;
            let key = DecodingKey::from_ec_components(x, y)
                .map_err(|err| KeyError::MalformedKeyMaterial(err.to_string()))?;
            Ok(VerificationKey {
                kid: kid.to_string(),
                family: KeyFamily::Ec(curve),
                key,
            })
        }
        other => Err(KeyError::UnsupportedKeyType(other.to_string())),
    }
}

fn require<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str, KeyError> {
    field
        .as_deref()
        .ok_or_else(|| KeyError::MalformedKeyMaterial(format!("{name} is missing")))
}
