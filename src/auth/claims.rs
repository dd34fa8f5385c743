// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Aarvee CRM

//! Token claims and the authenticated identity they yield.

use serde::Deserialize;

/// Payload fields relevant to verification.
///
/// Deserialized only after (or for) signature verification; nothing here is
/// trusted until the signature check passes. Additional provider claims are
/// ignored.
#[derive(Debug, Deserialize)]
pub struct Claims {
    /// Subject identifier, the canonical user id.
    pub sub: String,
    /// Expiration, Unix seconds.
    pub exp: i64,
    /// Not-before, Unix seconds. Optional.
    #[serde(default)]
    pub nbf: Option<i64>,
    /// Issued-at, Unix seconds. Carried for logging, not validated.
    #[serde(default)]
    pub iat: Option<i64>,
}

/// The output of successful verification: who the caller is, nothing more.
///
/// Created per request and attached to the request's extensions; discarded
/// at request end, never persisted. Carries no permissions -- authorization
/// is a downstream concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    /// Verified subject claim.
    pub subject: String,
}

impl AuthenticatedIdentity {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_tolerate_extra_provider_fields() {
        let claims: Claims = serde_json::from_value(serde_json::json!({
            "sub": "user_42",
            "exp": 1700003600,
            "iss": "https://idp.example.com",
            "session_id": "sess_abc"
        }))
        .expect("unknown fields are ignored");
        assert_eq!(claims.sub, "user_42");
        assert_eq!(claims.nbf, None);
    }

    #[test]
    fn claims_require_subject_and_expiry() {
        let missing_sub =
            serde_json::from_value::<Claims>(serde_json::json!({ "exp": 1700003600 }));
        assert!(missing_sub.is_err());

        let missing_exp = serde_json::from_value::<Claims>(serde_json::json!({ "sub": "u" }));
        assert!(missing_exp.is_err());
    }
}
