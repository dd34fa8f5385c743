// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Aarvee CRM

//! Extractors for handlers that consume the attached identity.
//!
//! The middleware attaches at most one [`AuthenticatedIdentity`] per
//! request and never rejects; enforcement lives here. Handlers that require
//! a caller take [`Identity`] and get a 401 for anonymous requests;
//! handlers that merely adapt to one take [`MaybeIdentity`].

use axum::{extract::FromRequestParts, http::request::Parts};

use super::claims::AuthenticatedIdentity;
use crate::error::ApiError;

/// Requires an authenticated caller. Rejects anonymous requests with 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn create_lead(
///     Identity(caller): Identity,
///     State(state): State<AppState>,
///     Json(request): Json<CreateLeadRequest>,
/// ) -> Result<(StatusCode, Json<Lead>), ApiError> {
///     // caller.subject is the verified user id
/// }
/// ```
#[derive(Debug)]
pub struct Identity(pub AuthenticatedIdentity);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .map(Identity)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

/// Yields the identity when present, `None` for anonymous requests.
pub struct MaybeIdentity(pub Option<AuthenticatedIdentity>);

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeIdentity(
            parts.extensions.get::<AuthenticatedIdentity>().cloned(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    fn parts_with(identity: Option<AuthenticatedIdentity>) -> Parts {
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        if let Some(identity) = identity {
            parts.extensions.insert(identity);
        }
        parts
    }

    #[tokio::test]
    async fn identity_rejects_anonymous_with_401() {
        let mut parts = parts_with(None);
        let err = Identity::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn identity_yields_the_attached_subject() {
        let mut parts = parts_with(Some(AuthenticatedIdentity::new("user_42")));
        let Identity(identity) = Identity::from_request_parts(&mut parts, &())
            .await
            .expect("identity is attached");
        assert_eq!(identity.subject, "user_42");
    }

    #[tokio::test]
    async fn maybe_identity_never_rejects() {
        let mut parts = parts_with(None);
        let MaybeIdentity(identity) = MaybeIdentity::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(identity.is_none());

        let mut parts = parts_with(Some(AuthenticatedIdentity::new("user_42")));
        let MaybeIdentity(identity) = MaybeIdentity::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(identity.unwrap().subject, "user_42");
    }
}
