// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Aarvee CRM

//! Identity-attaching middleware.
//!
//! Runs once per request. A valid bearer token attaches an
//! [`AuthenticatedIdentity`](super::claims::AuthenticatedIdentity) to the
//! request's extensions; anything else -- no header, a malformed header, or
//! any verification failure -- leaves the request anonymous and lets it
//! proceed.
//!
//! This middleware never rejects. "Absent identity" is the single failure
//! signal downstream handlers rely on; routes that require a caller enforce
//! that themselves through the [`Identity`](super::extractor::Identity)
//! extractor.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::state::AppState;

/// Extract the bearer token, verify it, and attach the identity on success.
pub async fn attach_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(auth) = state.auth.clone() else {
        // No identity provider configured: every request is anonymous.
        return next.run(request).await;
    };

    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    if let Some(token) = token {
        match auth.verifier.verify(token).await {
            Ok(identity) => {
                request.extensions_mut().insert(identity);
            }
            Err(err) => {
                // Verification failures collapse to anonymous, never to a
                // rejection response.
                warn!(
                    kind = err.kind(),
                    error = %err,
                    "bearer token rejected; request continues anonymous"
                );
            }
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::AuthenticatedIdentity;
    use crate::auth::testutil::{claims_json, jwks_doc, rsa_jwk, sign_rs256, JwksServer};
    use crate::state::{AppState, AuthRuntime};
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Extension, Router};
    use chrono::Utc;
    use std::time::Duration;
    use tower::ServiceExt;

    /// Echoes the attached subject, or "anonymous".
    async fn whoami(identity: Option<Extension<AuthenticatedIdentity>>) -> String {
        match identity {
            Some(Extension(identity)) => identity.subject,
            None => "anonymous".to_string(),
        }
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(state.clone(), attach_identity))
            .with_state(state)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get_request(token: Option<&str>) -> axum::http::Request<Body> {
        let builder = axum::http::Request::builder().uri("/whoami");
        let builder = match token {
            Some(token) => builder.header("Authorization", format!("Bearer {token}")),
            None => builder,
        };
        builder.body(Body::empty()).unwrap()
    }

    async fn authed_state(server: &JwksServer) -> AppState {
        AppState::default().with_auth(AuthRuntime::new(
            server.url(),
            Duration::from_secs(3600),
        ))
    }

    #[tokio::test]
    async fn no_header_proceeds_anonymous() {
        let server = JwksServer::serve(jwks_doc(&[rsa_jwk("rsa-1")])).await;
        let app = app(authed_state(&server).await);

        let response = app.oneshot(get_request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "anonymous");
    }

    #[tokio::test]
    async fn valid_token_attaches_identity() {
        let server = JwksServer::serve(jwks_doc(&[rsa_jwk("rsa-1")])).await;
        let app = app(authed_state(&server).await);

        let token = sign_rs256(
            Some("rsa-1"),
            &claims_json("user_42", Utc::now().timestamp() + 600),
        );
        let response = app.oneshot(get_request(Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "user_42");
    }

    #[tokio::test]
    async fn invalid_token_still_reaches_the_handler_anonymous() {
        let server = JwksServer::serve(jwks_doc(&[rsa_jwk("rsa-1")])).await;
        let app = app(authed_state(&server).await);

        let response = app
            .oneshot(get_request(Some("not.a.token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "middleware never rejects");
        assert_eq!(body_string(response).await, "anonymous");
    }

    #[tokio::test]
    async fn expired_token_collapses_to_anonymous() {
        let server = JwksServer::serve(jwks_doc(&[rsa_jwk("rsa-1")])).await;
        let app = app(authed_state(&server).await);

        let token = sign_rs256(
            Some("rsa-1"),
            &claims_json("user_42", Utc::now().timestamp() - 3600),
        );
        let response = app.oneshot(get_request(Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "anonymous");
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_ignored() {
        let server = JwksServer::serve(jwks_doc(&[rsa_jwk("rsa-1")])).await;
        let app = app(authed_state(&server).await);

        let request = axum::http::Request::builder()
            .uri("/whoami")
            .header("Authorization", "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "anonymous");
    }

    #[tokio::test]
    async fn unconfigured_auth_means_every_request_is_anonymous() {
        let app = app(AppState::default());

        let response = app
            .oneshot(get_request(Some("any.token.here")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "anonymous");
    }
}
