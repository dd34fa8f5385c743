// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Aarvee CRM

use axum::{
    middleware,
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::attach_identity,
    models::{CreateLeadRequest, DeleteResponse, Lead, LeadPage, UpdateLeadRequest},
    sort::SortOrder,
    state::AppState,
};

pub mod health;
pub mod leads;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/leads", get(leads::list_leads).post(leads::create_lead))
        .route(
            "/leads/{lead_id}",
            get(leads::get_lead)
                .put(leads::update_lead)
                .delete(leads::delete_lead),
        )
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state.clone());

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(state, attach_identity))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        leads::list_leads,
        leads::create_lead,
        leads::get_lead,
        leads::update_lead,
        leads::delete_lead,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Lead,
            LeadPage,
            CreateLeadRequest,
            UpdateLeadRequest,
            DeleteResponse,
            SortOrder,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Leads", description = "Lead record management"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
