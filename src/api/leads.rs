// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Aarvee CRM

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    auth::Identity,
    error::ApiError,
    models::{CreateLeadRequest, DeleteResponse, Lead, LeadPage, UpdateLeadRequest},
    sort::{SortField, SortOrder},
    state::AppState,
};

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    10
}

/// Pagination and sorting parameters for the lead list. The admin UI's
/// data provider sends camelCase names (`perPage`, `sortField`,
/// `sortOrder`); both spellings are accepted.
#[derive(Debug, Deserialize, IntoParams)]
pub struct LeadListQuery {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u64,
    /// Page size.
    #[serde(default = "default_per_page", alias = "perPage")]
    pub per_page: u64,
    /// Field to sort by. Unknown fields fall back to `created_at`.
    #[serde(default, alias = "sortField")]
    pub sort_field: Option<String>,
    /// `asc` or `desc` (default).
    #[serde(default, alias = "sortOrder")]
    pub sort_order: SortOrder,
}

#[utoipa::path(
    get,
    path = "/v1/leads",
    params(LeadListQuery),
    tag = "Leads",
    responses(
        (status = 200, body = LeadPage),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
pub async fn list_leads(
    _identity: Identity,
    State(state): State<AppState>,
    Query(params): Query<LeadListQuery>,
) -> Result<Json<LeadPage>, ApiError> {
    let sort_field = SortField::map_or_default(params.sort_field.as_deref().unwrap_or(""));
    let store = state.store.read().await;
    let (data, total) = store.list_leads(
        params.page,
        params.per_page,
        sort_field,
        params.sort_order,
    );
    Ok(Json(LeadPage { data, total }))
}

#[utoipa::path(
    post,
    path = "/v1/leads",
    request_body = CreateLeadRequest,
    tag = "Leads",
    responses(
        (status = 201, body = Lead),
        (status = 400, description = "Missing contact_id"),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
pub async fn create_lead(
    _identity: Identity,
    State(state): State<AppState>,
    Json(request): Json<CreateLeadRequest>,
) -> Result<(StatusCode, Json<Lead>), ApiError> {
    let mut store = state.store.write().await;
    let lead = store.create_lead(request)?;
    Ok((StatusCode::CREATED, Json(lead)))
}

#[utoipa::path(
    get,
    path = "/v1/leads/{lead_id}",
    params(
        ("lead_id" = String, Path, description = "Identifier of the lead")
    ),
    tag = "Leads",
    responses(
        (status = 200, body = Lead),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Lead not found")
    )
)]
pub async fn get_lead(
    _identity: Identity,
    Path(lead_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Lead>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.lead(&lead_id)?))
}

#[utoipa::path(
    put,
    path = "/v1/leads/{lead_id}",
    params(
        ("lead_id" = String, Path, description = "Identifier of the lead")
    ),
    request_body = UpdateLeadRequest,
    tag = "Leads",
    responses(
        (status = 200, body = Lead),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Lead not found")
    )
)]
pub async fn update_lead(
    _identity: Identity,
    Path(lead_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<UpdateLeadRequest>,
) -> Result<Json<Lead>, ApiError> {
    let mut store = state.store.write().await;
    Ok(Json(store.update_lead(&lead_id, request)?))
}

#[utoipa::path(
    delete,
    path = "/v1/leads/{lead_id}",
    params(
        ("lead_id" = String, Path, description = "Identifier of the lead to delete")
    ),
    tag = "Leads",
    responses(
        (status = 200, body = DeleteResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Lead not found")
    )
)]
pub async fn delete_lead(
    _identity: Identity,
    Path(lead_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let mut store = state.store.write().await;
    store.delete_lead(&lead_id)?;
    Ok(Json(DeleteResponse {
        message: "Lead deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedIdentity;

    fn identity() -> Identity {
        Identity(AuthenticatedIdentity::new("user_test"))
    }

    fn create_request(contact_id: u64, customer_name: &str) -> CreateLeadRequest {
        CreateLeadRequest {
            contact_id: Some(contact_id),
            customer_name: Some(customer_name.to_string()),
            ..CreateLeadRequest::default()
        }
    }

    async fn seed_lead(state: &AppState, request: CreateLeadRequest) -> Lead {
        state.store.write().await.create_lead(request).unwrap()
    }

    #[tokio::test]
    async fn create_lead_returns_created() {
        let state = AppState::default();
        let (status, Json(lead)) = create_lead(
            identity(),
            State(state.clone()),
            Json(create_request(42, "Asha")),
        )
        .await
        .expect("lead creation succeeds");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(lead.contact_id, 42);
        assert_eq!(lead.lead_status, "new");
        assert_eq!(state.store.read().await.lead_count(), 1);
    }

    #[tokio::test]
    async fn create_lead_without_contact_id_is_400() {
        let state = AppState::default();
        // The field is absent in the original client's broken payload.
        let request: CreateLeadRequest =
            serde_json::from_value(serde_json::json!({ "customer_name": "No Contact" }))
                .expect("payload deserializes; validation is the handler's job");

        let err = create_lead(identity(), State(state.clone()), Json(request))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "contact_id is required");
        assert_eq!(state.store.read().await.lead_count(), 0);
    }

    #[tokio::test]
    async fn get_lead_round_trips() {
        let state = AppState::default();
        let created = seed_lead(&state, create_request(1, "A")).await;

        let Json(found) = get_lead(identity(), Path(created.id.clone()), State(state))
            .await
            .expect("lead exists");
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn get_unknown_lead_is_404() {
        let err = get_lead(
            identity(),
            Path("missing".to_string()),
            State(AppState::default()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_lead_applies_partial_changes() {
        let state = AppState::default();
        let created = seed_lead(&state, create_request(1, "A")).await;

        let Json(updated) = update_lead(
            identity(),
            Path(created.id),
            State(state),
            Json(UpdateLeadRequest {
                lead_status: Some("qualified".to_string()),
                ..UpdateLeadRequest::default()
            }),
        )
        .await
        .expect("update succeeds");

        assert_eq!(updated.lead_status, "qualified");
        assert_eq!(updated.customer_name.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn delete_lead_returns_message() {
        let state = AppState::default();
        let created = seed_lead(&state, create_request(1, "A")).await;

        let Json(response) = delete_lead(identity(), Path(created.id), State(state.clone()))
            .await
            .expect("delete succeeds");
        assert_eq!(response.message, "Lead deleted successfully");
        assert_eq!(state.store.read().await.lead_count(), 0);
    }

    #[tokio::test]
    async fn list_leads_paginates_with_defaults() {
        let state = AppState::default();
        for i in 0..12 {
            seed_lead(&state, create_request(i, &format!("Lead {i:02}"))).await;
        }

        let query: LeadListQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, 10);
        assert_eq!(query.sort_order, SortOrder::Desc);

        let Json(page) = list_leads(identity(), State(state), Query(query))
            .await
            .expect("list succeeds");
        assert_eq!(page.total, 12);
        assert_eq!(page.data.len(), 10);
    }

    #[tokio::test]
    async fn list_leads_sorts_by_requested_field() {
        let state = AppState::default();
        for name in ["bravo", "alpha", "charlie"] {
            seed_lead(&state, create_request(1, name)).await;
        }

        let query = LeadListQuery {
            page: 1,
            per_page: 10,
            sort_field: Some("customerName".to_string()),
            sort_order: SortOrder::Asc,
        };
        let Json(page) = list_leads(identity(), State(state), Query(query))
            .await
            .expect("list succeeds");
        let names: Vec<_> = page
            .data
            .iter()
            .map(|lead| lead.customer_name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["alpha", "bravo", "charlie"]);
    }

    #[tokio::test]
    async fn list_leads_accepts_camel_case_query_names() {
        let state = AppState::default();
        for name in ["bravo", "alpha", "charlie"] {
            seed_lead(&state, create_request(1, name)).await;
        }

        // The admin UI sends perPage/sortField/sortOrder.
        let query: LeadListQuery = serde_json::from_value(serde_json::json!({
            "page": 1,
            "perPage": 2,
            "sortField": "customerName",
            "sortOrder": "asc"
        }))
        .unwrap();
        assert_eq!(query.per_page, 2);
        assert_eq!(query.sort_field.as_deref(), Some("customerName"));
        assert_eq!(query.sort_order, SortOrder::Asc);

        let Json(page) = list_leads(identity(), State(state), Query(query))
            .await
            .expect("list succeeds");
        assert_eq!(page.total, 3);
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].customer_name.as_deref(), Some("alpha"));
    }

    #[tokio::test]
    async fn list_leads_with_unknown_sort_field_uses_created_at() {
        let state = AppState::default();
        seed_lead(&state, create_request(1, "A")).await;

        let query = LeadListQuery {
            page: 1,
            per_page: 10,
            sort_field: Some("no_such_field".to_string()),
            sort_order: SortOrder::Desc,
        };
        let Json(page) = list_leads(identity(), State(state), Query(query))
            .await
            .expect("list succeeds despite bad sort field");
        assert_eq!(page.total, 1);
    }
}
