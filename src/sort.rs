// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Aarvee CRM

//! Sort-field allow-list for the lead list endpoint.
//!
//! Client sort parameters come from the admin UI in several spellings
//! (camelCase, snake_case, a few shorthand tokens). They map onto a closed
//! set of lead fields; anything outside the set falls back to the default
//! ordering and is counted, never passed through to the store.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use serde::Deserialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::models::Lead;

/// Count of list requests that asked for a field outside the allow-list.
static INVALID_SORT_REQUESTS: AtomicU64 = AtomicU64::new(0);

/// The closed set of sortable lead fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    ContactId,
    LeadNumber,
    CustomerName,
    ContactNumber,
    Product,
    LoanAmountRequired,
    Location,
    LeadReferredBy,
    LeadAssignedTo,
    LeadStatus,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Map a client-supplied field name onto the allow-list.
    ///
    /// Blank input maps to the default ([`SortField::CreatedAt`]); an
    /// unrecognized field maps to `None`.
    pub fn map(client_field: &str) -> Option<Self> {
        let field = client_field.trim();
        if field.is_empty() {
            return Some(SortField::CreatedAt);
        }

        match field {
            "id" => Some(SortField::Id),
            "contact_id" | "contactId" => Some(SortField::ContactId),
            "lead_number" | "leadNumber" => Some(SortField::LeadNumber),
            // "name" is the admin UI's shorthand for the customer name.
            "name" | "customer_name" | "customerName" => Some(SortField::CustomerName),
            "contact_number" | "contactNumber" => Some(SortField::ContactNumber),
            "product" => Some(SortField::Product),
            "loan_amount_required" | "loanAmountRequired" => Some(SortField::LoanAmountRequired),
            "location" => Some(SortField::Location),
            "lead_referred_by" | "leadReferredBy" => Some(SortField::LeadReferredBy),
            "lead_assigned_to" | "leadAssignedTo" => Some(SortField::LeadAssignedTo),
            "lead_status" | "leadStatus" => Some(SortField::LeadStatus),
            "created" | "created_at" | "createdAt" => Some(SortField::CreatedAt),
            "updated" | "updated_at" | "updatedAt" => Some(SortField::UpdatedAt),
            _ => None,
        }
    }

    /// Map a client field, falling back to the default and counting the
    /// invalid request when it is outside the allow-list.
    pub fn map_or_default(client_field: &str) -> Self {
        match Self::map(client_field) {
            Some(field) => field,
            None => {
                INVALID_SORT_REQUESTS.fetch_add(1, AtomicOrdering::Relaxed);
                warn!(field = client_field, "invalid sort field, using created_at");
                SortField::CreatedAt
            }
        }
    }

    /// Compare two leads by this field, ascending. Absent optional values
    /// order before present ones.
    pub fn compare(&self, a: &Lead, b: &Lead) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::ContactId => a.contact_id.cmp(&b.contact_id),
            SortField::LeadNumber => a.lead_number.cmp(&b.lead_number),
            SortField::CustomerName => a.customer_name.cmp(&b.customer_name),
            SortField::ContactNumber => a.contact_number.cmp(&b.contact_number),
            SortField::Product => a.product.cmp(&b.product),
            SortField::LoanAmountRequired => {
                a.loan_amount_required.cmp(&b.loan_amount_required)
            }
            SortField::Location => a.location.cmp(&b.location),
            SortField::LeadReferredBy => a.lead_referred_by.cmp(&b.lead_referred_by),
            SortField::LeadAssignedTo => a.lead_assigned_to.cmp(&b.lead_assigned_to),
            SortField::LeadStatus => a.lead_status.cmp(&b.lead_status),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

/// Number of invalid sort requests seen since startup.
pub fn invalid_sort_count() -> u64 {
    INVALID_SORT_REQUESTS.load(AtomicOrdering::Relaxed)
}

/// Sort direction, defaulting to newest-first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}
