// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Aarvee CRM

//! # API Data Models
//!
//! Request and response structures for the lead API. All types derive
//! `Serialize`, `Deserialize`, and `ToSchema` for JSON handling and OpenAPI
//! documentation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A sales lead record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Lead {
    /// Unique identifier for this lead.
    pub id: String,
    /// The CRM contact this lead belongs to.
    pub contact_id: u64,
    /// Generated, unique lead number (`LEAD-YYYYMMDD-NNNNN`).
    pub lead_number: String,
    /// Customer name as entered by the agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// Customer phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    /// Product the lead is interested in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    /// Requested loan amount, in whole currency units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_amount_required: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_referred_by: Option<String>,
    /// Id of the agent the lead is assigned to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_assigned_to: Option<u64>,
    /// Pipeline status, defaults to `new`.
    pub lead_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    /// Freeform detail blobs per product line, stored as sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_loan_details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machinery_loan_details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a lead. `contact_id` is the only required field;
/// it is optional here so its absence surfaces as a 400 validation error
/// rather than a deserialization failure. The lead number is generated
/// server-side.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateLeadRequest {
    #[serde(default)]
    pub contact_id: Option<u64>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub loan_amount_required: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub lead_referred_by: Option<String>,
    #[serde(default)]
    pub lead_assigned_to: Option<u64>,
    /// Defaults to `new` when omitted.
    #[serde(default)]
    pub lead_status: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub business_details: Option<serde_json::Value>,
    #[serde(default)]
    pub property_details: Option<serde_json::Value>,
    #[serde(default)]
    pub auto_loan_details: Option<serde_json::Value>,
    #[serde(default)]
    pub machinery_loan_details: Option<serde_json::Value>,
}

/// Partial update for a lead. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateLeadRequest {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub loan_amount_required: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub lead_referred_by: Option<String>,
    #[serde(default)]
    pub lead_assigned_to: Option<u64>,
    #[serde(default)]
    pub lead_status: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub business_details: Option<serde_json::Value>,
    #[serde(default)]
    pub property_details: Option<serde_json::Value>,
    #[serde(default)]
    pub auto_loan_details: Option<serde_json::Value>,
    #[serde(default)]
    pub machinery_loan_details: Option<serde_json::Value>,
}

/// One page of leads plus the total match count, the shape the admin UI's
/// data provider expects.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeadPage {
    pub data: Vec<Lead>,
    pub total: u64,
}

/// Response for a successful delete.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
}
