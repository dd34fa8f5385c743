// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Aarvee CRM

//! In-memory lead store.
//!
//! Backs the lead API with a plain `HashMap` guarded by the application
//! state's `RwLock`. Lead numbers are generated here so they stay unique
//! per process: `LEAD-YYYYMMDD-NNNNN`, where the counter resets each day.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{CreateLeadRequest, Lead, UpdateLeadRequest};
use crate::sort::{SortField, SortOrder};

#[derive(Default)]
pub struct InMemoryStore {
    leads: HashMap<String, Lead>,
    lead_number_date: Option<NaiveDate>,
    lead_number_seq: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next lead number for today, `LEAD-YYYYMMDD-NNNNN`. The sequence
    /// restarts at 1 on the first lead of each day.
    fn next_lead_number(&mut self) -> String {
        let today = Utc::now().date_naive();
        if self.lead_number_date != Some(today) {
            self.lead_number_date = Some(today);
            self.lead_number_seq = 0;
        }
        self.lead_number_seq += 1;
        format!(
            "LEAD-{}-{:05}",
            today.format("%Y%m%d"),
            self.lead_number_seq
        )
    }

    pub fn create_lead(&mut self, request: CreateLeadRequest) -> Result<Lead, ApiError> {
        let contact_id = request
            .contact_id
            .ok_or_else(|| ApiError::bad_request("contact_id is required"))?;

        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let lead = Lead {
            id: id.clone(),
            contact_id,
            lead_number: self.next_lead_number(),
            customer_name: request.customer_name,
            contact_number: request.contact_number,
            product: request.product,
            loan_amount_required: request.loan_amount_required,
            location: request.location,
            lead_referred_by: request.lead_referred_by,
            lead_assigned_to: request.lead_assigned_to,
            lead_status: request.lead_status.unwrap_or_else(|| "new".to_string()),
            short_description: request.short_description,
            business_details: request.business_details,
            property_details: request.property_details,
            auto_loan_details: request.auto_loan_details,
            machinery_loan_details: request.machinery_loan_details,
            created_at: now,
            updated_at: now,
        };
        self.leads.insert(id, lead.clone());
        Ok(lead)
    }

    pub fn lead(&self, lead_id: &str) -> Result<Lead, ApiError> {
        self.leads
            .get(lead_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Lead not found"))
    }

    pub fn update_lead(
        &mut self,
        lead_id: &str,
        request: UpdateLeadRequest,
    ) -> Result<Lead, ApiError> {
        let lead = self
            .leads
            .get_mut(lead_id)
            .ok_or_else(|| ApiError::not_found("Lead not found"))?;

        if let Some(customer_name) = request.customer_name {
            lead.customer_name = Some(customer_name);
        }
        if let Some(contact_number) = request.contact_number {
            lead.contact_number = Some(contact_number);
        }
        if let Some(product) = request.product {
            lead.product = Some(product);
        }
        if let Some(loan_amount_required) = request.loan_amount_required {
            lead.loan_amount_required = Some(loan_amount_required);
        }
        if let Some(location) = request.location {
            lead.location = Some(location);
        }
        if let Some(lead_referred_by) = request.lead_referred_by {
            lead.lead_referred_by = Some(lead_referred_by);
        }
        if let Some(lead_assigned_to) = request.lead_assigned_to {
            lead.lead_assigned_to = Some(lead_assigned_to);
        }
        if let Some(lead_status) = request.lead_status {
            lead.lead_status = lead_status;
        }
        if let Some(short_description) = request.short_description {
            lead.short_description = Some(short_description);
        }
        if let Some(business_details) = request.business_details {
            lead.business_details = Some(business_details);
        }
        if let Some(property_details) = request.property_details {
            lead.property_details = Some(property_details);
        }
        if let Some(auto_loan_details) = request.auto_loan_details {
            lead.auto_loan_details = Some(auto_loan_details);
        }
        if let Some(machinery_loan_details) = request.machinery_loan_details {
            lead.machinery_loan_details = Some(machinery_loan_details);
        }
        lead.updated_at = Utc::now();

        Ok(lead.clone())
    }

    pub fn delete_lead(&mut self, lead_id: &str) -> Result<(), ApiError> {
        if self.leads.remove(lead_id).is_some() {
            Ok(())
        } else {
            Err(ApiError::not_found("Lead not found"))
        }
    }

    /// One page of leads plus the total count. `page` is 1-based; a page
    /// past the end returns an empty slice with the true total.
    pub fn list_leads(
        &self,
        page: u64,
        per_page: u64,
        sort_field: SortField,
        sort_order: SortOrder,
    ) -> (Vec<Lead>, u64) {
        let mut leads: Vec<Lead> = self.leads.values().cloned().collect();
        // Tiebreak on id so paging is stable across requests.
        leads.sort_by(|a, b| {
            sort_order
                .apply(sort_field.compare(a, b))
                .then_with(|| a.id.cmp(&b.id))
        });

        let total = leads.len() as u64;
        let page = page.max(1);
        let start = (page - 1).saturating_mul(per_page) as usize;
        let leads = leads
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();

        (leads, total)
    }

    pub fn lead_count(&self) -> usize {
        self.leads.len()
    }
}
