// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Aarvee CRM

//! Aarvee CRM - Custom Record Service
//!
//! Backend for lead management with JWT bearer authentication against an
//! external identity provider's JWKS endpoint.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer token verification (JWKS-backed)
//! - `store` - In-memory lead storage
//! - `sort` - Sort-field allow-list for list endpoints

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod sort;
pub mod state;
pub mod store;
