// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Aarvee CRM

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `AUTH_JWKS_URL` | Identity provider JWKS endpoint | Unset: all requests anonymous |
//! | `AUTH_KEYS_TTL_SECS` | Key cache freshness window in seconds | `3600` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

/// Environment variable naming the identity provider's JWKS endpoint,
/// e.g. `https://auth.example.com/.well-known/jwks.json`.
///
/// When unset the service runs without token verification and every
/// request is anonymous; routes behind the `Identity` extractor then
/// uniformly reject.
pub const AUTH_JWKS_URL_ENV: &str = "AUTH_JWKS_URL";

/// Environment variable overriding the key cache TTL, in seconds.
///
/// The default of one hour matches the provider's expected rotation
/// cadence; a shorter TTL picks up rotations sooner at the cost of more
/// fetches.
pub const AUTH_KEYS_TTL_ENV: &str = "AUTH_KEYS_TTL_SECS";

/// Environment variable for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable selecting `json` or `pretty` log output.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default key cache TTL in seconds (one hour).
pub const DEFAULT_KEYS_TTL_SECS: u64 = 3600;
