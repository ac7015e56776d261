// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Forum Server - blog/forum backend with JWT session handling
//!
//! Short-lived access tokens are stateless and verified per request; long-lived
//! refresh tokens are bound to the account so only the latest one is honored.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token codec, authentication filter, security context, credentials
//! - `config` - Environment configuration
//! - `store` - In-memory account store and refresh-token binding

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
