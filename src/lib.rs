// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gestion Auth Server - Stateless bearer-token authentication
//!
//! This crate issues HMAC-signed bearer tokens on login and validates them on
//! every request of the property-management API.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token codec, signer, token service, request gate
//! - `clock` - Injectable time source
//! - `config` - Environment-driven settings
//! - `store` - User account directory

pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
