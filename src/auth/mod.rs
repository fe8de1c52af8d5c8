// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Self-contained bearer-token authentication for the property-management
//! API. Tokens are HS256 JWTs signed with a process-wide secret.
//!
//! ## Auth Flow
//!
//! 1. Client posts credentials to `/api/auth/login`
//! 2. Server verifies the password and issues a token (`token::TokenService::issue`)
//! 3. Client sends `Authorization: Bearer <token>` on later requests
//! 4. The gate (`middleware::authenticate`):
//!    - Validates segment count, signature, header, claims, expiry
//!    - Re-resolves the account by the `uid` claim
//!    - Attaches an [`AuthenticatedUser`] with a `ROLE_<NAME>` authority
//!
//! ## Security
//!
//! - No server-side session state; the token is the only state
//! - The signature is checked before any claim is read
//! - Clients only see a human-readable rejection message, never the check
//!   that failed
//! - No clock skew tolerance: `exp <= now` is expired

pub mod claims;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod roles;
pub mod service;
pub mod signer;
pub mod token;

pub use claims::{AuthenticatedUser, Claims};
pub use error::AuthError;
pub use extractor::{Auth, OptionalAuth};
pub use roles::Role;
pub use signer::Signer;
pub use token::TokenService;
