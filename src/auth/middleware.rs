// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication gate for Axum.
//!
//! Runs before every handler. Requests without a bearer credential pass
//! through untouched; handlers decide whether they need an identity (see
//! the extractors in `extractor.rs`). Requests with a bearer credential
//! either get an [`AuthenticatedUser`] in their extensions or are rejected
//! with 401 before any handler runs.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/api/auth/me", get(me))
//!     .layer(axum::middleware::from_fn_with_state(state.clone(), authenticate))
//!     .with_state(state);
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, AuthenticatedUser};
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Authentication middleware function.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        return next.run(request).await;
    };

    match resolve_identity(&state, &token).await {
        Ok(user) => {
            tracing::debug!(user_id = user.user_id, role = %user.role, "Authenticated request");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(
                error_code = err.error_code(),
                path = %request.uri().path(),
                "Rejected bearer token: {err}"
            );
            err.into_response()
        }
    }
}

/// Extract the credential from `Authorization: Bearer <token>`.
///
/// `None` when the header is absent, not valid text, or uses another scheme.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix(BEARER_PREFIX)
        .map(|token| token.trim().to_string())
}

/// Validate the token and re-resolve the live account it names.
pub async fn resolve_identity(
    state: &AppState,
    token: &str,
) -> Result<AuthenticatedUser, AuthError> {
    let claims = state.tokens.validate(token, state.clock.now())?;

    let account = state
        .users
        .find_by_id(claims.user_id())
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .ok_or_else(|| {
            tracing::debug!(user_id = claims.user_id(), "Token names an unknown account");
            AuthError::IdentityNotFound(claims.user_id())
        })?;

    Ok(AuthenticatedUser::resolve(&account, &claims))
}
