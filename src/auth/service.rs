// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login and registration flows.
//!
//! Login is the only place tokens are issued. bcrypt work runs on the
//! blocking pool so it does not stall the request executor.

use std::sync::Arc;

use super::password::PasswordHasher;
use super::AuthError;
use crate::error::ApiError;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, UserResponse, BEARER_TOKEN_TYPE};
use crate::state::AppState;
use crate::store::NewUserAccount;

const PASSWORD_MIN_LEN: usize = 6;
const PASSWORD_MAX_LEN: usize = 120;

/// Check credentials and issue a token.
///
/// Unknown emails and wrong passwords produce the same error.
pub async fn login(state: &AppState, request: LoginRequest) -> Result<LoginResponse, AuthError> {
    let account = state
        .users
        .find_by_email(request.email.trim())
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?;

    let Some(account) = account else {
        tracing::warn!(email = %request.email, "Login attempt for unknown email");
        return Err(AuthError::InvalidCredentials);
    };

    let matches = verify_password(
        state.passwords.clone(),
        request.password,
        account.password_hash.clone(),
    )
    .await?;
    if !matches {
        tracing::warn!(email = %request.email, "Failed login attempt");
        return Err(AuthError::InvalidCredentials);
    }

    let token = state.tokens.issue(
        account.id,
        &account.email,
        &account.full_name,
        account.role,
        state.clock.now(),
    )?;
    tracing::info!(user_id = account.id, email = %account.email, "User authenticated");

    Ok(LoginResponse {
        token,
        token_type: BEARER_TOKEN_TYPE.to_string(),
        user: UserResponse::from(&account),
    })
}

/// Create an account. The email must not already be registered.
pub async fn register(state: &AppState, request: RegisterRequest) -> Result<UserResponse, ApiError> {
    validate_registration(&request)?;

    let email = request.email.trim().to_string();
    if state.users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::conflict(format!(
            "a user is already registered with email {email}"
        )));
    }

    let hasher = state.passwords.clone();
    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| ApiError::internal(format!("password hashing task failed: {e}")))?
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let account = state
        .users
        .create(
            NewUserAccount {
                email,
                password_hash,
                full_name: request.full_name.trim().to_string(),
                role: request.role,
            },
            state.clock.now(),
        )
        .await?;

    tracing::info!(user_id = account.id, role = %account.role, "User registered");
    Ok(UserResponse::from(&account))
}

fn validate_registration(request: &RegisterRequest) -> Result<(), ApiError> {
    if request.full_name.trim().is_empty() {
        return Err(ApiError::bad_request("fullName must not be blank"));
    }
    let email = request.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::bad_request("email must be a valid address"));
    }
    let len = request.password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(ApiError::bad_request(format!(
            "password must be between {PASSWORD_MIN_LEN} and {PASSWORD_MAX_LEN} characters"
        )));
    }
    Ok(())
}

async fn verify_password(
    hasher: Arc<dyn PasswordHasher>,
    plaintext: String,
    hash: String,
) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hash))
        .await
        .map_err(|e| AuthError::Internal(format!("password check task failed: {e}")))
}
