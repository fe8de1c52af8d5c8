// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication endpoints.

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::{service, Auth, AuthError};
use crate::error::ApiError;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use crate::state::AppState;

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    service::login(&state, request).await.map(Json)
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid registration data"),
        (status = 409, description = "Email already registered"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = service::register(&state, request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get the current authenticated user's information.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Authentication",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn me(Auth(user): Auth) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

/// Stateless logout; the client discards its token.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Authentication",
    responses((status = 204, description = "Logged out"))
)]
pub async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}
