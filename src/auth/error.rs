// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
///
/// Every token failure is terminal for the request. The rejection body only
/// carries the human-readable message; `error_code` is for logs.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Bearer value present but empty
    #[error("Token is missing")]
    MissingToken,
    /// Token does not have exactly three segments, or its header is unreadable
    #[error("Token format is invalid")]
    MalformedToken,
    /// A segment is not unpadded base64url
    #[error("Token is badly encoded")]
    MalformedEncoding,
    /// Payload is not a complete claim set
    #[error("Token claims are malformed: {0}")]
    MalformedClaims(String),
    /// Header names an algorithm other than HS256
    #[error("Token algorithm is not supported")]
    UnsupportedAlgorithm,
    /// Signature does not match the header and payload
    #[error("Token signature is invalid")]
    InvalidSignature,
    /// `exp` is at or before the current instant
    #[error("Token has expired")]
    TokenExpired,
    /// Token names an account that no longer exists
    #[error("User not found")]
    IdentityNotFound(i64),
    /// Login with an unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// Internal error
    #[error("Internal authentication error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: &'static str,
    message: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::MalformedToken => "malformed_token",
            AuthError::MalformedEncoding => "malformed_encoding",
            AuthError::MalformedClaims(_) => "malformed_claims",
            AuthError::UnsupportedAlgorithm => "unsupported_algorithm",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::IdentityNotFound(_) => "identity_not_found",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AuthError::Internal(_) => "Internal authentication error".to_string(),
            other => other.to_string(),
        };
        let body = Json(AuthErrorBody {
            error: status.canonical_reason().unwrap_or("Error"),
            message,
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn expired_token_returns_401_with_message() {
        let response = AuthError::TokenExpired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Unauthorized");
        assert_eq!(body["message"], "Token has expired");
        assert!(body.get("error_code").is_none());
    }

    #[tokio::test]
    async fn identity_not_found_does_not_echo_the_user_id() {
        let response = AuthError::IdentityNotFound(4242).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["message"], "User not found");
        assert!(!body.to_string().contains("4242"));
    }

    #[tokio::test]
    async fn internal_error_hides_detail() {
        let response = AuthError::Internal("directory offline".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Internal authentication error");
    }

    #[test]
    fn token_failures_are_unauthorized() {
        for err in [
            AuthError::MissingToken,
            AuthError::MalformedToken,
            AuthError::MalformedEncoding,
            AuthError::MalformedClaims("uid".into()),
            AuthError::UnsupportedAlgorithm,
            AuthError::InvalidSignature,
            AuthError::TokenExpired,
            AuthError::IdentityNotFound(7),
        ] {
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED, "{}", err.error_code());
        }
    }
}
