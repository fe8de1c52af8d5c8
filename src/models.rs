// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies for the authentication endpoints. Field
//! names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{AuthenticatedUser, Role};
use crate::store::UserAccount;

/// Token type returned by the login endpoint.
pub const BEARER_TOKEN_TYPE: &str = "Bearer";

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "usuario@inmobiliaria.com")]
    pub email: String,
    #[schema(example = "Secr3t0!")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Signed bearer token
    pub token: String,
    /// Always `Bearer`
    pub token_type: String,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "Laura Martínez")]
    pub full_name: String,
    #[schema(example = "laura.martinez@inmobiliaria.com")]
    pub email: String,
    #[schema(example = "Secr3t0!")]
    pub password: String,
    pub role: Role,
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

impl From<&UserAccount> for UserResponse {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            role: account.role,
        }
    }
}

impl From<&AuthenticatedUser> for UserResponse {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            id: user.user_id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_reads_camel_case() {
        let request: RegisterRequest = serde_json::from_str(
            r#"{"fullName":"Laura","email":"l@i.com","password":"secret1","role":"AGENT"}"#,
        )
        .unwrap();
        assert_eq!(request.full_name, "Laura");
        assert_eq!(request.role, Role::Agent);
    }

    #[test]
    fn login_response_writes_camel_case() {
        let response = LoginResponse {
            token: "t".into(),
            token_type: BEARER_TOKEN_TYPE.into(),
            user: UserResponse {
                id: 1,
                email: "a@b.com".into(),
                full_name: "Ana".into(),
                role: Role::User,
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["tokenType"], "Bearer");
        assert_eq!(json["user"]["fullName"], "Ana");
        assert_eq!(json["user"]["role"], "USER");
    }
}
