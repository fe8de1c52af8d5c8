// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and authenticated user representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::roles::Role;
use crate::store::UserAccount;

/// Decoded token payload.
///
/// All six fields are required on the wire. Construction enforces a
/// non-empty subject and `issued_at <= expires_at`; timestamps carry whole
/// seconds only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireClaims", into = "WireClaims")]
pub struct Claims {
    subject_email: String,
    user_id: i64,
    full_name: String,
    role: Role,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Payload layout: `{"sub","uid","name","role","iat","exp"}`.
#[derive(Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    uid: i64,
    name: String,
    role: Role,
    iat: i64,
    exp: i64,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClaimsError {
    #[error("sub must not be empty")]
    EmptySubject,
    #[error("iat is after exp")]
    IssuedAfterExpiry,
    #[error("{0} is out of range")]
    TimestampOutOfRange(&'static str),
}

impl Claims {
    pub fn new(
        user_id: i64,
        subject_email: impl Into<String>,
        full_name: impl Into<String>,
        role: Role,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, ClaimsError> {
        let subject_email = subject_email.into();
        if subject_email.is_empty() {
            return Err(ClaimsError::EmptySubject);
        }
        let issued_at = whole_seconds(issued_at.timestamp(), "iat")?;
        let expires_at = whole_seconds(expires_at.timestamp(), "exp")?;
        if issued_at > expires_at {
            return Err(ClaimsError::IssuedAfterExpiry);
        }
        Ok(Self {
            subject_email,
            user_id,
            full_name: full_name.into(),
            role,
            issued_at,
            expires_at,
        })
    }

    pub fn subject_email(&self) -> &str {
        &self.subject_email
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// `exp <= now`, compared in whole seconds.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.timestamp() <= now.timestamp()
    }
}

fn whole_seconds(seconds: i64, field: &'static str) -> Result<DateTime<Utc>, ClaimsError> {
    DateTime::from_timestamp(seconds, 0).ok_or(ClaimsError::TimestampOutOfRange(field))
}

impl TryFrom<WireClaims> for Claims {
    type Error = ClaimsError;

    fn try_from(wire: WireClaims) -> Result<Self, Self::Error> {
        let issued_at = whole_seconds(wire.iat, "iat")?;
        let expires_at = whole_seconds(wire.exp, "exp")?;
        Claims::new(wire.uid, wire.sub, wire.name, wire.role, issued_at, expires_at)
    }
}

impl From<Claims> for WireClaims {
    fn from(claims: Claims) -> Self {
        Self {
            sub: claims.subject_email,
            uid: claims.user_id,
            name: claims.full_name,
            role: claims.role,
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
        }
    }
}

/// Identity attached to the request once the gate accepts a token.
///
/// Profile fields, including the role, come from the live account record.
/// The authority is derived from the role the token was issued with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub email: String,
    pub full_name: String,
    /// Role currently stored on the account
    pub role: Role,
    /// Capability tag (`ROLE_<NAME>`) from the token's role claim
    pub authority: &'static str,
    /// Token expiration
    pub expires_at: DateTime<Utc>,
}

impl AuthenticatedUser {
    pub fn resolve(account: &UserAccount, claims: &Claims) -> Self {
        Self {
            user_id: account.id,
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            role: account.role,
            authority: claims.role().authority(),
            expires_at: claims.expires_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    fn sample_claims() -> Claims {
        Claims::new(42, "a@b.com", "Ana", Role::Agent, at(1_700_000_000), at(1_700_003_600)).unwrap()
    }

    #[test]
    fn serializes_in_wire_layout() {
        let json = serde_json::to_string(&sample_claims()).unwrap();
        assert_eq!(
            json,
            r#"{"sub":"a@b.com","uid":42,"name":"Ana","role":"AGENT","iat":1700000000,"exp":1700003600}"#
        );
    }

    #[test]
    fn rejects_empty_subject_and_inverted_times() {
        assert_eq!(
            Claims::new(1, "", "X", Role::User, at(10), at(20)),
            Err(ClaimsError::EmptySubject)
        );
        assert_eq!(
            Claims::new(1, "x@y.z", "X", Role::User, at(20), at(10)),
            Err(ClaimsError::IssuedAfterExpiry)
        );
    }

    #[test]
    fn truncates_to_whole_seconds() {
        let iat = Utc.timestamp_opt(100, 999_000_000).unwrap();
        let claims = Claims::new(1, "x@y.z", "X", Role::User, iat, at(200)).unwrap();
        assert_eq!(claims.issued_at(), at(100));
    }

    #[test]
    fn deserialize_requires_every_field() {
        let missing_role = r#"{"sub":"a@b.com","uid":42,"name":"Ana","iat":1,"exp":2}"#;
        assert!(serde_json::from_str::<Claims>(missing_role).is_err());

        let unknown_role = r#"{"sub":"a@b.com","uid":42,"name":"Ana","role":"OWNER","iat":1,"exp":2}"#;
        assert!(serde_json::from_str::<Claims>(unknown_role).is_err());
    }

    #[test]
    fn expiry_is_inclusive_of_exp() {
        let claims = sample_claims();
        assert!(!claims.is_expired_at(at(1_700_003_599)));
        assert!(claims.is_expired_at(at(1_700_003_600)));
    }

    #[test]
    fn resolve_takes_profile_from_account_and_authority_from_token() {
        let account = UserAccount {
            id: 42,
            email: "ana@inmo.com".into(),
            password_hash: "hash".into(),
            full_name: "Ana Ruiz".into(),
            role: Role::User,
            created_at: at(0),
            updated_at: at(0),
        };
        let user = AuthenticatedUser::resolve(&account, &sample_claims());
        assert_eq!(user.email, "ana@inmo.com");
        assert_eq!(user.full_name, "Ana Ruiz");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.authority, "ROLE_AGENT");
    }
}
