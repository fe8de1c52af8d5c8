// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token issuance and validation.
//!
//! ```text
//! token     := b64url(header) "." b64url(payload) "." b64url(signature)
//! header    := {"alg":"HS256","typ":"JWT"}
//! signature := HMAC_SHA256(secret, b64url(header) "." b64url(payload))
//! ```
//!
//! Validation is fail-fast: segment count, then signature, then header and
//! claims, then expiry. Nothing from the payload is read before the signature
//! has been checked.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::claims::Claims;
use super::codec;
use super::signer::Signer;
use super::{AuthError, Role};
use crate::config::{AuthSettings, ConfigError};

const ALGORITHM: &str = "HS256";
const TOKEN_TYPE: &str = "JWT";

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

impl TokenHeader {
    fn hs256() -> Self {
        Self {
            alg: ALGORITHM.to_string(),
            typ: Some(TOKEN_TYPE.to_string()),
        }
    }
}

/// Issues and validates tokens. Immutable after construction.
#[derive(Debug, Clone)]
pub struct TokenService {
    signer: Signer,
    ttl: TimeDelta,
}

impl TokenService {
    pub fn new(signer: Signer, ttl_seconds: u32) -> Self {
        Self {
            signer,
            ttl: TimeDelta::seconds(i64::from(ttl_seconds)),
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Result<Self, ConfigError> {
        let signer = Signer::new(&settings.secret)?;
        Ok(Self::new(signer, settings.ttl_seconds))
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Issue a token valid from `now` until `now + ttl`.
    pub fn issue(
        &self,
        user_id: i64,
        subject_email: &str,
        full_name: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Internal("token expiry overflows".to_string()))?;
        let claims = Claims::new(user_id, subject_email, full_name, role, now, expires_at)
            .map_err(|e| AuthError::Internal(format!("cannot issue token: {e}")))?;

        let header_part = codec::encode_bytes(&codec::encode_claims(&TokenHeader::hs256())?);
        let payload_part = codec::encode_bytes(&codec::encode_claims(&claims)?);
        let signing_input = format!("{header_part}.{payload_part}");
        let signature_part = codec::encode_bytes(&self.signer.sign(signing_input.as_bytes()));

        Ok(format!("{signing_input}.{signature_part}"))
    }

    /// Validate a token at `now` and return its claims.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::MissingToken);
        }

        let segments: Vec<&str> = token.split('.').collect();
        let [header_part, payload_part, signature_part] = segments.as_slice() else {
            return Err(AuthError::MalformedToken);
        };

        self.verify_signature(header_part, payload_part, signature_part)?;

        let header: TokenHeader = codec::decode_claims(&codec::decode_bytes(header_part)?)
            .map_err(|_| AuthError::MalformedToken)?;
        if header.alg != ALGORITHM {
            return Err(AuthError::UnsupportedAlgorithm);
        }

        let claims: Claims = codec::decode_claims(&codec::decode_bytes(payload_part)?)?;
        if claims.is_expired_at(now) {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }

    fn verify_signature(
        &self,
        header_part: &str,
        payload_part: &str,
        signature_part: &str,
    ) -> Result<(), AuthError> {
        // An undecodable signature can never match.
        let signature =
            codec::decode_bytes(signature_part).map_err(|_| AuthError::InvalidSignature)?;
        let signing_input = format!("{header_part}.{payload_part}");
        if self.signer.verify(signing_input.as_bytes(), &signature) {
            Ok(())
        } else {
            Err(AuthError::InvalidSignature)
        }
    }
}
