// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token segment encoding.
//!
//! Segments are unpadded base64url over compact JSON. Decoding is strict:
//! padding characters, the standard `+`/`/` alphabet, and non-canonical
//! trailing bits are all rejected.

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{de::DeserializeOwned, Serialize};

use super::AuthError;

/// Encode bytes as unpadded base64url.
pub fn encode_bytes(data: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(data)
}

/// Decode unpadded base64url text.
pub fn decode_bytes(text: &str) -> Result<Vec<u8>, AuthError> {
    Base64UrlUnpadded::decode_vec(text).map_err(|_| AuthError::MalformedEncoding)
}

/// Serialize a claim set to compact JSON.
pub fn encode_claims<T: Serialize>(claims: &T) -> Result<Vec<u8>, AuthError> {
    serde_json::to_vec(claims).map_err(|e| AuthError::Internal(format!("claim encoding: {e}")))
}

/// Parse a claim set from JSON. Missing fields and wrong value types fail.
pub fn decode_claims<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AuthError> {
    serde_json::from_slice(bytes).map_err(|e| AuthError::MalformedClaims(e.to_string()))
}
