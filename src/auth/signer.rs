// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HMAC-SHA256 token signing.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::{ConfigError, SecretKey, JWT_SECRET_ENV};

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies messages with a fixed secret.
///
/// The keyed MAC state is computed once; each call works on its own clone,
/// so a `Signer` can be shared across tasks without locking.
#[derive(Clone)]
pub struct Signer {
    keyed: HmacSha256,
}

impl Signer {
    pub fn new(secret: &SecretKey) -> Result<Self, ConfigError> {
        let keyed = HmacSha256::new_from_slice(secret.expose()).map_err(|e| {
            ConfigError::InvalidValue {
                name: JWT_SECRET_ENV,
                reason: e.to_string(),
            }
        })?;
        Ok(Self { keyed })
    }

    /// HMAC-SHA256 of `message`.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let mut mac = self.keyed.clone();
        mac.update(message);
        mac.finalize().into_bytes().to_vec()
    }

    /// Recompute the MAC of `message` and compare it with `candidate`.
    ///
    /// The comparison is constant-time.
    pub fn verify(&self, message: &[u8], candidate: &[u8]) -> bool {
        let mut mac = self.keyed.clone();
        mac.update(message);
        mac.verify_slice(candidate).is_ok()
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Signer(HS256)")
    }
}
