// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing capability.
//!
//! The rest of the crate only sees `hash` and `verify`; bcrypt is the
//! production implementation.

/// Opaque password hashing.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;

    /// `false` for a mismatch and for an unreadable hash alike.
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(String);

/// bcrypt with a configurable cost.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Lower costs are only meant for tests.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| PasswordError(e.to_string()))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        bcrypt::verify(plaintext, hash).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_only_the_hashed_password() {
        let hasher = BcryptHasher::with_cost(4);
        let hash = hasher.hash("admin123").unwrap();
        assert_ne!(hash, "admin123");
        assert!(hasher.verify("admin123", &hash));
        assert!(!hasher.verify("admin124", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!BcryptHasher::with_cost(4).verify("admin123", "not-a-bcrypt-hash"));
    }

    #[test]
    fn invalid_cost_is_an_error() {
        assert!(BcryptHasher::with_cost(1).hash("admin123").is_err());
    }
}
