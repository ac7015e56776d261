// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential verification.
//!
//! Passwords are only ever handled through [`CredentialVerifier`]; the stored
//! value is a one-way hash. Neither the secret nor the hash is logged.

use super::error::AuthError;

/// One-way password hashing and comparison.
pub trait CredentialVerifier: Send + Sync {
    /// Hash a plain secret for storage.
    fn hash(&self, secret: &str) -> Result<String, AuthError>;

    /// Compare a plain secret against a stored hash. Fails closed.
    fn matches(&self, secret: &str, stored_hash: &str) -> bool;
}

/// bcrypt-backed verifier.
#[derive(Debug, Clone, Copy)]
pub struct BcryptVerifier {
    cost: u32,
}

impl BcryptVerifier {
    pub fn new() -> Self {
        Self::with_cost(bcrypt::DEFAULT_COST)
    }

    /// Custom work factor (4..=31). Low values are only suitable for tests.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialVerifier for BcryptVerifier {
    fn hash(&self, secret: &str) -> Result<String, AuthError> {
        bcrypt::hash(secret, self.cost)
            .map_err(|e| AuthError::InternalError(format!("password hashing failed: {e}")))
    }

    fn matches(&self, secret: &str, stored_hash: &str) -> bool {
        match bcrypt::verify(secret, stored_hash) {
            Ok(matched) => matched,
            Err(_) => {
                tracing::warn!("Stored credential hash could not be parsed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> BcryptVerifier {
        BcryptVerifier::with_cost(4)
    }

    #[test]
    fn hash_then_match() {
        let hash = verifier().hash("correct horse").unwrap();
        assert_ne!(hash, "correct horse");
        assert!(verifier().matches("correct horse", &hash));
        assert!(!verifier().matches("battery staple", &hash));
    }

    #[test]
    fn same_secret_hashes_differently() {
        let first = verifier().hash("pw").unwrap();
        let second = verifier().hash("pw").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn unparsable_hash_fails_closed() {
        assert!(!verifier().matches("pw", "not-a-bcrypt-hash"));
    }

    #[test]
    fn invalid_cost_is_internal_error() {
        let result = BcryptVerifier::with_cost(2).hash("pw");
        assert!(matches!(result, Err(AuthError::InternalError(_))));
    }

    #[test]
    fn default_uses_library_cost() {
        assert_eq!(BcryptVerifier::default().cost(), bcrypt::DEFAULT_COST);
    }
}
