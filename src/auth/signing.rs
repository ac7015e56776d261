// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-identity signing key derivation.
//!
//! Every token is signed with a key derived from the global secret and the
//! owning user's stored credential hash:
//!
//! ```text
//! key = HMAC-SHA512(key = JWT_SECRET, msg = password_hash)
//! ```
//!
//! ## Security Properties
//!
//! - Changing a user's password changes the hash, hence the key, so every
//!   token previously issued to that user stops verifying. No blacklist needed.
//! - There is no way to revoke a single token on demand without a credential
//!   change. Logout only clears the stored refresh token; outstanding access
//!   tokens remain valid until they expire.

use hmac::{Hmac, Mac};
use jsonwebtoken::{DecodingKey, EncodingKey};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Key material for signing and verifying one identity's tokens.
#[derive(Clone)]
pub struct SigningKey {
    bytes: Vec<u8>,
}

impl SigningKey {
    pub(crate) fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.bytes)
    }

    pub(crate) fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.bytes)
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(..)")
    }
}

impl PartialEq for SigningKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for SigningKey {}

/// Derive the signing key for an identity from the global secret and its credential hash.
pub fn derive_signing_key(secret: &str, credential_hash: &str) -> SigningKey {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(credential_hash.as_bytes());
    SigningKey {
        bytes: mac.finalize().into_bytes().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(
            derive_signing_key("secret", "$2b$04$hash"),
            derive_signing_key("secret", "$2b$04$hash")
        );
    }

    #[test]
    fn credential_change_changes_key() {
        assert_ne!(
            derive_signing_key("secret", "old-hash"),
            derive_signing_key("secret", "new-hash")
        );
    }

    #[test]
    fn secret_change_changes_key() {
        assert_ne!(
            derive_signing_key("secret-a", "hash"),
            derive_signing_key("secret-b", "hash")
        );
    }

    #[test]
    fn key_is_sha512_sized() {
        assert_eq!(derive_signing_key("s", "h").bytes.len(), 64);
    }

    #[test]
    fn debug_hides_material() {
        let key = derive_signing_key("secret", "hash");
        assert_eq!(format!("{key:?}"), "SigningKey(..)");
    }
}
