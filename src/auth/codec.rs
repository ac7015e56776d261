// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token codec: minting and verifying access/refresh JWTs.
//!
//! Tokens are compact HS512 JWS values signed with a per-identity
//! [`SigningKey`]. Verification fails closed: anything other than a
//! well-formed, correctly signed, correctly shaped token from this issuer is
//! [`TokenError::Malformed`]. Expiry is reported separately as
//! [`TokenError::Expired`] so callers can branch on it.

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::claims::{Claims, TokenKind};
use super::clock::{Clock, SystemClock};
use super::signing::SigningKey;
use crate::config::AuthSettings;
use crate::models::Identity;

/// Fixed `iss` claim for every token.
pub const ISSUER: &str = "forum-server";

/// Claim carrying the redundant identity copy in access tokens.
pub const EMAIL_CLAIM: &str = "email";

const ALGORITHM: Algorithm = Algorithm::HS512;

/// Token verification and minting errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Token is malformed or its signature is invalid")]
    Malformed,

    #[error("Token has expired")]
    Expired,

    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

/// A freshly minted token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    /// Expiration (Unix timestamp)
    pub expires_at: i64,
}

/// Access + refresh token pair issued at login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: i64,
    pub refresh_expires_at: i64,
}

#[derive(Deserialize)]
struct SubjectOnly {
    sub: String,
}

/// Mints and verifies tokens.
#[derive(Clone)]
pub struct TokenCodec {
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Create a codec using the configured lifetimes and the system clock.
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            access_ttl_secs: settings.access_ttl_secs,
            refresh_ttl_secs: settings.refresh_ttl_secs,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Mint an access token: `sub` and `email` both carry the identity.
    pub fn create_access_token(
        &self,
        identity: &Identity,
        key: &SigningKey,
    ) -> Result<IssuedToken, TokenError> {
        self.create(TokenKind::Access, identity, key)
    }

    /// Mint a refresh token: subject only, no `email` claim.
    pub fn create_refresh_token(
        &self,
        identity: &Identity,
        key: &SigningKey,
    ) -> Result<IssuedToken, TokenError> {
        self.create(TokenKind::Refresh, identity, key)
    }

    /// Mint both tokens for a login.
    pub fn create_token_pair(
        &self,
        identity: &Identity,
        key: &SigningKey,
    ) -> Result<TokenPair, TokenError> {
        let access = self.create_access_token(identity, key)?;
        let refresh = self.create_refresh_token(identity, key)?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
            access_expires_at: access.expires_at,
            refresh_expires_at: refresh.expires_at,
        })
    }

    fn create(
        &self,
        kind: TokenKind,
        identity: &Identity,
        key: &SigningKey,
    ) -> Result<IssuedToken, TokenError> {
        let now = self.clock.now();
        let (ttl, email) = match kind {
            TokenKind::Access => (self.access_ttl_secs, Some(identity.to_string())),
            TokenKind::Refresh => (self.refresh_ttl_secs, None),
        };

        let exp = now
            .checked_add(ttl)
            .ok_or_else(|| TokenError::Encoding(format!("{kind:?} token lifetime overflows")))?;

        let claims = Claims {
            sub: identity.to_string(),
            iss: ISSUER.to_string(),
            iat: now,
            exp,
            email,
        };

        let token = encode(&Header::new(ALGORITHM), &claims, &key.encoding_key())
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    /// Verify a token of the expected kind and return its claims.
    ///
    /// Access tokens must carry `email` equal to `sub`; refresh tokens must
    /// not carry `email` at all.
    pub fn verify(
        &self,
        kind: TokenKind,
        key: &SigningKey,
        token: &str,
    ) -> Result<Claims, TokenError> {
        let claims: Claims = self.decode_verified(key, token)?;

        if claims.kind() != kind {
            return Err(TokenError::Malformed);
        }
        if kind == TokenKind::Access && claims.email.as_deref() != Some(claims.sub.as_str()) {
            return Err(TokenError::Malformed);
        }

        Ok(claims)
    }

    /// Fail-closed validity check.
    pub fn is_valid(&self, kind: TokenKind, key: &SigningKey, token: &str) -> bool {
        self.verify(kind, key, token).is_ok()
    }

    /// Verify the signature and return the subject.
    pub fn extract_subject(&self, key: &SigningKey, token: &str) -> Result<Identity, TokenError> {
        let claims: SubjectOnly = self.decode_verified(key, token)?;
        Ok(Identity::from(claims.sub))
    }

    /// Verify the signature and return a single claim, if present.
    pub fn extract_claim(
        &self,
        key: &SigningKey,
        token: &str,
        name: &str,
    ) -> Result<Option<Value>, TokenError> {
        let mut claims: Map<String, Value> = self.decode_verified(key, token)?;
        Ok(claims.remove(name))
    }

    /// Read `sub` WITHOUT verifying anything.
    ///
    /// Only used to pick whose signing key to verify with; the result must
    /// never be trusted on its own.
    pub fn peek_subject(token: &str) -> Result<Identity, TokenError> {
        let data = jsonwebtoken::dangerous::insecure_decode::<SubjectOnly>(token)
            .map_err(|_| TokenError::Malformed)?;
        Ok(Identity::from(data.claims.sub))
    }

    /// Check algorithm, signature, issuer and required claims, then expiry
    /// against our clock, then deserialize into `T`.
    fn decode_verified<T: DeserializeOwned>(
        &self,
        key: &SigningKey,
        token: &str,
    ) -> Result<T, TokenError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.validate_aud = false;
        // Expiry is checked below against the injected clock.
        validation.validate_exp = false;
        validation.leeway = 0;

        let data = decode::<Map<String, Value>>(token, &key.decoding_key(), &validation)
            .map_err(|_| TokenError::Malformed)?;

        let exp = data
            .claims
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or(TokenError::Malformed)?;
        if exp <= self.clock.now() {
            return Err(TokenError::Expired);
        }

        serde_json::from_value(Value::Object(data.claims)).map_err(|_| TokenError::Malformed)
    }
}
