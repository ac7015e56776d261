// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::{Arc, OnceLock};

use tokio::sync::RwLock;

use crate::auth::{derive_signing_key, BcryptVerifier, Clock, CredentialVerifier, SigningKey, TokenCodec};
use crate::config::AuthSettings;
use crate::store::InMemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    pub settings: Arc<AuthSettings>,
    pub codec: TokenCodec,
    pub verifier: Arc<dyn CredentialVerifier>,
    /// Hash compared against when a login names no account. Built on first use
    /// with the current verifier.
    pub placeholder_hash: Arc<OnceLock<String>>,
}

impl AppState {
    pub fn new(store: InMemoryStore, settings: AuthSettings) -> Self {
        let codec = TokenCodec::new(&settings);
        Self {
            store: Arc::new(RwLock::new(store)),
            settings: Arc::new(settings),
            codec,
            verifier: Arc::new(BcryptVerifier::new()),
            placeholder_hash: Arc::new(OnceLock::new()),
        }
    }

    /// Swap the credential verifier (e.g. a cheaper bcrypt cost).
    pub fn with_verifier(mut self, verifier: impl CredentialVerifier + 'static) -> Self {
        self.verifier = Arc::new(verifier);
        self.placeholder_hash = Arc::new(OnceLock::new());
        self
    }

    /// Swap the time source used for minting and expiry checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.codec = self.codec.with_clock(clock);
        self
    }

    /// Signing key for a user, derived from the global secret and their credential hash.
    pub fn signing_key_for(&self, password_hash: &str) -> SigningKey {
        derive_signing_key(&self.settings.secret, password_hash)
    }
}
