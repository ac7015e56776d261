// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login, logout and password re-checks.
//!
//! bcrypt is CPU bound, so hashing and comparison run on the blocking pool.

use tracing::info;

use super::codec::TokenPair;
use super::error::AuthError;
use crate::models::{Identity, User};
use crate::state::AppState;

/// Secret behind the placeholder hash. Never belongs to an account.
const PLACEHOLDER_PASSWORD: &str = "placeholder-credential-for-unknown-identities";

/// Hash a plain password with the configured verifier.
pub async fn hash_password(state: &AppState, password: &str) -> Result<String, AuthError> {
    let verifier = state.verifier.clone();
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || verifier.hash(&password))
        .await
        .map_err(|e| AuthError::InternalError(format!("hashing task failed: {e}")))?
}

/// Compare a plain password against a user's stored hash.
pub async fn password_matches(state: &AppState, user: &User, password: &str) -> bool {
    let verifier = state.verifier.clone();
    let password = password.to_owned();
    let stored_hash = user.password_hash.clone();
    tokio::task::spawn_blocking(move || verifier.matches(&password, &stored_hash))
        .await
        .unwrap_or(false)
}

/// Run one full comparison against the placeholder hash so a login for an
/// unknown email takes as long as one with a wrong password. Always fails.
async fn reject_unknown_identity(state: &AppState, password: &str) {
    let verifier = state.verifier.clone();
    let placeholder = state.placeholder_hash.clone();
    let password = password.to_owned();
    let _ = tokio::task::spawn_blocking(move || {
        let hash = placeholder.get_or_init(|| verifier.hash(PLACEHOLDER_PASSWORD).unwrap_or_default());
        verifier.matches(&password, hash)
    })
    .await;
}

/// Re-check the caller's password before a sensitive mutation.
///
/// Returns the current account on success.
pub async fn reauthenticate(
    state: &AppState,
    identity: &Identity,
    password: &str,
) -> Result<User, AuthError> {
    let user = state
        .store
        .read()
        .await
        .find_by_email(identity)
        .ok_or(AuthError::UnknownIdentity)?;

    if !password_matches(state, &user, password).await {
        info!(user_id = %user.id, "Password re-check failed");
        return Err(AuthError::CredentialMismatch);
    }
    Ok(user)
}

/// Check credentials, mint a token pair and bind the refresh token.
///
/// Unknown email and wrong password produce the same error.
pub async fn login(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<(User, TokenPair), AuthError> {
    let identity = Identity::from(email);
    let user = state.store.read().await.find_by_email(&identity);

    let matched = match &user {
        Some(user) => password_matches(state, user, password).await,
        None => {
            reject_unknown_identity(state, password).await;
            false
        }
    };
    let Some(user) = user.filter(|_| matched) else {
        info!("Login rejected");
        return Err(AuthError::CredentialMismatch);
    };

    let key = state.signing_key_for(&user.password_hash);
    let pair = state.codec.create_token_pair(&user.email, &key)?;

    state
        .store
        .write()
        .await
        .set_refresh_token(&user.email, pair.refresh_token.clone())
        .map_err(|_| AuthError::UnknownIdentity)?;

    info!(user_id = %user.id, "User logged in");
    Ok((user, pair))
}

/// Drop the caller's refresh-token binding. Outstanding access tokens stay
/// valid until they expire.
pub async fn logout(state: &AppState, identity: &Identity) -> Result<(), AuthError> {
    state
        .store
        .write()
        .await
        .clear_refresh_token(identity)
        .map_err(|_| AuthError::UnknownIdentity)?;
    info!("User logged out");
    Ok(())
}
