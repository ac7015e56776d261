// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication filter (Axum middleware).
//!
//! Runs once per request, before any handler, and decides in this order:
//!
//! 1. **Bypass** - unauthenticated route: pass through, no context inserted.
//! 2. **Refresh exchange** - the refresh header carries a token that is bound
//!    to a user and verifies under that user's key: respond `200 OK` with a
//!    fresh access token header. The handler does not run and no context is
//!    populated on this pass; the client retries with the new access token.
//! 3. **Unusable refresh token** - fall through to 4.
//! 4. **Access check** - the access header carries a token that verifies:
//!    populate the [`SecurityContext`] with the resolved principal.
//! 5. **Anything else** - continue with an empty context. Extractors reject
//!    routes that need a principal.
//!
//! Token failures never escape as errors; they are logged at `debug` (never
//! with the token itself) and degrade to "unauthenticated".
//!
//! ## Usage
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/user/info", get(get_my_info))
//!     .layer(axum::middleware::from_fn_with_state(state.clone(), authenticate))
//!     .with_state(state);
//! ```

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, info, warn};

use super::claims::{Principal, TokenKind};
use super::codec::{IssuedToken, TokenCodec};
use super::context::SecurityContext;
use super::error::AuthError;
use crate::state::AppState;

/// Scheme prefix expected on both token headers.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Authentication middleware function.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if state.settings.is_bypassed(request.uri().path()) {
        return next.run(request).await;
    }

    let refresh_token = bearer_token(request.headers(), &state.settings.refresh_header);
    if let Some(refresh_token) = refresh_token {
        if let Some(access) = reissue_access_token(&state, &refresh_token).await {
            return reissued_response(&state.settings.access_header, &access);
        }
    }

    let mut context = SecurityContext::empty();
    let access_token = bearer_token(request.headers(), &state.settings.access_header);
    if let Some(access_token) = access_token {
        if let Some(principal) = resolve_principal(&state, &access_token).await {
            context.set(principal);
        }
    }

    request.extensions_mut().insert(context);
    next.run(request).await
}

/// Extract a `Bearer` token from the named header. Anything else counts as absent.
pub fn bearer_token(headers: &HeaderMap, header_name: &str) -> Option<String> {
    headers
        .get(header_name)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Write a raw token value into a response header.
pub fn insert_token_header(
    headers: &mut HeaderMap,
    header_name: &str,
    token: &str,
) -> Result<(), AuthError> {
    let name = HeaderName::try_from(header_name)
        .map_err(|_| AuthError::InternalError(format!("invalid header name: {header_name}")))?;
    let value = HeaderValue::from_str(token)
        .map_err(|_| AuthError::InternalError("token is not a valid header value".to_string()))?;
    headers.insert(name, value);
    Ok(())
}

/// States 2/3: mint an access token if the refresh token is bound and verifies.
async fn reissue_access_token(state: &AppState, refresh_token: &str) -> Option<IssuedToken> {
    let owner = state.store.read().await.find_by_refresh_token(refresh_token);
    let Some(user) = owner else {
        debug!("Refresh token is not bound to any user, falling through");
        return None;
    };

    let key = state.signing_key_for(&user.password_hash);
    match state.codec.verify(TokenKind::Refresh, &key, refresh_token) {
        Ok(claims) if claims.subject() == user.email => {}
        Ok(_) => {
            warn!(user_id = %user.id, "Refresh token subject does not match its owner");
            return None;
        }
        Err(e) => {
            debug!(user_id = %user.id, error = %e, "Stored refresh token rejected, falling through");
            return None;
        }
    }

    match state.codec.create_access_token(&user.email, &key) {
        Ok(issued) => {
            info!(user_id = %user.id, "Re-issued access token from refresh token");
            Some(issued)
        }
        Err(e) => {
            warn!(user_id = %user.id, error = %e, "Failed to mint access token");
            None
        }
    }
}

/// State 4: resolve the caller from an access token.
async fn resolve_principal(state: &AppState, access_token: &str) -> Option<Principal> {
    // Unverified; only picks whose key to verify with.
    let subject = match TokenCodec::peek_subject(access_token) {
        Ok(subject) => subject,
        Err(e) => {
            debug!(error = %e, "Unreadable access token");
            return None;
        }
    };

    let user = state.store.read().await.find_by_email(&subject);
    let Some(user) = user else {
        debug!("Access token subject is not a known user");
        return None;
    };

    let key = state.signing_key_for(&user.password_hash);
    match state.codec.verify(TokenKind::Access, &key, access_token) {
        Ok(_) => Some(Principal::from(&user)),
        Err(e) => {
            debug!(user_id = %user.id, error = %e, "Access token rejected");
            None
        }
    }
}

fn reissued_response(access_header: &str, access: &IssuedToken) -> Response {
    let mut response = StatusCode::OK.into_response();
    match insert_token_header(response.headers_mut(), access_header, &access.token) {
        Ok(()) => response,
        Err(e) => e.into_response(),
    }
}
