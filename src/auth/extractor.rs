// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the authenticated principal.
//!
//! The extractor never looks at token headers itself; it only reads the
//! [`SecurityContext`] the authentication filter left in the request.
//!
//! ```rust,ignore
//! async fn my_handler(Auth(principal): Auth) -> impl IntoResponse {
//!     // principal.email is the caller's identity
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, Principal, SecurityContext};

/// Extractor for authenticated callers.
///
/// Rejects with [`AuthError::Unauthenticated`] when the filter did not
/// populate the context (no token, bad token, or a bypassed route).
pub struct Auth(pub Principal);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .and_then(SecurityContext::current)
            .cloned()
            .map(Auth)
            .ok_or(AuthError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::models::Identity;
    use axum::http::Request;

    fn empty_parts() -> Parts {
        Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    fn parts_with(role: Role) -> Parts {
        let mut parts = empty_parts();
        let mut context = SecurityContext::empty();
        context.set(Principal {
            user_id: "user_123".to_string(),
            email: Identity::from("alice@example.com"),
            role,
        });
        parts.extensions.insert(context);
        parts
    }

    #[tokio::test]
    async fn auth_rejects_without_context() {
        let mut parts = empty_parts();
        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[tokio::test]
    async fn auth_rejects_empty_context() {
        let mut parts = empty_parts();
        parts.extensions.insert(SecurityContext::empty());
        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[tokio::test]
    async fn auth_reads_principal_from_context() {
        let mut parts = parts_with(Role::User);
        let Auth(principal) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(principal.user_id, "user_123");
        assert_eq!(principal.email.as_str(), "alice@example.com");
    }

    #[tokio::test]
    async fn auth_ignores_raw_authorization_header() {
        let mut parts = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer anything")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }
}
