// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::codec::TokenError;

/// Authentication error type.
///
/// Token failures inside the filter never surface as responses; they are
/// recovered there and the request proceeds unauthenticated. These variants
/// are returned by login, by sensitive mutations and by the extractors.
#[derive(Debug)]
pub enum AuthError {
    /// Token is structurally invalid or its signature does not verify
    MalformedToken,
    /// Token has expired
    TokenExpired,
    /// Valid token whose subject no longer exists
    UnknownIdentity,
    /// Login or password re-check failed. Deliberately does not say which part was wrong.
    CredentialMismatch,
    /// Route requires an authenticated principal and none was resolved
    Unauthenticated,
    /// Insufficient permissions
    InsufficientPermissions,
    /// Internal error
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MalformedToken => "malformed_token",
            AuthError::TokenExpired => "token_expired",
            AuthError::UnknownIdentity => "unknown_identity",
            AuthError::CredentialMismatch => "invalid_credentials",
            AuthError::Unauthenticated => "unauthenticated",
            AuthError::InsufficientPermissions => "insufficient_permissions",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MalformedToken
            | AuthError::TokenExpired
            | AuthError::UnknownIdentity
            | AuthError::CredentialMismatch
            | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MalformedToken => write!(f, "Token is malformed"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::UnknownIdentity => write!(f, "Token subject is not a known user"),
            AuthError::CredentialMismatch => write!(f, "Invalid email or password"),
            AuthError::Unauthenticated => write!(f, "Authentication is required"),
            AuthError::InsufficientPermissions => {
                write!(f, "Insufficient permissions for this operation")
            }
            AuthError::InternalError(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed => AuthError::MalformedToken,
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Encoding(msg) => AuthError::InternalError(msg),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
