// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Data Models
//!
//! This module defines the stored user record and the request and response
//! data structures used by the REST API. API types derive `ToSchema` for
//! OpenAPI documentation.
//!
//! ## Identity Type
//!
//! The [`Identity`] newtype wraps the user's email. It is the subject of every
//! token and the key into the user store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Role;

// =============================================================================
// Identity Type
// =============================================================================

/// Opaque principal reference (the user's email).
///
/// # Example
///
/// ```rust,ignore
/// let identity = Identity::from("alice@example.com");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity(pub String);

impl Identity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Identity(value)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Identity(value.to_string())
    }
}

impl From<Identity> for String {
    fn from(value: Identity) -> Self {
        value.0
    }
}

// =============================================================================
// Stored Records
// =============================================================================

/// A registered account.
///
/// `password_hash` doubles as the per-user half of the token signing key, see
/// [`crate::auth::derive_signing_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user identifier (UUID)
    pub id: String,
    pub email: Identity,
    pub nick_name: String,
    pub name: String,
    pub age: u8,
    pub password_hash: String,
    pub role: Role,
    /// Most recently issued refresh token, if any
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignUpRequest {
    pub email: String,
    pub nick_name: String,
    pub password: String,
    pub name: String,
    pub age: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Partial profile update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub nick_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdatePasswordRequest {
    /// Current password, re-checked before the change
    pub check_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WithdrawRequest {
    pub password: String,
}

// =============================================================================
// Responses
// =============================================================================

/// Public view of an account. Never includes credentials or tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    pub user_id: String,
    pub email: String,
    pub nick_name: String,
    pub name: String,
    pub age: u8,
    pub role: Role,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            email: user.email.to_string(),
            nick_name: user.nick_name.clone(),
            name: user.name.clone(),
            age: user.age,
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    /// Access token expiration (Unix timestamp)
    pub access_expires_at: i64,
    /// Refresh token expiration (Unix timestamp)
    pub refresh_expires_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: "user_1".to_string(),
            email: Identity::from("alice@example.com"),
            nick_name: "alice".to_string(),
            name: "Alice".to_string(),
            age: 30,
            password_hash: "$2b$04$secret".to_string(),
            role: Role::User,
            refresh_token: Some("refresh".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn identity_serializes_as_plain_string() {
        let json = serde_json::to_string(&Identity::from("alice@example.com")).unwrap();
        assert_eq!(json, r#""alice@example.com""#);
    }

    #[test]
    fn user_info_omits_credentials() {
        let info = UserInfo::from(&sample_user());
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["email"], "alice@example.com");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("refresh_token").is_none());
    }

    #[test]
    fn update_request_fields_default_to_none() {
        let request: UpdateUserRequest = serde_json::from_str(r#"{"age": 31}"#).unwrap();
        assert_eq!(request.age, Some(31));
        assert!(request.nick_name.is_none());
        assert!(request.name.is_none());
    }
}
