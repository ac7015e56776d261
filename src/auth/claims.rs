// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims, token kinds and the authenticated principal.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;
use crate::models::{Identity, User};

/// Claims carried by every token this service mints.
///
/// Access tokens repeat the identity in `email`; refresh tokens leave it out,
/// so the two kinds can be told apart by shape alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (the user's identity)
    pub sub: String,
    /// Issuer (always [`super::codec::ISSUER`])
    pub iss: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Redundant identity copy, access tokens only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Claims {
    pub fn subject(&self) -> Identity {
        Identity::from(self.sub.as_str())
    }

    pub fn kind(&self) -> TokenKind {
        if self.email.is_some() {
            TokenKind::Access
        } else {
            TokenKind::Refresh
        }
    }
}

/// The two kinds of token this service issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived, presented on every request
    Access,
    /// Long-lived, only exchanged for a new access token
    Refresh,
}

/// The authenticated caller, resolved from the user store.
///
/// This is the type downstream handlers receive through the security context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    /// Stable user ID
    pub user_id: String,
    /// Identity the caller authenticated as
    #[schema(value_type = String)]
    pub email: Identity,
    /// Coarse role for authorization
    pub role: Role,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}
