// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless JWT access tokens paired with server-bound refresh tokens.
//!
//! ## Auth Flow
//!
//! 1. Client posts credentials to `/login`
//! 2. Server verifies the password hash and responds with:
//!    - `Authorization: <access token>` (short-lived, carries `email`)
//!    - `Authorization-refresh: <refresh token>` (long-lived, bound to the user)
//! 3. Client sends `Authorization: Bearer <access token>` on each request
//! 4. When the access token expires, the client sends
//!    `Authorization-refresh: Bearer <refresh token>` and receives a new
//!    access token header; it then retries the original request
//!
//! ## Security
//!
//! - Tokens are HS512, signed with a key derived from the server secret and
//!   the user's password hash, so a password change revokes every token
//! - Only the most recently issued refresh token per user is honored
//! - Tokens and passwords are never logged

pub mod claims;
pub mod clock;
pub mod codec;
pub mod context;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod password;
pub mod roles;
pub mod session;
pub mod signing;

pub use claims::{Claims, Principal, TokenKind};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{IssuedToken, TokenCodec, TokenError, TokenPair};
pub use context::SecurityContext;
pub use error::AuthError;
pub use extractor::Auth;
pub use filter::authenticate;
pub use password::{BcryptVerifier, CredentialVerifier};
pub use roles::Role;
pub use signing::{derive_signing_key, SigningKey};
