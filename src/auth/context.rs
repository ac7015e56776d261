// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request-scoped security context.
//!
//! The authentication filter inserts exactly one [`SecurityContext`] into each
//! request's extensions. It travels with the request and is dropped with it,
//! on success and error paths alike, so nothing leaks between concurrent
//! requests. Handlers read it through the extractors in `extractor.rs`.

use super::claims::Principal;

/// Holder of the resolved caller for one request.
///
/// Created empty, populated at most once, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityContext {
    principal: Option<Principal>,
}

impl SecurityContext {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Populate the context. Only the first call takes effect; returns
    /// whether this call populated it.
    pub fn set(&mut self, principal: Principal) -> bool {
        if self.principal.is_some() {
            tracing::warn!(
                user_id = %principal.user_id,
                "Security context already populated, ignoring second principal"
            );
            return false;
        }
        self.principal = Some(principal);
        true
    }

    pub fn current(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn clear(&mut self) {
        self.principal = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }
}
