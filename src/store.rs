// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory user store.
//!
//! Holds accounts keyed by [`Identity`] and the refresh-token binding: a
//! reverse index from the latest refresh token of each identity back to that
//! identity. The store lives behind `Arc<RwLock<_>>` in [`crate::state::AppState`],
//! which serializes writes; the last write wins.
//!
//! ## Refresh Token Invariant
//!
//! At most one refresh token per identity is ever bound. Binding a new one
//! drops the previous token from the index, so a superseded token fails
//! [`InMemoryStore::find_by_refresh_token`]. Clearing the binding or deleting
//! the user removes it as well.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::auth::Role;
use crate::models::{Identity, UpdateUserRequest, User};

/// Errors raised by store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("An account with this nickname already exists")]
    NickNameTaken,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Fields needed to create an account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Identity,
    pub nick_name: String,
    pub name: String,
    pub age: u8,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Default)]
pub struct InMemoryStore {
    users: HashMap<Identity, User>,
    refresh_index: HashMap<String, Identity>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&mut self, new_user: NewUser) -> StoreResult<User> {
        if self.users.contains_key(&new_user.email) {
            return Err(StoreError::EmailTaken);
        }
        if self.find_by_nick_name(&new_user.nick_name).is_some() {
            return Err(StoreError::NickNameTaken);
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: new_user.email,
            nick_name: new_user.nick_name,
            name: new_user.name,
            age: new_user.age,
            password_hash: new_user.password_hash,
            role: new_user.role,
            refresh_token: None,
            created_at: Utc::now(),
        };
        self.users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    pub fn find_by_email(&self, email: &Identity) -> Option<User> {
        self.users.get(email).cloned()
    }

    pub fn find_by_id(&self, user_id: &str) -> Option<User> {
        self.users.values().find(|user| user.id == user_id).cloned()
    }

    pub fn find_by_nick_name(&self, nick_name: &str) -> Option<User> {
        self.users
            .values()
            .find(|user| user.nick_name == nick_name)
            .cloned()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Apply a partial profile update.
    pub fn update_profile(
        &mut self,
        email: &Identity,
        update: UpdateUserRequest,
    ) -> StoreResult<User> {
        if let Some(nick_name) = &update.nick_name {
            let taken = self
                .users
                .values()
                .any(|user| &user.nick_name == nick_name && &user.email != email);
            if taken {
                return Err(StoreError::NickNameTaken);
            }
        }

        let user = self.user_mut(email)?;
        if let Some(nick_name) = update.nick_name {
            user.nick_name = nick_name;
        }
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(age) = update.age {
            user.age = age;
        }
        Ok(user.clone())
    }

    /// Replace the stored credential hash.
    ///
    /// This also changes the user's signing key, so every previously issued
    /// token stops verifying. The refresh-token binding is cleared too.
    pub fn update_password_hash(&mut self, email: &Identity, password_hash: String) -> StoreResult<()> {
        self.user_mut(email)?.password_hash = password_hash;
        self.clear_refresh_token(email)
    }

    /// Remove an account and its refresh-token binding.
    pub fn delete_user(&mut self, email: &Identity) -> StoreResult<User> {
        let user = self
            .users
            .remove(email)
            .ok_or_else(|| StoreError::NotFound(email.to_string()))?;
        if let Some(token) = &user.refresh_token {
            self.refresh_index.remove(token);
        }
        Ok(user)
    }

    // -------------------------------------------------------------------------
    // Refresh token binding
    // -------------------------------------------------------------------------

    /// Bind `token` as the only valid refresh token for `email`.
    pub fn set_refresh_token(&mut self, email: &Identity, token: impl Into<String>) -> StoreResult<()> {
        let token = token.into();
        let user = self
            .users
            .get_mut(email)
            .ok_or_else(|| StoreError::NotFound(email.to_string()))?;

        if let Some(previous) = user.refresh_token.replace(token.clone()) {
            self.refresh_index.remove(&previous);
        }
        self.refresh_index.insert(token, email.clone());
        Ok(())
    }

    /// Drop the refresh-token binding for `email`, if any.
    pub fn clear_refresh_token(&mut self, email: &Identity) -> StoreResult<()> {
        let user = self.user_mut(email)?;
        if let Some(previous) = user.refresh_token.take() {
            self.refresh_index.remove(&previous);
        }
        Ok(())
    }

    /// Reverse lookup: which user is `token` currently bound to.
    ///
    /// Pure association lookup; expiry and signature are the caller's job.
    pub fn find_by_refresh_token(&self, token: &str) -> Option<User> {
        self.refresh_index
            .get(token)
            .and_then(|email| self.users.get(email))
            .cloned()
    }

    fn user_mut(&mut self, email: &Identity) -> StoreResult<&mut User> {
        self.users
            .get_mut(email)
            .ok_or_else(|| StoreError::NotFound(email.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str, nick_name: &str) -> NewUser {
        NewUser {
            email: Identity::from(email),
            nick_name: nick_name.to_string(),
            name: "Test".to_string(),
            age: 22,
            password_hash: "hash".to_string(),
            role: Role::User,
        }
    }

    fn store_with_alice() -> (InMemoryStore, Identity) {
        let mut store = InMemoryStore::new();
        let user = store.insert_user(new_user("alice@example.com", "alice")).unwrap();
        (store, user.email)
    }

    #[test]
    fn insert_and_find() {
        let (store, alice) = store_with_alice();
        let user = store.find_by_email(&alice).unwrap();
        assert_eq!(user.nick_name, "alice");
        assert_eq!(store.find_by_id(&user.id).unwrap().email, alice);
        assert_eq!(store.find_by_nick_name("alice").unwrap().email, alice);
        assert!(user.refresh_token.is_none());
    }

    #[test]
    fn duplicate_email_and_nickname_rejected() {
        let (mut store, _) = store_with_alice();
        assert_eq!(
            store.insert_user(new_user("alice@example.com", "other")),
            Err(StoreError::EmailTaken)
        );
        assert_eq!(
            store.insert_user(new_user("bob@example.com", "alice")),
            Err(StoreError::NickNameTaken)
        );
        assert_eq!(store.user_count(), 1);
    }

    #[test]
    fn refresh_token_overwrite_supersedes_previous() {
        let (mut store, alice) = store_with_alice();
        store.set_refresh_token(&alice, "t1").unwrap();
        store.set_refresh_token(&alice, "t2").unwrap();

        assert_eq!(store.find_by_refresh_token("t2").unwrap().email, alice);
        assert!(store.find_by_refresh_token("t1").is_none());
        assert_eq!(
            store.find_by_email(&alice).unwrap().refresh_token.as_deref(),
            Some("t2")
        );
    }

    #[test]
    fn clear_refresh_token_removes_binding() {
        let (mut store, alice) = store_with_alice();
        store.set_refresh_token(&alice, "t1").unwrap();
        store.clear_refresh_token(&alice).unwrap();

        assert!(store.find_by_refresh_token("t1").is_none());
        assert!(store.find_by_email(&alice).unwrap().refresh_token.is_none());
    }

    #[test]
    fn delete_user_removes_binding() {
        let (mut store, alice) = store_with_alice();
        store.set_refresh_token(&alice, "t1").unwrap();
        store.delete_user(&alice).unwrap();

        assert!(store.find_by_refresh_token("t1").is_none());
        assert!(store.find_by_email(&alice).is_none());
    }

    #[test]
    fn set_refresh_token_for_unknown_user_fails() {
        let mut store = InMemoryStore::new();
        let ghost = Identity::from("ghost@example.com");
        assert_eq!(
            store.set_refresh_token(&ghost, "t1"),
            Err(StoreError::NotFound("ghost@example.com".to_string()))
        );
        assert!(store.find_by_refresh_token("t1").is_none());
    }

    #[test]
    fn password_change_clears_binding() {
        let (mut store, alice) = store_with_alice();
        store.set_refresh_token(&alice, "t1").unwrap();
        store.update_password_hash(&alice, "new-hash".to_string()).unwrap();

        let user = store.find_by_email(&alice).unwrap();
        assert_eq!(user.password_hash, "new-hash");
        assert!(store.find_by_refresh_token("t1").is_none());
    }

    #[test]
    fn update_profile_applies_present_fields() {
        let (mut store, alice) = store_with_alice();
        let user = store
            .update_profile(
                &alice,
                UpdateUserRequest {
                    nick_name: Some("ally".to_string()),
                    name: None,
                    age: Some(23),
                },
            )
            .unwrap();
        assert_eq!(user.nick_name, "ally");
        assert_eq!(user.name, "Test");
        assert_eq!(user.age, 23);
    }

    #[test]
    fn update_profile_rejects_taken_nickname() {
        let (mut store, alice) = store_with_alice();
        store.insert_user(new_user("bob@example.com", "bob")).unwrap();
        let result = store.update_profile(
            &alice,
            UpdateUserRequest {
                nick_name: Some("bob".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(result, Err(StoreError::NickNameTaken));
    }

    #[test]
    fn keeping_own_nickname_is_allowed() {
        let (mut store, alice) = store_with_alice();
        let result = store.update_profile(
            &alice,
            UpdateUserRequest {
                nick_name: Some("alice".to_string()),
                ..Default::default()
            },
        );
        assert!(result.is_ok());
    }
}
