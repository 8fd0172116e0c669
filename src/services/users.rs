//! User directory: registration, lookup, profile updates.
//!
//! Accounts are keyed by username and never deleted. Password hashing lives
//! with the auth layer; the directory stores whatever hash it is handed.

use tracing::info;
use validator::Validate;

use crate::domain::aggregates::{NewUser, User, UserPatch};
use crate::storage::{Store, USERS_FILE};
use crate::{Result, ShopError};

#[derive(Clone, Debug)]
pub struct Directory {
    store: Store,
}

impl Directory {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn register(&self, new_user: NewUser) -> Result<()> {
        new_user
            .validate()
            .map_err(|e| ShopError::InvalidInput(e.to_string()))?;
        let mut users: Vec<User> = self.store.load_collection(USERS_FILE)?;
        if users.iter().any(|u| u.username == new_user.username) {
            return Err(ShopError::UsernameTaken(new_user.username));
        }
        let user = User::from(new_user);
        info!(username = %user.username, role = ?user.role, "user registered");
        users.push(user);
        self.store.save_collection(USERS_FILE, &users)?;
        Ok(())
    }

    pub fn get(&self, username: &str) -> Result<Option<User>> {
        let users: Vec<User> = self.store.load_collection(USERS_FILE)?;
        Ok(users.into_iter().find(|u| u.username == username))
    }

    /// Applies the populated patch fields to an existing account.
    pub fn update(&self, username: &str, patch: UserPatch) -> Result<()> {
        let mut users: Vec<User> = self.store.load_collection(USERS_FILE)?;
        let user = users
            .iter_mut()
            .find(|u| u.username == username)
            .ok_or_else(|| ShopError::UserNotFound(username.to_string()))?;
        user.apply(patch);
        self.store.save_collection(USERS_FILE, &users)?;
        info!(username, "user profile updated");
        Ok(())
    }
}
