//! User Aggregate

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

/// Directory record. `password` holds whatever hash the auth layer handed
/// in at registration; this crate never hashes or verifies it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Registration input. Usernames are letters only, at most 20 characters.
#[derive(Clone, Debug, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 20), custom = "alphabetic")]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub role: Role,
}

fn alphabetic(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::new("alphabetic"))
    }
}

impl From<NewUser> for User {
    fn from(new_user: NewUser) -> Self {
        Self {
            username: new_user.username,
            email: new_user.email,
            password: new_user.password,
            role: new_user.role,
            phone_number: None,
            address: None,
        }
    }
}

/// Profile edit; only populated fields are applied. Username and role stay
/// fixed after registration.
#[derive(Clone, Debug, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

impl User {
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(password) = patch.password {
            self.password = password;
        }
        if let Some(phone_number) = patch.phone_number {
            self.phone_number = Some(phone_number);
        }
        if let Some(address) = patch.address {
            self.address = Some(address);
        }
    }
}
