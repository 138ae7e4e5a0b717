//! User entity.

use crate::UserId;
use serde::{Deserialize, Serialize};

/// A registered user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Database-assigned identifier.
    pub id: UserId,

    /// Unique email address.
    pub email: String,

    /// Optional display name.
    pub full_name: Option<String>,

    /// Whether the account is active.
    pub is_active: bool,
}

/// Fields for inserting a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub full_name: Option<String>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub is_active: Option<bool>,
}

impl UserChanges {
    /// Returns true when no column would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none() && self.full_name.is_none() && self.is_active.is_none()
    }

    /// Applies the changes to an in-memory record.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(email) = &self.email {
            user.email.clone_from(email);
        }
        if let Some(full_name) = &self.full_name {
            user.full_name = Some(full_name.clone());
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
    }
}
