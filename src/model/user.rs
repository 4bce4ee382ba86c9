//! User accounts.

use serde_json::{json, Value};

use super::{check_len, ColumnViolation, Entity, RecordId};

pub const EMAIL_MAX: usize = 120;
pub const USERNAME_MAX: usize = 12;
pub const PASSWORD_MAX: usize = 80;

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: RecordId,
    pub email: String,
    pub username: String,
    pub password: String,
    pub is_active: bool,
}

/// Fields for a user that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl NewUser {
    pub fn new(email: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn check_columns(&self) -> Result<(), ColumnViolation> {
        check_len(User::NAME, "email", &self.email, EMAIL_MAX)?;
        check_len(User::NAME, "username", &self.username, USERNAME_MAX)?;
        check_len(User::NAME, "password", &self.password, PASSWORD_MAX)
    }

    /// Build the stored row. New accounts are always active.
    pub fn into_record(self, id: RecordId) -> User {
        User {
            id,
            email: self.email,
            username: self.username,
            password: self.password,
            is_active: true,
        }
    }
}

/// Partial update of a user. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl UserChanges {
    pub fn check_columns(&self) -> Result<(), ColumnViolation> {
        if let Some(username) = &self.username {
            check_len(User::NAME, "username", username, USERNAME_MAX)?;
        }
        if let Some(password) = &self.password {
            check_len(User::NAME, "password", password, PASSWORD_MAX)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }

    pub fn apply(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(password) = &self.password {
            user.password = password.clone();
        }
    }
}

impl Entity for User {
    const NAME: &'static str = "User";

    fn serialize(&self) -> Value {
        // password stays server-side
        json!({
            "id": self.id,
            "email": self.email,
            "username": self.username,
        })
    }
}
