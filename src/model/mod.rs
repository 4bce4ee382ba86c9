//! Record shapes for the persisted entities.
//!
//! # Entities
//! ```text
//! User ◀──────────────┐
//! Planet ◀──┬─────────┤
//! Vehicle ◀─┤         ├── Favorite
//!           └─ Character ◀┘
//! ```
//!
//! # Design Decisions
//! - Entities are plain data; all persistence lives behind `store::Store`
//! - `serialize()` flattens foreign keys to raw ids, never nested objects
//! - Column limits mirror the SQL schema so every store rejects the same rows

pub mod character;
pub mod favorite;
pub mod planet;
pub mod user;
pub mod vehicle;

pub use character::{Character, NewCharacter};
pub use favorite::{Favorite, NewFavorite};
pub use planet::{NewPlanet, Planet};
pub use user::{NewUser, User, UserChanges};
pub use vehicle::{NewVehicle, Vehicle};

use serde_json::Value;
use thiserror::Error;

/// Surrogate key assigned by the store on insert.
pub type RecordId = i64;

/// A persisted record type.
pub trait Entity {
    /// Display name used in messages, e.g. "Planet".
    const NAME: &'static str;

    /// Wire projection of the row.
    ///
    /// Secrets are never included and foreign keys are emitted as raw ids.
    fn serialize(&self) -> Value;
}

/// A text value longer than its column allows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{entity}.{column} exceeds {max} characters")]
pub struct ColumnViolation {
    pub entity: &'static str,
    pub column: &'static str,
    pub max: usize,
}

/// Check a text column against its limit.
pub(crate) fn check_len(
    entity: &'static str,
    column: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ColumnViolation> {
    if value.chars().count() > max {
        return Err(ColumnViolation { entity, column, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_len_counts_chars() {
        assert!(check_len("User", "username", "ñandúñandú12", 12).is_ok());
        let err = check_len("User", "username", "thirteen_char", 12).unwrap_err();
        assert_eq!(err.to_string(), "User.username exceeds 12 characters");
    }
}
