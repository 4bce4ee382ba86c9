//! Favorites: one user linked to a character, a planet and a vehicle at once.

use serde_json::{json, Value};

use super::{Entity, RecordId};

/// A stored favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Favorite {
    pub id: RecordId,
    pub user: RecordId,
    pub character: RecordId,
    pub planet: RecordId,
    pub vehicle: RecordId,
}

/// Fields for a favorite that has not been stored yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewFavorite {
    pub user: RecordId,
    pub character: RecordId,
    pub planet: RecordId,
    pub vehicle: RecordId,
}

impl NewFavorite {
    pub fn into_record(self, id: RecordId) -> Favorite {
        Favorite {
            id,
            user: self.user,
            character: self.character,
            planet: self.planet,
            vehicle: self.vehicle,
        }
    }
}

impl Entity for Favorite {
    const NAME: &'static str = "Favorite";

    fn serialize(&self) -> Value {
        json!({
            "id": self.id,
            "user": self.user,
            "character": self.character,
            "planet": self.planet,
            "vehicle": self.vehicle,
        })
    }
}
