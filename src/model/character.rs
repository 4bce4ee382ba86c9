//! Characters. Each one belongs to a home planet and a vehicle.

use serde_json::{json, Value};

use super::{check_len, ColumnViolation, Entity, RecordId};

pub const NAME_MAX: usize = 42;

/// A stored character.
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub id: RecordId,
    pub name: String,
    pub height: f64,
    pub weight: f64,
    pub planet: RecordId,
    pub vehicle: RecordId,
}

/// Fields for a character that has not been stored yet.
///
/// `planet` and `vehicle` must already be resolved to existing rows.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCharacter {
    pub name: String,
    pub height: f64,
    pub weight: f64,
    pub planet: RecordId,
    pub vehicle: RecordId,
}

impl NewCharacter {
    pub fn check_columns(&self) -> Result<(), ColumnViolation> {
        check_len(Character::NAME, "name", &self.name, NAME_MAX)
    }

    pub fn into_record(self, id: RecordId) -> Character {
        Character {
            id,
            name: self.name,
            height: self.height,
            weight: self.weight,
            planet: self.planet,
            vehicle: self.vehicle,
        }
    }
}

impl Entity for Character {
    const NAME: &'static str = "Character";

    fn serialize(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "height": self.height,
            "weight": self.weight,
            "planet": self.planet,
            "vehicle": self.vehicle,
        })
    }
}
