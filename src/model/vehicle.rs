//! Vehicles.

use serde_json::{json, Value};

use super::{check_len, ColumnViolation, Entity, RecordId};

pub const NAME_MAX: usize = 42;
pub const MODEL_MAX: usize = 15;

/// A stored vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: RecordId,
    pub name: String,
    pub crew: i64,
    pub model: String,
    pub cargo_capacity: f64,
    pub passengers: i64,
}

/// Fields for a vehicle that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVehicle {
    pub name: String,
    pub crew: i64,
    pub model: String,
    pub cargo_capacity: f64,
    pub passengers: i64,
}

impl NewVehicle {
    pub fn check_columns(&self) -> Result<(), ColumnViolation> {
        check_len(Vehicle::NAME, "name", &self.name, NAME_MAX)?;
        check_len(Vehicle::NAME, "model", &self.model, MODEL_MAX)
    }

    pub fn into_record(self, id: RecordId) -> Vehicle {
        Vehicle {
            id,
            name: self.name,
            crew: self.crew,
            model: self.model,
            cargo_capacity: self.cargo_capacity,
            passengers: self.passengers,
        }
    }
}

impl Entity for Vehicle {
    const NAME: &'static str = "Vehicle";

    fn serialize(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "crew": self.crew,
            "model": self.model,
            "cargo_capacity": self.cargo_capacity,
            "passengers": self.passengers,
        })
    }
}
