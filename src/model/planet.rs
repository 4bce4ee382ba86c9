//! Planets.

use serde_json::{json, Value};

use super::{check_len, ColumnViolation, Entity, RecordId};

pub const NAME_MAX: usize = 42;
pub const WEATHER_MAX: usize = 42;

/// A stored planet.
#[derive(Debug, Clone, PartialEq)]
pub struct Planet {
    pub id: RecordId,
    pub name: String,
    pub density: f64,
    pub diameter: f64,
    pub orbital_period: i64,
    pub population: i64,
    pub weather: String,
}

/// Fields for a planet that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlanet {
    pub name: String,
    pub density: f64,
    pub diameter: f64,
    pub orbital_period: i64,
    pub population: i64,
    pub weather: String,
}

impl NewPlanet {
    pub fn check_columns(&self) -> Result<(), ColumnViolation> {
        check_len(Planet::NAME, "name", &self.name, NAME_MAX)?;
        check_len(Planet::NAME, "weather", &self.weather, WEATHER_MAX)
    }

    pub fn into_record(self, id: RecordId) -> Planet {
        Planet {
            id,
            name: self.name,
            density: self.density,
            diameter: self.diameter,
            orbital_period: self.orbital_period,
            population: self.population,
            weather: self.weather,
        }
    }
}

impl Entity for Planet {
    const NAME: &'static str = "Planet";

    fn serialize(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "density": self.density,
            "diameter": self.diameter,
            "orbital_period": self.orbital_period,
            "population": self.population,
            "weather": self.weather,
        })
    }
}
