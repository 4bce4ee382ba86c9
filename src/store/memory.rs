//! In-process store.
//!
//! All five tables live behind a single mutex, so every operation (guarded
//! deletes included) observes one consistent snapshot. Nothing survives a
//! restart.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::model::{
    Character, Favorite, NewCharacter, NewFavorite, NewPlanet, NewUser, NewVehicle, Planet, RecordId, User,
    UserChanges, Vehicle,
};
use crate::store::{Store, StoreError, StoreResult};

/// One table: rows keyed by id, ids never reused.
struct Table<T> {
    rows: BTreeMap<RecordId, T>,
    last_id: RecordId,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }

    fn insert(&mut self, build: impl FnOnce(RecordId) -> T) -> T {
        self.last_id += 1;
        let row = build(self.last_id);
        self.rows.insert(self.last_id, row.clone());
        row
    }

    fn get(&self, id: RecordId) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn contains(&self, id: RecordId) -> bool {
        self.rows.contains_key(&id)
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    fn any(&self, pred: impl Fn(&T) -> bool) -> bool {
        self.rows.values().any(pred)
    }
}

struct Tables {
    users: Table<User>,
    planets: Table<Planet>,
    vehicles: Table<Vehicle>,
    characters: Table<Character>,
    favorites: Table<Favorite>,
}

/// Store backed by in-memory maps.
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables {
                users: Table::new(),
                planets: Table::new(),
                vehicles: Table::new(),
                characters: Table::new(),
                favorites: Table::new(),
            }),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn unique_violation(column: &str) -> StoreError {
    StoreError::Constraint(format!("UNIQUE constraint failed: {column}"))
}

fn foreign_key_violation() -> StoreError {
    StoreError::Constraint("FOREIGN KEY constraint failed".to_string())
}

impl Store for MemoryStore {
    fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.lock()?.users.all())
    }

    fn get_user(&self, id: RecordId) -> StoreResult<Option<User>> {
        Ok(self.lock()?.users.get(id))
    }

    fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.lock()?;
        Ok(tables.users.rows.values().find(|u| u.username == username).cloned())
    }

    fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        user.check_columns()?;
        let mut tables = self.lock()?;
        if tables.users.any(|u| u.email == user.email) {
            return Err(unique_violation("user.email"));
        }
        if tables.users.any(|u| u.username == user.username) {
            return Err(unique_violation("user.username"));
        }
        Ok(tables.users.insert(|id| user.into_record(id)))
    }

    fn update_user(&self, id: RecordId, changes: &UserChanges) -> StoreResult<User> {
        changes.check_columns()?;
        let mut tables = self.lock()?;
        if !tables.users.contains(id) {
            return Err(StoreError::missing::<User>(id));
        }
        if let Some(username) = &changes.username {
            if tables.users.any(|u| u.id != id && &u.username == username) {
                return Err(unique_violation("user.username"));
            }
        }
        let user = tables
            .users
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::missing::<User>(id))?;
        changes.apply(user);
        Ok(user.clone())
    }

    fn delete_user(&self, id: RecordId) -> StoreResult<User> {
        let mut tables = self.lock()?;
        let user = tables
            .users
            .rows
            .remove(&id)
            .ok_or_else(|| StoreError::missing::<User>(id))?;
        tables.favorites.rows.retain(|_, f| f.user != id);
        Ok(user)
    }

    fn list_planets(&self) -> StoreResult<Vec<Planet>> {
        Ok(self.lock()?.planets.all())
    }

    fn get_planet(&self, id: RecordId) -> StoreResult<Option<Planet>> {
        Ok(self.lock()?.planets.get(id))
    }

    fn insert_planet(&self, planet: NewPlanet) -> StoreResult<Planet> {
        planet.check_columns()?;
        let mut tables = self.lock()?;
        if tables.planets.any(|p| p.name == planet.name) {
            return Err(unique_violation("planet.name"));
        }
        Ok(tables.planets.insert(|id| planet.into_record(id)))
    }

    fn delete_planet(&self, id: RecordId) -> StoreResult<Planet> {
        let mut tables = self.lock()?;
        if !tables.planets.contains(id) {
            return Err(StoreError::missing::<Planet>(id));
        }
        if tables.characters.any(|c| c.planet == id) || tables.favorites.any(|f| f.planet == id) {
            return Err(StoreError::referenced::<Planet>(id));
        }
        tables
            .planets
            .rows
            .remove(&id)
            .ok_or_else(|| StoreError::missing::<Planet>(id))
    }

    fn list_vehicles(&self) -> StoreResult<Vec<Vehicle>> {
        Ok(self.lock()?.vehicles.all())
    }

    fn get_vehicle(&self, id: RecordId) -> StoreResult<Option<Vehicle>> {
        Ok(self.lock()?.vehicles.get(id))
    }

    fn insert_vehicle(&self, vehicle: NewVehicle) -> StoreResult<Vehicle> {
        vehicle.check_columns()?;
        let mut tables = self.lock()?;
        if tables.vehicles.any(|v| v.name == vehicle.name) {
            return Err(unique_violation("vehicle.name"));
        }
        Ok(tables.vehicles.insert(|id| vehicle.into_record(id)))
    }

    fn delete_vehicle(&self, id: RecordId) -> StoreResult<Vehicle> {
        let mut tables = self.lock()?;
        if !tables.vehicles.contains(id) {
            return Err(StoreError::missing::<Vehicle>(id));
        }
        if tables.characters.any(|c| c.vehicle == id) || tables.favorites.any(|f| f.vehicle == id) {
            return Err(StoreError::referenced::<Vehicle>(id));
        }
        tables
            .vehicles
            .rows
            .remove(&id)
            .ok_or_else(|| StoreError::missing::<Vehicle>(id))
    }

    fn list_characters(&self) -> StoreResult<Vec<Character>> {
        Ok(self.lock()?.characters.all())
    }

    fn get_character(&self, id: RecordId) -> StoreResult<Option<Character>> {
        Ok(self.lock()?.characters.get(id))
    }

    fn insert_character(&self, character: NewCharacter) -> StoreResult<Character> {
        character.check_columns()?;
        let mut tables = self.lock()?;
        if !tables.planets.contains(character.planet) || !tables.vehicles.contains(character.vehicle) {
            return Err(foreign_key_violation());
        }
        if tables.characters.any(|c| c.name == character.name) {
            return Err(unique_violation("character.name"));
        }
        Ok(tables.characters.insert(|id| character.into_record(id)))
    }

    fn delete_character(&self, id: RecordId) -> StoreResult<Character> {
        let mut tables = self.lock()?;
        if !tables.characters.contains(id) {
            return Err(StoreError::missing::<Character>(id));
        }
        if tables.favorites.any(|f| f.character == id) {
            return Err(StoreError::referenced::<Character>(id));
        }
        tables
            .characters
            .rows
            .remove(&id)
            .ok_or_else(|| StoreError::missing::<Character>(id))
    }

    fn list_favorites(&self) -> StoreResult<Vec<Favorite>> {
        Ok(self.lock()?.favorites.all())
    }

    fn get_favorite(&self, id: RecordId) -> StoreResult<Option<Favorite>> {
        Ok(self.lock()?.favorites.get(id))
    }

    fn insert_favorite(&self, favorite: NewFavorite) -> StoreResult<Favorite> {
        let mut tables = self.lock()?;
        let resolved = tables.users.contains(favorite.user)
            && tables.characters.contains(favorite.character)
            && tables.planets.contains(favorite.planet)
            && tables.vehicles.contains(favorite.vehicle);
        if !resolved {
            return Err(foreign_key_violation());
        }
        Ok(tables.favorites.insert(|id| favorite.into_record(id)))
    }

    fn delete_favorite(&self, id: RecordId) -> StoreResult<Favorite> {
        self.lock()?
            .favorites
            .rows
            .remove(&id)
            .ok_or_else(|| StoreError::missing::<Favorite>(id))
    }
}
