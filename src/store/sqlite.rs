//! SQLite-backed store.
//!
//! # Responsibilities
//! - Create the schema on open (`CREATE TABLE IF NOT EXISTS`)
//! - Map rows to entities and entities to statements
//! - Run guarded deletes inside one transaction
//!
//! # Design Decisions
//! - One connection behind a mutex; statements are short and synchronous
//! - `foreign_keys` is switched on so the schema backs up the guards
//! - Column limits are `CHECK` constraints, uniqueness is `UNIQUE`

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::model::{
    Character, Entity, Favorite, NewCharacter, NewFavorite, NewPlanet, NewUser, NewVehicle, Planet, RecordId, User,
    UserChanges, Vehicle,
};
use crate::store::{Store, StoreError, StoreResult};

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS user (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        email     TEXT    NOT NULL UNIQUE CHECK (length(email) <= 120),
        username  TEXT    NOT NULL UNIQUE CHECK (length(username) <= 12),
        password  TEXT    NOT NULL CHECK (length(password) <= 80),
        is_active INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS planet (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        name           TEXT    NOT NULL UNIQUE CHECK (length(name) <= 42),
        density        REAL    NOT NULL,
        diameter       REAL    NOT NULL,
        orbital_period INTEGER NOT NULL,
        population     INTEGER NOT NULL,
        weather        TEXT    NOT NULL CHECK (length(weather) <= 42)
    );

    CREATE TABLE IF NOT EXISTS vehicle (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        name           TEXT    NOT NULL UNIQUE CHECK (length(name) <= 42),
        crew           INTEGER NOT NULL,
        model          TEXT    NOT NULL CHECK (length(model) <= 15),
        cargo_capacity REAL    NOT NULL,
        passengers     INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS character (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        name             TEXT    NOT NULL UNIQUE CHECK (length(name) <= 42),
        height           REAL    NOT NULL,
        weight           REAL    NOT NULL,
        planet_origin_id INTEGER NOT NULL REFERENCES planet (id),
        vehicle_id       INTEGER NOT NULL REFERENCES vehicle (id)
    );

    CREATE TABLE IF NOT EXISTS favorite (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id      INTEGER NOT NULL REFERENCES user (id) ON DELETE CASCADE,
        character_id INTEGER NOT NULL REFERENCES character (id),
        planet_id    INTEGER NOT NULL REFERENCES planet (id),
        vehicle_id   INTEGER NOT NULL REFERENCES vehicle (id)
    );
";

const USER_COLUMNS: &str = "id, email, username, password, is_active";
const PLANET_COLUMNS: &str = "id, name, density, diameter, orbital_period, population, weather";
const VEHICLE_COLUMNS: &str = "id, name, crew, model, cargo_capacity, passengers";
const CHARACTER_COLUMNS: &str = "id, name, height, weight, planet_origin_id, vehicle_id";
const FAVORITE_COLUMNS: &str = "id, user_id, character_id, planet_id, vehicle_id";

// Dependent-table probes run before a guarded delete.
const PLANET_GUARDS: &[&str] = &[
    "SELECT EXISTS (SELECT 1 FROM character WHERE planet_origin_id = ?1)",
    "SELECT EXISTS (SELECT 1 FROM favorite WHERE planet_id = ?1)",
];
const VEHICLE_GUARDS: &[&str] = &[
    "SELECT EXISTS (SELECT 1 FROM character WHERE vehicle_id = ?1)",
    "SELECT EXISTS (SELECT 1 FROM favorite WHERE vehicle_id = ?1)",
];
const CHARACTER_GUARDS: &[&str] = &["SELECT EXISTS (SELECT 1 FROM favorite WHERE character_id = ?1)"];

/// Store backed by a single SQLite connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Open a private database that lives as long as the store.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        username: row.get(2)?,
        password: row.get(3)?,
        is_active: row.get(4)?,
    })
}

fn planet_from_row(row: &Row<'_>) -> rusqlite::Result<Planet> {
    Ok(Planet {
        id: row.get(0)?,
        name: row.get(1)?,
        density: row.get(2)?,
        diameter: row.get(3)?,
        orbital_period: row.get(4)?,
        population: row.get(5)?,
        weather: row.get(6)?,
    })
}

fn vehicle_from_row(row: &Row<'_>) -> rusqlite::Result<Vehicle> {
    Ok(Vehicle {
        id: row.get(0)?,
        name: row.get(1)?,
        crew: row.get(2)?,
        model: row.get(3)?,
        cargo_capacity: row.get(4)?,
        passengers: row.get(5)?,
    })
}

fn character_from_row(row: &Row<'_>) -> rusqlite::Result<Character> {
    Ok(Character {
        id: row.get(0)?,
        name: row.get(1)?,
        height: row.get(2)?,
        weight: row.get(3)?,
        planet: row.get(4)?,
        vehicle: row.get(5)?,
    })
}

fn favorite_from_row(row: &Row<'_>) -> rusqlite::Result<Favorite> {
    Ok(Favorite {
        id: row.get(0)?,
        user: row.get(1)?,
        character: row.get(2)?,
        planet: row.get(3)?,
        vehicle: row.get(4)?,
    })
}

fn select_all<T>(
    conn: &Connection,
    table: &str,
    columns: &str,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> StoreResult<Vec<T>> {
    let mut stmt = conn.prepare(&format!("SELECT {columns} FROM {table} ORDER BY id"))?;
    let rows = stmt.query_map([], map)?.collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn select_by_id<T>(
    conn: &Connection,
    table: &str,
    columns: &str,
    id: RecordId,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> StoreResult<Option<T>> {
    let row = conn
        .query_row(&format!("SELECT {columns} FROM {table} WHERE id = ?1"), [id], map)
        .optional()?;
    Ok(row)
}

fn is_referenced(conn: &Connection, guards: &[&str], id: RecordId) -> StoreResult<bool> {
    for sql in guards {
        let exists: bool = conn.query_row(sql, [id], |row| row.get(0))?;
        if exists {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Look up, guard and delete one row inside a transaction.
fn delete_guarded<T: Entity>(
    conn: &mut Connection,
    table: &str,
    columns: &str,
    guards: &[&str],
    id: RecordId,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> StoreResult<T> {
    let tx = conn.transaction()?;
    let row = select_by_id(&tx, table, columns, id, map)?.ok_or_else(|| StoreError::missing::<T>(id))?;
    if is_referenced(&tx, guards, id)? {
        return Err(StoreError::referenced::<T>(id));
    }
    tx.execute(&format!("DELETE FROM {table} WHERE id = ?1"), [id])?;
    tx.commit()?;
    Ok(row)
}

impl Store for SqliteStore {
    fn list_users(&self) -> StoreResult<Vec<User>> {
        select_all(&*self.conn()?, "user", USER_COLUMNS, user_from_row)
    }

    fn get_user(&self, id: RecordId) -> StoreResult<Option<User>> {
        select_by_id(&*self.conn()?, "user", USER_COLUMNS, id, user_from_row)
    }

    fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = self
            .conn()?
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM user WHERE username = ?1"),
                [username],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        user.check_columns()?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO user (email, username, password, is_active) VALUES (?1, ?2, ?3, 1)",
            params![user.email, user.username, user.password],
        )?;
        Ok(user.into_record(conn.last_insert_rowid()))
    }

    fn update_user(&self, id: RecordId, changes: &UserChanges) -> StoreResult<User> {
        changes.check_columns()?;
        let conn = self.conn()?;
        let mut user =
            select_by_id(&conn, "user", USER_COLUMNS, id, user_from_row)?.ok_or_else(|| StoreError::missing::<User>(id))?;
        changes.apply(&mut user);
        conn.execute(
            "UPDATE user SET username = ?1, password = ?2 WHERE id = ?3",
            params![user.username, user.password, id],
        )?;
        Ok(user)
    }

    fn delete_user(&self, id: RecordId) -> StoreResult<User> {
        // favorites go with it through ON DELETE CASCADE
        delete_guarded(&mut *self.conn()?, "user", USER_COLUMNS, &[], id, user_from_row)
    }

    fn list_planets(&self) -> StoreResult<Vec<Planet>> {
        select_all(&*self.conn()?, "planet", PLANET_COLUMNS, planet_from_row)
    }

    fn get_planet(&self, id: RecordId) -> StoreResult<Option<Planet>> {
        select_by_id(&*self.conn()?, "planet", PLANET_COLUMNS, id, planet_from_row)
    }

    fn insert_planet(&self, planet: NewPlanet) -> StoreResult<Planet> {
        planet.check_columns()?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO planet (name, density, diameter, orbital_period, population, weather)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                planet.name,
                planet.density,
                planet.diameter,
                planet.orbital_period,
                planet.population,
                planet.weather,
            ],
        )?;
        Ok(planet.into_record(conn.last_insert_rowid()))
    }

    fn delete_planet(&self, id: RecordId) -> StoreResult<Planet> {
        delete_guarded(&mut *self.conn()?, "planet", PLANET_COLUMNS, PLANET_GUARDS, id, planet_from_row)
    }

    fn list_vehicles(&self) -> StoreResult<Vec<Vehicle>> {
        select_all(&*self.conn()?, "vehicle", VEHICLE_COLUMNS, vehicle_from_row)
    }

    fn get_vehicle(&self, id: RecordId) -> StoreResult<Option<Vehicle>> {
        select_by_id(&*self.conn()?, "vehicle", VEHICLE_COLUMNS, id, vehicle_from_row)
    }

    fn insert_vehicle(&self, vehicle: NewVehicle) -> StoreResult<Vehicle> {
        vehicle.check_columns()?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO vehicle (name, crew, model, cargo_capacity, passengers) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                vehicle.name,
                vehicle.crew,
                vehicle.model,
                vehicle.cargo_capacity,
                vehicle.passengers,
            ],
        )?;
        Ok(vehicle.into_record(conn.last_insert_rowid()))
    }

    fn delete_vehicle(&self, id: RecordId) -> StoreResult<Vehicle> {
        delete_guarded(&mut *self.conn()?, "vehicle", VEHICLE_COLUMNS, VEHICLE_GUARDS, id, vehicle_from_row)
    }

    fn list_characters(&self) -> StoreResult<Vec<Character>> {
        select_all(&*self.conn()?, "character", CHARACTER_COLUMNS, character_from_row)
    }

    fn get_character(&self, id: RecordId) -> StoreResult<Option<Character>> {
        select_by_id(&*self.conn()?, "character", CHARACTER_COLUMNS, id, character_from_row)
    }

    fn insert_character(&self, character: NewCharacter) -> StoreResult<Character> {
        character.check_columns()?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO character (name, height, weight, planet_origin_id, vehicle_id) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                character.name,
                character.height,
                character.weight,
                character.planet,
                character.vehicle,
            ],
        )?;
        Ok(character.into_record(conn.last_insert_rowid()))
    }

    fn delete_character(&self, id: RecordId) -> StoreResult<Character> {
        delete_guarded(
            &mut *self.conn()?,
            "character",
            CHARACTER_COLUMNS,
            CHARACTER_GUARDS,
            id,
            character_from_row,
        )
    }

    fn list_favorites(&self) -> StoreResult<Vec<Favorite>> {
        select_all(&*self.conn()?, "favorite", FAVORITE_COLUMNS, favorite_from_row)
    }

    fn get_favorite(&self, id: RecordId) -> StoreResult<Option<Favorite>> {
        select_by_id(&*self.conn()?, "favorite", FAVORITE_COLUMNS, id, favorite_from_row)
    }

    fn insert_favorite(&self, favorite: NewFavorite) -> StoreResult<Favorite> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO favorite (user_id, character_id, planet_id, vehicle_id) VALUES (?1, ?2, ?3, ?4)",
            params![favorite.user, favorite.character, favorite.planet, favorite.vehicle],
        )?;
        Ok(favorite.into_record(conn.last_insert_rowid()))
    }

    fn delete_favorite(&self, id: RecordId) -> StoreResult<Favorite> {
        delete_guarded(&mut *self.conn()?, "favorite", FAVORITE_COLUMNS, &[], id, favorite_from_row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_ordering() {
        contract::insert_ordering(&store());
    }

    #[test]
    fn test_unique_user_columns() {
        contract::unique_user_columns(&store());
    }

    #[test]
    fn test_update_user() {
        contract::update_user(&store());
    }

    #[test]
    fn test_planet_guard() {
        contract::planet_guard(&store());
    }

    #[test]
    fn test_favorite_guard_and_cascade() {
        contract::favorite_guard_and_cascade(&store());
    }

    #[test]
    fn test_dangling_reference_rejected() {
        contract::dangling_reference_rejected(&store());
    }

    #[test]
    fn test_guarded_deletes_release_lock() {
        let store = store();
        let planet = store.insert_planet(contract::new_planet("Endor")).unwrap();
        let vehicle = store.insert_vehicle(contract::new_vehicle("AT-ST")).unwrap();
        let character = store
            .insert_character(NewCharacter {
                name: "Wicket".to_string(),
                height: 88.0,
                weight: 20.0,
                planet: planet.id,
                vehicle: vehicle.id,
            })
            .unwrap();

        assert!(matches!(store.delete_vehicle(vehicle.id), Err(StoreError::Referenced { .. })));
        assert_eq!(store.get_vehicle(vehicle.id).unwrap(), Some(vehicle.clone()));

        assert_eq!(store.delete_character(character.id).unwrap(), character);
        assert!(store.list_characters().unwrap().is_empty());
        assert!(matches!(store.delete_character(character.id), Err(StoreError::NotFound { .. })));

        assert_eq!(store.delete_vehicle(vehicle.id).unwrap().name, "AT-ST");
        assert_eq!(store.delete_planet(planet.id).unwrap().name, "Endor");
        assert!(store.list_vehicles().unwrap().is_empty());
        assert!(store.list_favorites().unwrap().is_empty());
    }

    #[test]
    fn test_schema_check_backs_up_column_limits() {
        let store = store();
        let conn = store.conn().unwrap();
        let result = conn.execute(
            "INSERT INTO user (email, username, password, is_active) VALUES ('a@b.c', 'thirteen_char', 'pw', 1)",
            [],
        );
        assert!(matches!(StoreError::from(result.unwrap_err()), StoreError::Constraint(_)));
    }

    #[test]
    fn test_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("starwars.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.insert_user(contract::new_user("yoda")).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let users = store.list_users().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "yoda");
        assert!(users[0].is_active);
    }
}
