//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! api handler
//!     → Store trait (this module)
//!     → SqliteStore (sqlite.rs, durable)  or  MemoryStore (memory.rs, tests)
//! ```
//!
//! # Design Decisions
//! - Handlers only see `Arc<dyn Store>`; no handler touches SQL
//! - Guarded deletes check dependent tables and delete in one critical section
//! - Unique and column-limit failures surface as `StoreError::Constraint`

pub mod error;
pub mod memory;
pub mod sqlite;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::sync::Arc;

use crate::config::{DatabaseConfig, StoreBackend};
use crate::model::{
    Character, Favorite, NewCharacter, NewFavorite, NewPlanet, NewUser, NewVehicle, Planet, RecordId, User,
    UserChanges, Vehicle,
};

/// Repository over the five entity tables.
///
/// Lists return rows in insertion order. `get_*` return `Ok(None)` for a
/// missing row; mutations on a missing row return `StoreError::NotFound`.
pub trait Store: Send + Sync {
    fn list_users(&self) -> StoreResult<Vec<User>>;
    fn get_user(&self, id: RecordId) -> StoreResult<Option<User>>;
    fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    fn insert_user(&self, user: NewUser) -> StoreResult<User>;
    fn update_user(&self, id: RecordId, changes: &UserChanges) -> StoreResult<User>;
    /// Deletes the user and every favorite that belongs to it.
    fn delete_user(&self, id: RecordId) -> StoreResult<User>;

    fn list_planets(&self) -> StoreResult<Vec<Planet>>;
    fn get_planet(&self, id: RecordId) -> StoreResult<Option<Planet>>;
    fn insert_planet(&self, planet: NewPlanet) -> StoreResult<Planet>;
    /// Fails with `StoreError::Referenced` while a character or favorite points at it.
    fn delete_planet(&self, id: RecordId) -> StoreResult<Planet>;

    fn list_vehicles(&self) -> StoreResult<Vec<Vehicle>>;
    fn get_vehicle(&self, id: RecordId) -> StoreResult<Option<Vehicle>>;
    fn insert_vehicle(&self, vehicle: NewVehicle) -> StoreResult<Vehicle>;
    /// Fails with `StoreError::Referenced` while a character or favorite points at it.
    fn delete_vehicle(&self, id: RecordId) -> StoreResult<Vehicle>;

    fn list_characters(&self) -> StoreResult<Vec<Character>>;
    fn get_character(&self, id: RecordId) -> StoreResult<Option<Character>>;
    fn insert_character(&self, character: NewCharacter) -> StoreResult<Character>;
    /// Fails with `StoreError::Referenced` while a favorite points at it.
    fn delete_character(&self, id: RecordId) -> StoreResult<Character>;

    fn list_favorites(&self) -> StoreResult<Vec<Favorite>>;
    fn get_favorite(&self, id: RecordId) -> StoreResult<Option<Favorite>>;
    fn insert_favorite(&self, favorite: NewFavorite) -> StoreResult<Favorite>;
    fn delete_favorite(&self, id: RecordId) -> StoreResult<Favorite>;
}

/// Open the store selected by the configuration.
pub fn open(config: &DatabaseConfig) -> StoreResult<Arc<dyn Store>> {
    match config.backend {
        StoreBackend::Sqlite => {
            let store = SqliteStore::open(&config.path)?;
            tracing::info!(path = %config.path, "SQLite store opened");
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
