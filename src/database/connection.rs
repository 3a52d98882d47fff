//! SQLite database connection management for the kiosk guard.
//!
//! Provides the [`Database`] struct that wraps a `rusqlite::Connection`
//! and automatically runs schema migrations on open.

use rusqlite::Connection;
use std::path::Path;

use super::migrations;

/// Owns the SQLite connection holding the persisted policy slots.
///
/// Opening a `Database` always brings the schema up to
/// [`CURRENT_SCHEMA_VERSION`](super::migrations::CURRENT_SCHEMA_VERSION).
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) a SQLite database at the given file path and runs migrations.
    ///
    /// # Arguments
    /// * `path` - Location of the database file, usually `<data dir>/kiosk-guard.db`.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the file cannot be opened or a migration fails.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    /// Opens an in-memory SQLite database and runs migrations.
    ///
    /// Nothing survives the `Database` being dropped; the demo binary and the
    /// tests use it.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the connection cannot be established or a migration fails.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    /// Applies every migration newer than the recorded schema version.
    fn run_migrations(&self) -> Result<(), rusqlite::Error> {
        migrations::run_all(&self.conn)
    }

    /// Returns a reference to the underlying `rusqlite::Connection`.
    ///
    /// Repositories such as
    /// [`PolicyRepository`](crate::managers::policy_repository::PolicyRepository)
    /// run their queries through it.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
