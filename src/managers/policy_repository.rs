use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, OptionalExtension};

use crate::database::connection::Database;
use crate::types::errors::StorageError;
use crate::types::policy::Policy;

/// Name of the slot holding the last applied policy.
pub const POLICY_SLOT: &str = "kiosk_policy";

/// Persistence of the last applied policy, read once at startup.
pub trait PolicyStorage {
    fn persist_policy(&self, policy: &Policy) -> Result<(), StorageError>;
    /// `Ok(None)` means nothing was ever persisted.
    fn load_persisted_policy(&self) -> Result<Option<Policy>, StorageError>;
}

/// SQLite-backed [`PolicyStorage`].
pub struct PolicyRepository {
    db: Database,
}

impl PolicyRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }
}

impl PolicyStorage for PolicyRepository {
    fn persist_policy(&self, policy: &Policy) -> Result<(), StorageError> {
        let payload = serde_json::to_string(policy)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        self.db
            .connection()
            .execute(
                "INSERT INTO policy_slots (name, payload, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(name) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
                params![POLICY_SLOT, payload, Self::now()],
            )
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    fn load_persisted_policy(&self) -> Result<Option<Policy>, StorageError> {
        let payload: Option<String> = self
            .db
            .connection()
            .query_row(
                "SELECT payload FROM policy_slots WHERE name = ?1",
                params![POLICY_SLOT],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        match payload {
            Some(json) => {
                let policy: Policy = serde_json::from_str(&json)
                    .map_err(|e| StorageError::SerializationError(e.to_string()))?;
                Ok(Some(policy))
            }
            None => Ok(None),
        }
    }
}
