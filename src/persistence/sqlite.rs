use super::{
    PersistenceError, PersistenceResult, SUBJECTS_KEY, SubjectStore, subjects_from_value,
};
use crate::Subject;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::sync::Mutex;

/// Stores the subject list as one JSON value in a `kv_store` table.
pub struct SqliteSubjectStore {
    connection: Mutex<Connection>,
}

impl SqliteSubjectStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> PersistenceResult<Self> {
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| PersistenceError::LockPoisoned)?;
        let mut stmt = conn.prepare("SELECT value FROM kv_store WHERE key = ?1")?;
        let value = stmt
            .query_row(params![key], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, key: &str, value: &str) -> PersistenceResult<()> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| PersistenceError::LockPoisoned)?;
        conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

impl SubjectStore for SqliteSubjectStore {
    fn save_subjects(&self, subjects: &[Subject]) -> PersistenceResult<()> {
        let json = serde_json::to_string(subjects)?;
        self.set(SUBJECTS_KEY, &json)?;
        tracing::info!(count = subjects.len(), "subjects saved to sqlite");
        Ok(())
    }

    fn load_subjects(&self) -> PersistenceResult<Option<Vec<Subject>>> {
        let Some(json) = self.get(SUBJECTS_KEY)? else {
            return Ok(None);
        };
        let value: Value = serde_json::from_str(&json)?;
        let subjects = subjects_from_value(&value);
        tracing::info!(count = subjects.len(), "subjects loaded from sqlite");
        Ok(Some(subjects))
    }
}
