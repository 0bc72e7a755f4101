use crate::Subject;
use serde_json::Value;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("store lock poisoned")]
    LockPoisoned,
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Name of the single entry that holds the subject list.
pub const SUBJECTS_KEY: &str = "subjects";

/// Key-value backing for the subject list.
pub trait SubjectStore {
    fn save_subjects(&self, subjects: &[Subject]) -> PersistenceResult<()>;
    /// `Ok(None)` when nothing has been stored yet.
    fn load_subjects(&self) -> PersistenceResult<Option<Vec<Subject>>>;
}

/// Decodes the stored entry record by record. A value that is not a list
/// yields no subjects rather than an error.
pub fn subjects_from_value(value: &Value) -> Vec<Subject> {
    match value.as_array() {
        Some(records) => records.iter().map(Subject::from_value).collect(),
        None => {
            tracing::warn!("stored subjects entry is not a list; starting empty");
            Vec::new()
        }
    }
}

pub fn subjects_to_value(subjects: &[Subject]) -> PersistenceResult<Value> {
    Ok(serde_json::to_value(subjects)?)
}

pub mod file;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    JsonFileStore, export_attendance_csv, load_subjects_from_json, save_subjects_to_json,
};
pub use memory::MemoryStore;
