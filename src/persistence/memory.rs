use super::{PersistenceError, PersistenceResult, SubjectStore};
use crate::Subject;
use std::sync::Mutex;

/// Keeps the last saved list in process memory only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    subjects: Mutex<Option<Vec<Subject>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subjects(subjects: Vec<Subject>) -> Self {
        Self {
            subjects: Mutex::new(Some(subjects)),
        }
    }
}

impl SubjectStore for MemoryStore {
    fn save_subjects(&self, subjects: &[Subject]) -> PersistenceResult<()> {
        let mut guard = self
            .subjects
            .lock()
            .map_err(|_| PersistenceError::LockPoisoned)?;
        *guard = Some(subjects.to_vec());
        Ok(())
    }

    fn load_subjects(&self) -> PersistenceResult<Option<Vec<Subject>>> {
        let guard = self
            .subjects
            .lock()
            .map_err(|_| PersistenceError::LockPoisoned)?;
        Ok(guard.clone())
    }
}
