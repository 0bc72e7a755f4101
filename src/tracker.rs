use crate::attendance::Forecast;
use crate::persistence::{PersistenceError, SubjectStore};
use crate::semester::{Semester, SemesterError};
use crate::slot::Slot;
use crate::subject::Subject;

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error(transparent)]
    Semester(#[from] SemesterError),
    #[error("failed to persist subjects: {0}")]
    Persistence(#[from] PersistenceError),
}

pub type TrackerResult<T> = Result<T, TrackerError>;

pub type BoxedStore = Box<dyn SubjectStore + Send + Sync>;

/// A [`Semester`] written through to its store after every mutation.
///
/// A failed write leaves the in-memory change applied; the error is returned
/// so the caller can report it.
pub struct Tracker {
    semester: Semester,
    store: BoxedStore,
}

impl Tracker {
    /// Loads whatever the store holds; an empty store starts an empty semester.
    pub fn open(store: BoxedStore) -> TrackerResult<Self> {
        let subjects = store.load_subjects()?.unwrap_or_default();
        Ok(Self {
            semester: Semester::from_subjects(subjects),
            store,
        })
    }

    pub fn semester(&self) -> &Semester {
        &self.semester
    }

    pub fn subjects(&self) -> &[Subject] {
        self.semester.subjects()
    }

    pub fn forecast(&self) -> Forecast {
        self.semester.forecast()
    }

    /// Swaps in another subject list (e.g. an imported file) and persists it.
    pub fn replace_subjects(&mut self, subjects: Vec<Subject>) -> TrackerResult<()> {
        self.semester = Semester::from_subjects(subjects);
        self.persist()
    }

    pub fn persist(&self) -> TrackerResult<()> {
        self.store
            .save_subjects(self.semester.subjects())
            .map_err(|err| {
                tracing::error!(%err, "write-through failed");
                TrackerError::from(err)
            })
    }

    /// Reloads from the store, discarding unsaved state.
    pub fn reload(&mut self) -> TrackerResult<()> {
        let subjects = self.store.load_subjects()?.unwrap_or_default();
        self.semester = Semester::from_subjects(subjects);
        Ok(())
    }

    fn apply<T>(
        &mut self,
        action: impl FnOnce(&mut Semester) -> Result<T, SemesterError>,
    ) -> TrackerResult<T> {
        let result = action(&mut self.semester)?;
        self.persist()?;
        Ok(result)
    }

    pub fn add_subject(
        &mut self,
        name: impl Into<String>,
        code: impl Into<String>,
        professor: impl Into<String>,
    ) -> TrackerResult<usize> {
        self.apply(|semester| semester.add_subject(name, code, professor))
    }

    pub fn remove_subject(&mut self, index: usize) -> TrackerResult<Subject> {
        self.apply(|semester| semester.remove_subject(index))
    }

    pub fn mark_present(&mut self, index: usize) -> TrackerResult<()> {
        self.apply(|semester| semester.mark_present(index).map(|_| ()))
    }

    pub fn mark_absent(&mut self, index: usize) -> TrackerResult<()> {
        self.apply(|semester| semester.mark_absent(index).map(|_| ()))
    }

    pub fn edit_details(
        &mut self,
        index: usize,
        name: impl Into<String>,
        code: impl Into<String>,
        professor: impl Into<String>,
    ) -> TrackerResult<()> {
        self.apply(|semester| {
            semester
                .edit_details(index, name, code, professor)
                .map(|_| ())
        })
    }

    pub fn set_schedule<I>(&mut self, index: usize, slots: I) -> TrackerResult<()>
    where
        I: IntoIterator<Item = Slot>,
    {
        self.apply(|semester| semester.set_schedule(index, slots).map(|_| ()))
    }

    pub fn toggle_slot(&mut self, index: usize, slot: Slot) -> TrackerResult<bool> {
        self.apply(|semester| semester.toggle_slot(index, slot))
    }

    pub fn add_assignment(
        &mut self,
        index: usize,
        title: impl Into<String>,
        deadline: impl Into<String>,
    ) -> TrackerResult<usize> {
        self.apply(|semester| semester.add_assignment(index, title, deadline))
    }

    pub fn complete_assignment(&mut self, index: usize, assignment: usize) -> TrackerResult<()> {
        self.apply(|semester| semester.complete_assignment(index, assignment))
    }
}
