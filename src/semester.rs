use crate::attendance::Forecast;
use crate::slot::{Day, Slot, TimeSlot};
use crate::subject::{Subject, SubjectError};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemesterError {
    #[error("subject {0} not found")]
    SubjectNotFound(usize),
    #[error(transparent)]
    Subject(#[from] SubjectError),
}

pub type SemesterResult<T> = Result<T, SemesterError>;

/// One entry of a day's class list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassEntry {
    pub subject_index: usize,
    pub subject: String,
    pub code: String,
    pub professor: String,
    pub time: TimeSlot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySchedule {
    pub day: Day,
    pub classes: Vec<ClassEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingAssignment {
    pub subject_index: usize,
    pub subject: String,
    pub assignment_index: usize,
    pub title: String,
    pub deadline: String,
}

/// A grid cell claimed by more than one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotConflict {
    pub slot: Slot,
    pub subjects: Vec<usize>,
}

/// The ordered collection of subjects. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Semester {
    subjects: Vec<Subject>,
}

impl Semester {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_subjects(subjects: Vec<Subject>) -> Self {
        Self { subjects }
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn subject(&self, index: usize) -> SemesterResult<&Subject> {
        self.subjects
            .get(index)
            .ok_or(SemesterError::SubjectNotFound(index))
    }

    fn subject_mut(&mut self, index: usize) -> SemesterResult<&mut Subject> {
        self.subjects
            .get_mut(index)
            .ok_or(SemesterError::SubjectNotFound(index))
    }

    /// First subject with this exact name, as the assignment form picks them.
    pub fn position_by_name(&self, name: &str) -> Option<usize> {
        self.subjects.iter().position(|subject| subject.name == name)
    }

    pub fn add_subject(
        &mut self,
        name: impl Into<String>,
        code: impl Into<String>,
        professor: impl Into<String>,
    ) -> SemesterResult<usize> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SubjectError::EmptyName.into());
        }
        self.subjects
            .push(Subject::with_details(name, code, professor));
        let index = self.subjects.len() - 1;
        tracing::debug!(index, "subject added");
        Ok(index)
    }

    pub fn remove_subject(&mut self, index: usize) -> SemesterResult<Subject> {
        if index >= self.subjects.len() {
            return Err(SemesterError::SubjectNotFound(index));
        }
        let removed = self.subjects.remove(index);
        tracing::debug!(index, name = %removed.name, "subject removed");
        Ok(removed)
    }

    pub fn mark_present(&mut self, index: usize) -> SemesterResult<&Subject> {
        let subject = self.subject_mut(index)?;
        subject.mark_present();
        tracing::debug!(
            index,
            attended = subject.attended,
            conducted = subject.conducted,
            "marked present"
        );
        Ok(subject)
    }

    pub fn mark_absent(&mut self, index: usize) -> SemesterResult<&Subject> {
        let subject = self.subject_mut(index)?;
        subject.mark_absent();
        tracing::debug!(
            index,
            attended = subject.attended,
            conducted = subject.conducted,
            "marked absent"
        );
        Ok(subject)
    }

    pub fn edit_details(
        &mut self,
        index: usize,
        name: impl Into<String>,
        code: impl Into<String>,
        professor: impl Into<String>,
    ) -> SemesterResult<&Subject> {
        let subject = self.subject_mut(index)?;
        subject.edit_details(name, code, professor)?;
        tracing::debug!(index, "subject details updated");
        Ok(subject)
    }

    pub fn set_schedule<I>(&mut self, index: usize, slots: I) -> SemesterResult<&Subject>
    where
        I: IntoIterator<Item = Slot>,
    {
        let subject = self.subject_mut(index)?;
        subject.set_schedule(slots);
        tracing::debug!(index, slots = subject.schedule().len(), "schedule replaced");
        Ok(subject)
    }

    pub fn toggle_slot(&mut self, index: usize, slot: Slot) -> SemesterResult<bool> {
        let selected = self.subject_mut(index)?.toggle_slot(slot);
        tracing::debug!(index, %slot, selected, "slot toggled");
        Ok(selected)
    }

    pub fn add_assignment(
        &mut self,
        index: usize,
        title: impl Into<String>,
        deadline: impl Into<String>,
    ) -> SemesterResult<usize> {
        let assignment = self.subject_mut(index)?.add_assignment(title, deadline)?;
        tracing::debug!(index, assignment, "assignment added");
        Ok(assignment)
    }

    pub fn complete_assignment(&mut self, index: usize, assignment: usize) -> SemesterResult<()> {
        self.subject_mut(index)?.complete_assignment(assignment)?;
        tracing::debug!(index, assignment, "assignment completed");
        Ok(())
    }

    pub fn forecast(&self) -> Forecast {
        Forecast::from_subjects(&self.subjects)
    }

    /// Classes on `day`, ordered by the stored time string.
    ///
    /// The order compares display strings such as `"08:00 - 08:50 (Lab)"`
    /// rather than parsed times, so a lab and a theory slot starting at the
    /// same minute order by their suffix. Equal times keep subject order.
    pub fn classes_on(&self, day: Day) -> Vec<ClassEntry> {
        let mut classes: Vec<ClassEntry> = self
            .subjects
            .iter()
            .enumerate()
            .flat_map(|(subject_index, subject)| {
                subject
                    .schedule()
                    .iter()
                    .filter(move |slot| slot.day == day)
                    .map(move |slot| ClassEntry {
                        subject_index,
                        subject: subject.name.clone(),
                        code: subject.code.clone(),
                        professor: subject.professor.clone(),
                        time: slot.time,
                    })
            })
            .collect();
        classes.sort_by(|a, b| a.time.display().cmp(b.time.display()));
        classes
    }

    /// Today's classes by local day name; empty on weekends.
    pub fn classes_today(&self) -> Vec<ClassEntry> {
        Day::today()
            .map(|day| self.classes_on(day))
            .unwrap_or_default()
    }

    pub fn timetable(&self) -> Vec<DaySchedule> {
        Day::ALL
            .into_iter()
            .map(|day| DaySchedule {
                day,
                classes: self.classes_on(day),
            })
            .collect()
    }

    pub fn pending_assignments(&self) -> Vec<PendingAssignment> {
        self.subjects
            .iter()
            .enumerate()
            .flat_map(|(subject_index, subject)| {
                subject
                    .pending_assignments()
                    .map(move |(assignment_index, assignment)| {
                        PendingAssignment {
                            subject_index,
                            subject: subject.name.clone(),
                            assignment_index,
                            title: assignment.title.clone(),
                            deadline: assignment.deadline.clone(),
                        }
                    })
            })
            .collect()
    }

    /// Cells claimed by two or more subjects, in grid order. Sharing a cell
    /// is allowed; this is only a report.
    pub fn conflicts(&self) -> Vec<SlotConflict> {
        let mut conflicts: Vec<SlotConflict> = Vec::new();
        for (index, subject) in self.subjects.iter().enumerate() {
            for slot in subject.schedule() {
                match conflicts.iter_mut().find(|c| c.slot == *slot) {
                    Some(existing) => existing.subjects.push(index),
                    None => conflicts.push(SlotConflict {
                        slot: *slot,
                        subjects: vec![index],
                    }),
                }
            }
        }
        conflicts.retain(|conflict| conflict.subjects.len() > 1);
        conflicts.sort_by_key(|conflict| conflict.slot.grid_order());
        conflicts
    }
}
