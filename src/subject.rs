use crate::attendance::{self, AttendanceStatus};
use crate::slot::Slot;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const UNKNOWN_SUBJECT_NAME: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubjectError {
    #[error("subject name must not be empty")]
    EmptyName,
    #[error("assignment title must not be empty")]
    EmptyAssignmentTitle,
    #[error("assignment deadline must not be empty")]
    EmptyDeadline,
    #[error("invalid deadline '{0}' (expected YYYY-MM-DD)")]
    InvalidDeadline(String),
    #[error("assignment {0} not found")]
    AssignmentNotFound(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub title: String,
    /// ISO `YYYY-MM-DD` date as supplied by the date picker.
    pub deadline: String,
    pub completed: bool,
}

impl Assignment {
    pub fn new(title: impl Into<String>, deadline: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            deadline: deadline.into(),
            completed: false,
        }
    }

    pub fn deadline_date(&self) -> Option<chrono::NaiveDate> {
        chrono::NaiveDate::parse_from_str(self.deadline.trim(), "%Y-%m-%d").ok()
    }

    /// Never fails: missing or ill-typed fields fall back to their defaults.
    pub fn from_value(value: &Value) -> Self {
        Self {
            title: string_field(value, "title", ""),
            deadline: string_field(value, "deadline", ""),
            completed: value
                .get("completed")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }
}

impl<'de> Deserialize<'de> for Assignment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subject {
    pub name: String,
    pub attended: u32,
    pub conducted: u32,
    pub code: String,
    pub professor: String,
    schedule: Vec<Slot>,
    pub assignments: Vec<Assignment>,
}

impl Subject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attended: 0,
            conducted: 0,
            code: String::new(),
            professor: String::new(),
            schedule: Vec::new(),
            assignments: Vec::new(),
        }
    }

    pub fn with_details(
        name: impl Into<String>,
        code: impl Into<String>,
        professor: impl Into<String>,
    ) -> Self {
        let mut subject = Self::new(name);
        subject.code = code.into();
        subject.professor = professor.into();
        subject
    }

    /// Restores counters from a stored record or an external import.
    pub fn with_attendance(mut self, attended: u32, conducted: u32) -> Self {
        self.attended = attended;
        self.conducted = conducted;
        self
    }

    pub fn percentage(&self) -> f64 {
        attendance::percentage(self.attended, self.conducted)
    }

    pub fn status(&self) -> AttendanceStatus {
        AttendanceStatus::evaluate(self.attended, self.conducted)
    }

    pub fn is_safe(&self) -> bool {
        self.percentage() >= attendance::MIN_ATTENDANCE_PERCENT
    }

    pub fn mark_present(&mut self) {
        self.attended = self.attended.saturating_add(1);
        self.conducted = self.conducted.saturating_add(1);
    }

    pub fn mark_absent(&mut self) {
        self.conducted = self.conducted.saturating_add(1);
    }

    /// Replaces name, code and professor together. Attendance is untouched.
    pub fn edit_details(
        &mut self,
        name: impl Into<String>,
        code: impl Into<String>,
        professor: impl Into<String>,
    ) -> Result<(), SubjectError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SubjectError::EmptyName);
        }
        self.name = name;
        self.code = code.into();
        self.professor = professor.into();
        Ok(())
    }

    /// Appends a pending assignment and returns its index.
    pub fn add_assignment(
        &mut self,
        title: impl Into<String>,
        deadline: impl Into<String>,
    ) -> Result<usize, SubjectError> {
        let title = title.into();
        let deadline = deadline.into();
        if title.trim().is_empty() {
            return Err(SubjectError::EmptyAssignmentTitle);
        }
        if deadline.trim().is_empty() {
            return Err(SubjectError::EmptyDeadline);
        }
        let assignment = Assignment::new(title, deadline.trim());
        if assignment.deadline_date().is_none() {
            return Err(SubjectError::InvalidDeadline(deadline));
        }
        self.assignments.push(assignment);
        Ok(self.assignments.len() - 1)
    }

    pub fn complete_assignment(&mut self, index: usize) -> Result<(), SubjectError> {
        let assignment = self
            .assignments
            .get_mut(index)
            .ok_or(SubjectError::AssignmentNotFound(index))?;
        assignment.completed = true;
        Ok(())
    }

    pub fn schedule(&self) -> &[Slot] {
        &self.schedule
    }

    pub fn occupies(&self, slot: &Slot) -> bool {
        self.schedule.contains(slot)
    }

    /// Replaces the whole schedule. Repeated cells collapse to one.
    pub fn set_schedule<I>(&mut self, slots: I)
    where
        I: IntoIterator<Item = Slot>,
    {
        self.schedule.clear();
        for slot in slots {
            if !self.schedule.contains(&slot) {
                self.schedule.push(slot);
            }
        }
    }

    /// Returns `true` when the slot is selected after the toggle.
    pub fn toggle_slot(&mut self, slot: Slot) -> bool {
        match self.schedule.iter().position(|s| *s == slot) {
            Some(pos) => {
                self.schedule.remove(pos);
                false
            }
            None => {
                self.schedule.push(slot);
                true
            }
        }
    }

    pub fn pending_assignments(&self) -> impl Iterator<Item = (usize, &Assignment)> {
        self.assignments
            .iter()
            .enumerate()
            .filter(|(_, assignment)| !assignment.completed)
    }

    /// Builds a subject from a loosely-typed stored record.
    ///
    /// Missing keys take their defaults (`name` becomes `"Unknown"`), unknown
    /// keys are ignored and schedule entries outside the slot catalog are
    /// dropped.
    pub fn from_value(value: &Value) -> Self {
        let mut subject = Self {
            name: string_field(value, "name", UNKNOWN_SUBJECT_NAME),
            attended: count_field(value, "attended"),
            conducted: count_field(value, "conducted"),
            code: string_field(value, "code", ""),
            professor: string_field(value, "professor", ""),
            schedule: Vec::new(),
            assignments: Vec::new(),
        };

        if let Some(entries) = value.get("schedule").and_then(Value::as_array) {
            let slots = entries.iter().filter_map(|entry| {
                let day = entry.get("day").and_then(Value::as_str).unwrap_or_default();
                let time = entry.get("time").and_then(Value::as_str).unwrap_or_default();
                match Slot::parse(day, time) {
                    Ok(slot) => Some(slot),
                    Err(err) => {
                        tracing::warn!(subject = %subject.name, %err, "dropping schedule entry");
                        None
                    }
                }
            });
            let slots: Vec<Slot> = slots.collect();
            subject.set_schedule(slots);
        }

        if let Some(entries) = value.get("assignments").and_then(Value::as_array) {
            subject.assignments = entries.iter().map(Assignment::from_value).collect();
        }

        subject
    }
}

impl<'de> Deserialize<'de> for Subject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

fn string_field(value: &Value, key: &str, default: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn count_field(value: &Value, key: &str) -> u32 {
    value
        .get(key)
        .and_then(Value::as_u64)
        .map(|count| u32::try_from(count).unwrap_or(u32::MAX))
        .unwrap_or(0)
}
