pub mod attendance;
pub mod config;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod persistence;
pub mod semester;
pub mod slot;
pub mod subject;
pub mod tracker;

pub use attendance::{AttendanceStatus, Forecast, MIN_ATTENDANCE_PERCENT};
pub use config::{AppConfig, ConfigError, StoreKind};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteSubjectStore;
pub use persistence::{
    JsonFileStore, MemoryStore, PersistenceError, SubjectStore, export_attendance_csv,
    load_subjects_from_json, save_subjects_to_json,
};
pub use semester::{
    ClassEntry, DaySchedule, PendingAssignment, Semester, SemesterError, SlotConflict,
};
pub use slot::{Day, Slot, SlotError, SlotKind, TIME_SLOTS, TimeSlot};
pub use subject::{Assignment, Subject, SubjectError};
pub use tracker::{Tracker, TrackerError};
