use super::{
    PersistenceError, PersistenceResult, SUBJECTS_KEY, SubjectStore, subjects_from_value,
    subjects_to_value,
};
use crate::Subject;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A JSON object file used as a key-value store. Only the `"subjects"` entry
/// is owned here; other top-level keys survive a save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SubjectStore for JsonFileStore {
    fn save_subjects(&self, subjects: &[Subject]) -> PersistenceResult<()> {
        save_subjects_to_json(subjects, &self.path)
    }

    /// A file that no longer parses is moved aside to `*.corrupt` and the
    /// store reports nothing stored, so startup still succeeds.
    fn load_subjects(&self) -> PersistenceResult<Option<Vec<Subject>>> {
        let document = match read_document(&self.path) {
            Ok(Some(document)) => document,
            Ok(None) => return Ok(None),
            Err(PersistenceError::Serialization(err)) => {
                quarantine(&self.path, &err)?;
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        let subjects = match document {
            Value::Object(entries) => entries.get(SUBJECTS_KEY).map(subjects_from_value),
            bare => Some(subjects_from_value(&bare)),
        };
        if let Some(subjects) = &subjects {
            tracing::info!(path = %self.path.display(), count = subjects.len(), "subjects loaded");
        }
        Ok(subjects)
    }
}

fn read_document(path: &Path) -> PersistenceResult<Option<Value>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    if contents.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&contents)?))
}

/// Where an unparseable store file is kept once it has been moved aside.
pub fn corrupt_path(path: &Path) -> PathBuf {
    path.with_extension("corrupt")
}

fn quarantine(path: &Path, err: &serde_json::Error) -> PersistenceResult<()> {
    let target = corrupt_path(path);
    fs::rename(path, &target)?;
    tracing::warn!(
        path = %path.display(),
        moved_to = %target.display(),
        %err,
        "store file is not valid JSON; moved aside"
    );
    Ok(())
}

/// Merges the list into the file's `"subjects"` entry. The document is
/// written to a sibling `*.tmp` file and renamed over the target, so the
/// previous contents survive a failed write.
pub fn save_subjects_to_json<P: AsRef<Path>>(
    subjects: &[Subject],
    path: P,
) -> PersistenceResult<()> {
    let path = path.as_ref();
    let mut entries = match read_document(path) {
        Ok(Some(Value::Object(entries))) => entries,
        Ok(_) => Map::new(),
        Err(PersistenceError::Serialization(err)) => {
            quarantine(path, &err)?;
            Map::new()
        }
        Err(err) => return Err(err),
    };
    entries.insert(SUBJECTS_KEY.to_string(), subjects_to_value(subjects)?);

    let contents = serde_json::to_string_pretty(&Value::Object(entries))?;
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, contents)?;
    fs::rename(&temp_path, path)?;
    tracing::info!(path = %path.display(), count = subjects.len(), "subjects saved");
    Ok(())
}

/// Reads the subject list from a store file. A file without a `"subjects"`
/// entry yields an empty list.
pub fn load_subjects_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Subject>> {
    let file = File::open(path)?;
    let document: Value = serde_json::from_reader(file)?;
    Ok(match document {
        Value::Object(entries) => entries
            .get(SUBJECTS_KEY)
            .map(subjects_from_value)
            .unwrap_or_default(),
        bare => subjects_from_value(&bare),
    })
}

#[derive(Serialize)]
struct AttendanceCsvRecord<'a> {
    name: &'a str,
    code: &'a str,
    professor: &'a str,
    attended: u32,
    conducted: u32,
    percentage: String,
    status: String,
}

impl<'a> From<&'a Subject> for AttendanceCsvRecord<'a> {
    fn from(subject: &'a Subject) -> Self {
        Self {
            name: &subject.name,
            code: &subject.code,
            professor: &subject.professor,
            attended: subject.attended,
            conducted: subject.conducted,
            percentage: format!("{:.1}", subject.percentage()),
            status: subject.status().to_string(),
        }
    }
}

/// Writes one row per subject with its percentage and recommendation.
pub fn export_attendance_csv<P: AsRef<Path>>(
    subjects: &[Subject],
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for subject in subjects {
        writer.serialize(AttendanceCsvRecord::from(subject))?;
    }
    writer.flush()?;
    Ok(())
}
