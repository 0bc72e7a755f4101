//! Attendance ratio and bunk prediction.
//!
//! The minimum attendance is fixed at 75%. All arithmetic is done on exact
//! integers: a ratio `a / c` meets the threshold iff `4a >= 3c`.

use crate::subject::Subject;
use serde::Serialize;
use std::fmt;

pub const MIN_ATTENDANCE_PERCENT: f64 = 75.0;

const THRESHOLD_NUM: i64 = 3;
const THRESHOLD_DEN: i64 = 4;

pub fn percentage(attended: u32, conducted: u32) -> f64 {
    if conducted == 0 {
        return 0.0;
    }
    f64::from(attended) / f64::from(conducted) * 100.0
}

pub fn meets_threshold(attended: u32, conducted: u32) -> bool {
    THRESHOLD_DEN * i64::from(attended) >= THRESHOLD_NUM * i64::from(conducted)
}

/// Largest `k` with `attended / (conducted + k) >= 0.75`. Zero when the
/// subject is already below the threshold.
pub fn safe_bunks(attended: u32, conducted: u32) -> u32 {
    let slack = THRESHOLD_DEN * i64::from(attended) - THRESHOLD_NUM * i64::from(conducted);
    clamp_count(slack.div_euclid(THRESHOLD_NUM))
}

/// Smallest `m` with `(attended + m) / (conducted + m) >= 0.75`.
pub fn required_attendance(attended: u32, conducted: u32) -> u32 {
    let deficit = THRESHOLD_NUM * i64::from(conducted) - THRESHOLD_DEN * i64::from(attended);
    clamp_count(deficit / (THRESHOLD_DEN - THRESHOLD_NUM))
}

fn clamp_count(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttendanceStatus {
    NoData,
    Safe { can_bunk: u32 },
    AtRisk { must_attend: u32 },
}

impl AttendanceStatus {
    pub fn evaluate(attended: u32, conducted: u32) -> Self {
        if conducted == 0 {
            AttendanceStatus::NoData
        } else if meets_threshold(attended, conducted) {
            AttendanceStatus::Safe {
                can_bunk: safe_bunks(attended, conducted),
            }
        } else {
            AttendanceStatus::AtRisk {
                must_attend: required_attendance(attended, conducted),
            }
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceStatus::NoData => f.write_str("No classes conducted yet"),
            AttendanceStatus::Safe { can_bunk } => write!(f, "Safe to bunk: {can_bunk}"),
            AttendanceStatus::AtRisk { must_attend } => write!(f, "Attend next: {must_attend}"),
        }
    }
}

/// The single recommendation shown on the summary card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Forecast {
    NoSubjects,
    NoData,
    AtRisk {
        index: usize,
        subject: String,
        must_attend: u32,
    },
    Safe {
        index: usize,
        subject: String,
        can_bunk: u32,
    },
}

impl Forecast {
    /// At-risk subjects take priority (first one wins); otherwise the subject
    /// with the most safe bunks, ties going to the earliest.
    pub fn from_subjects(subjects: &[Subject]) -> Self {
        if subjects.is_empty() {
            return Forecast::NoSubjects;
        }

        let mut best: Option<(usize, u32)> = None;
        for (index, subject) in subjects.iter().enumerate() {
            match subject.status() {
                AttendanceStatus::NoData => continue,
                AttendanceStatus::AtRisk { must_attend } => {
                    return Forecast::AtRisk {
                        index,
                        subject: subject.name.clone(),
                        must_attend,
                    };
                }
                AttendanceStatus::Safe { can_bunk } => {
                    if best.is_none_or(|(_, current)| can_bunk > current) {
                        best = Some((index, can_bunk));
                    }
                }
            }
        }

        match best {
            Some((index, can_bunk)) => Forecast::Safe {
                index,
                subject: subjects[index].name.clone(),
                can_bunk,
            },
            None => Forecast::NoData,
        }
    }
}

impl fmt::Display for Forecast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Forecast::NoSubjects => f.write_str("Add subjects to get started."),
            Forecast::NoData => f.write_str("No attendance recorded yet."),
            Forecast::AtRisk {
                subject,
                must_attend,
                ..
            } => write!(f, "Risk! Attend {must_attend} in {subject}."),
            Forecast::Safe {
                subject, can_bunk, ..
            } => write!(f, "Relax! Skip {can_bunk} in {subject}."),
        }
    }
}
