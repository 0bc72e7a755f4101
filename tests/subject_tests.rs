use bunk_tracker::{Day, Slot, Subject, SubjectError, TimeSlot};
use serde_json::json;

fn slot(day: Day, label: &str) -> Slot {
    Slot::new(day, TimeSlot::find(label).unwrap())
}

fn sample_subject() -> Subject {
    let mut subject = Subject::with_details("Operating Systems", "CS301", "Dr. Rao");
    subject.mark_present();
    subject.mark_present();
    subject.mark_absent();
    subject.set_schedule([slot(Day::Monday, "09:00 T"), slot(Day::Friday, "14:51 L")]);
    subject.add_assignment("Shell lab", "2025-03-14").unwrap();
    subject.add_assignment("Paging quiz", "2025-03-21").unwrap();
    subject.complete_assignment(0).unwrap();
    subject
}

#[test]
fn marking_attendance_moves_both_counters() {
    let mut subject = Subject::new("Physics");
    subject.mark_present();
    assert_eq!((subject.attended, subject.conducted), (1, 1));
    subject.mark_absent();
    assert_eq!((subject.attended, subject.conducted), (1, 2));
    assert_eq!(subject.percentage(), 50.0);
}

#[test]
fn edit_details_keeps_attendance() {
    let mut subject = Subject::new("Phys").with_attendance(4, 5);
    subject
        .edit_details("Physics", "PH101", "Dr. Iyer")
        .unwrap();
    assert_eq!(subject.name, "Physics");
    assert_eq!(subject.code, "PH101");
    assert_eq!(subject.professor, "Dr. Iyer");
    assert_eq!((subject.attended, subject.conducted), (4, 5));
}

#[test]
fn edit_details_with_blank_name_changes_nothing() {
    let mut subject = Subject::with_details("Physics", "PH101", "Dr. Iyer");
    let before = subject.clone();
    assert_eq!(
        subject.edit_details("   ", "X", "Y"),
        Err(SubjectError::EmptyName)
    );
    assert_eq!(subject, before);
}

#[test]
fn toggling_a_slot_twice_restores_schedule() {
    let mut subject = Subject::new("Chemistry");
    subject.set_schedule([slot(Day::Monday, "08:00 T")]);
    let before = subject.schedule().to_vec();

    let target = slot(Day::Wednesday, "11:40 L");
    assert!(subject.toggle_slot(target));
    assert!(subject.occupies(&target));
    assert!(!subject.toggle_slot(target));
    assert_eq!(subject.schedule(), before.as_slice());

    let existing = slot(Day::Monday, "08:00 T");
    assert!(!subject.toggle_slot(existing));
    assert!(subject.schedule().is_empty());
    assert!(subject.toggle_slot(existing));
    assert_eq!(subject.schedule(), before.as_slice());
}

#[test]
fn set_schedule_overwrites_and_collapses_duplicates() {
    let mut subject = Subject::new("Biology");
    subject.set_schedule([slot(Day::Monday, "08:00 T"), slot(Day::Tuesday, "09:00 T")]);
    subject.set_schedule([
        slot(Day::Thursday, "15:00 T"),
        slot(Day::Thursday, "15:00 T"),
    ]);
    assert_eq!(subject.schedule(), &[slot(Day::Thursday, "15:00 T")]);
}

#[test]
fn assignments_require_title_and_valid_deadline() {
    let mut subject = Subject::new("History");
    assert_eq!(
        subject.add_assignment("", "2025-01-01"),
        Err(SubjectError::EmptyAssignmentTitle)
    );
    assert_eq!(
        subject.add_assignment("Essay", " "),
        Err(SubjectError::EmptyDeadline)
    );
    assert!(matches!(
        subject.add_assignment("Essay", "next friday"),
        Err(SubjectError::InvalidDeadline(_))
    ));
    assert!(subject.assignments.is_empty());

    let idx = subject.add_assignment("Essay", "2025-02-10").unwrap();
    assert_eq!(idx, 0);
    assert!(!subject.assignments[0].completed);
    assert_eq!(
        subject.assignments[0].deadline_date(),
        chrono::NaiveDate::from_ymd_opt(2025, 2, 10)
    );
}

#[test]
fn completing_an_assignment_hides_it_from_pending() {
    let subject = sample_subject();
    let pending: Vec<_> = subject
        .pending_assignments()
        .map(|(idx, a)| (idx, a.title.clone()))
        .collect();
    assert_eq!(pending, vec![(1, "Paging quiz".to_string())]);

    let mut subject = subject;
    assert_eq!(
        subject.complete_assignment(7),
        Err(SubjectError::AssignmentNotFound(7))
    );
}

#[test]
fn serialized_record_has_the_seven_fields() {
    let value = serde_json::to_value(sample_subject()).unwrap();
    let object = value.as_object().unwrap();
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "assignments",
            "attended",
            "code",
            "conducted",
            "name",
            "professor",
            "schedule"
        ]
    );
    assert_eq!(
        value["schedule"][0],
        json!({ "day": "Monday", "time": "09:00 - 09:50 (Theory)" })
    );
    assert_eq!(
        value["assignments"][0],
        json!({ "title": "Shell lab", "deadline": "2025-03-14", "completed": true })
    );
}

#[test]
fn record_round_trips() {
    let subjects = vec![
        sample_subject(),
        Subject::new("Empty"),
        Subject::with_details("Only details", "X1", ""),
    ];
    for subject in subjects {
        let json = serde_json::to_string(&subject).unwrap();
        let loaded: Subject = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, subject);
    }
}

#[test]
fn loading_defaults_missing_fields() {
    let loaded: Subject = serde_json::from_value(json!({})).unwrap();
    assert_eq!(loaded.name, "Unknown");
    assert_eq!((loaded.attended, loaded.conducted), (0, 0));
    assert!(loaded.code.is_empty());
    assert!(loaded.professor.is_empty());
    assert!(loaded.schedule().is_empty());
    assert!(loaded.assignments.is_empty());
}

#[test]
fn loading_tolerates_extra_keys_and_bad_types() {
    let loaded: Subject = serde_json::from_value(json!({
        "name": "Maths",
        "attended": "lots",
        "conducted": -3,
        "code": 42,
        "colour": "blue",
        "schedule": [
            { "day": "Monday", "time": "08:00 - 08:50 (Theory)" },
            { "day": "Saturday", "time": "08:00 - 08:50 (Theory)" },
            { "day": "Monday", "time": "08:00 - 08:50 (Theory)" },
            "garbage"
        ],
        "assignments": [
            { "title": "Sheet 1" },
            { "deadline": "2025-05-01", "completed": "yes" }
        ]
    }))
    .unwrap();

    assert_eq!(loaded.name, "Maths");
    assert_eq!((loaded.attended, loaded.conducted), (0, 0));
    assert_eq!(loaded.code, "");
    assert_eq!(loaded.schedule(), &[slot(Day::Monday, "08:00 T")]);
    assert_eq!(loaded.assignments.len(), 2);
    assert_eq!(loaded.assignments[0].title, "Sheet 1");
    assert_eq!(loaded.assignments[0].deadline, "");
    assert!(!loaded.assignments[1].completed);
    assert_eq!(loaded.assignments[1].title, "");
}
