use bunk_tracker::{Day, Forecast, Semester, SemesterError, Slot, SubjectError, TimeSlot};

fn slot(day: Day, label: &str) -> Slot {
    Slot::new(day, TimeSlot::find(label).unwrap())
}

fn build_semester() -> Semester {
    let mut semester = Semester::new();
    let algo = semester.add_subject("Algorithms", "CS201", "Dr. Knuth").unwrap();
    let labs = semester.add_subject("Electronics Lab", "EE110", "").unwrap();
    let maths = semester.add_subject("Maths", "MA101", "Dr. Noether").unwrap();

    semester
        .set_schedule(
            algo,
            [slot(Day::Monday, "09:00 T"), slot(Day::Monday, "08:00 T")],
        )
        .unwrap();
    semester
        .set_schedule(
            labs,
            [
                slot(Day::Monday, "08:51 L"),
                slot(Day::Monday, "08:00 L"),
                slot(Day::Wednesday, "14:00 L"),
            ],
        )
        .unwrap();
    semester
        .set_schedule(
            maths,
            [slot(Day::Monday, "09:00 T"), slot(Day::Friday, "12:00 T")],
        )
        .unwrap();
    semester
}

#[test]
fn subjects_keep_insertion_order() {
    let semester = build_semester();
    let names: Vec<&str> = semester.subjects().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Algorithms", "Electronics Lab", "Maths"]);
    assert_eq!(semester.position_by_name("Maths"), Some(2));
    assert_eq!(semester.position_by_name("Art"), None);
}

#[test]
fn blank_subject_name_is_blocked() {
    let mut semester = Semester::new();
    assert_eq!(
        semester.add_subject("  ", "X", "Y"),
        Err(SemesterError::Subject(SubjectError::EmptyName))
    );
    assert!(semester.is_empty());
}

#[test]
fn missing_subject_index_is_reported() {
    let mut semester = build_semester();
    let before = semester.clone();
    assert_eq!(
        semester.mark_present(9).map(|_| ()),
        Err(SemesterError::SubjectNotFound(9))
    );
    assert_eq!(
        semester.remove_subject(3).map(|_| ()),
        Err(SemesterError::SubjectNotFound(3))
    );
    assert_eq!(semester, before);
}

#[test]
fn removing_a_subject_shifts_later_ones() {
    let mut semester = build_semester();
    let removed = semester.remove_subject(0).unwrap();
    assert_eq!(removed.name, "Algorithms");
    assert_eq!(semester.len(), 2);
    assert_eq!(semester.subject(0).unwrap().name, "Electronics Lab");
}

#[test]
fn classes_on_sort_by_stored_time_string() {
    let semester = build_semester();
    let monday: Vec<(String, &str)> = semester
        .classes_on(Day::Monday)
        .into_iter()
        .map(|c| (c.subject, c.time.display()))
        .collect();
    assert_eq!(
        monday,
        vec![
            ("Electronics Lab".to_string(), "08:00 - 08:50 (Lab)"),
            ("Algorithms".to_string(), "08:00 - 08:50 (Theory)"),
            ("Electronics Lab".to_string(), "08:51 - 09:40 (Lab)"),
            ("Algorithms".to_string(), "09:00 - 09:50 (Theory)"),
            ("Maths".to_string(), "09:00 - 09:50 (Theory)"),
        ]
    );
}

#[test]
fn free_day_has_no_classes() {
    let semester = build_semester();
    assert!(semester.classes_on(Day::Tuesday).is_empty());
}

#[test]
fn timetable_covers_each_weekday() {
    let semester = build_semester();
    let timetable = semester.timetable();
    let days: Vec<Day> = timetable.iter().map(|d| d.day).collect();
    assert_eq!(days, Day::ALL.to_vec());
    assert_eq!(timetable[2].classes.len(), 1);
    assert_eq!(timetable[2].classes[0].subject, "Electronics Lab");
    assert_eq!(timetable[4].classes[0].time.start(), "12:00");
}

#[test]
fn pending_assignments_follow_subject_then_insertion_order() {
    let mut semester = build_semester();
    semester.add_assignment(2, "Problem set 1", "2025-02-01").unwrap();
    semester.add_assignment(0, "Sorting essay", "2025-02-03").unwrap();
    semester.add_assignment(0, "Graph quiz", "2025-02-05").unwrap();
    semester.add_assignment(2, "Problem set 2", "2025-02-08").unwrap();
    semester.complete_assignment(0, 0).unwrap();

    let pending: Vec<(usize, usize, String)> = semester
        .pending_assignments()
        .into_iter()
        .map(|p| (p.subject_index, p.assignment_index, p.title))
        .collect();
    assert_eq!(
        pending,
        vec![
            (0, 1, "Graph quiz".to_string()),
            (2, 0, "Problem set 1".to_string()),
            (2, 1, "Problem set 2".to_string()),
        ]
    );
}

#[test]
fn assignment_validation_blocks_the_add() {
    let mut semester = build_semester();
    assert_eq!(
        semester.add_assignment(0, "", "2025-01-01"),
        Err(SemesterError::Subject(SubjectError::EmptyAssignmentTitle))
    );
    assert!(semester.subject(0).unwrap().assignments.is_empty());
}

#[test]
fn conflicts_list_shared_cells_only() {
    let semester = build_semester();
    let conflicts = semester.conflicts();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].slot, slot(Day::Monday, "09:00 T"));
    assert_eq!(conflicts[0].subjects, vec![0, 2]);
}

#[test]
fn forecast_follows_attendance_changes() {
    let mut semester = build_semester();
    assert_eq!(semester.forecast(), Forecast::NoData);

    for _ in 0..4 {
        semester.mark_present(1).unwrap();
    }
    assert_eq!(
        semester.forecast().to_string(),
        "Relax! Skip 1 in Electronics Lab."
    );

    semester.mark_absent(2).unwrap();
    assert_eq!(semester.forecast().to_string(), "Risk! Attend 3 in Maths.");
}

#[test]
fn edit_details_via_semester_targets_one_subject() {
    let mut semester = build_semester();
    semester
        .edit_details(1, "Digital Electronics", "EE111", "Dr. Shannon")
        .unwrap();
    let subject = semester.subject(1).unwrap();
    assert_eq!(subject.name, "Digital Electronics");
    assert_eq!(subject.schedule().len(), 3);
    assert_eq!(semester.subject(0).unwrap().name, "Algorithms");
}
