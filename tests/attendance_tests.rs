use bunk_tracker::attendance::{self, AttendanceStatus, Forecast};
use bunk_tracker::Subject;

fn subject(name: &str, attended: u32, conducted: u32) -> Subject {
    Subject::new(name).with_attendance(attended, conducted)
}

// a / c >= 3/4, compared exactly
fn ok(a: u32, c: u32) -> bool {
    4 * u64::from(a) >= 3 * u64::from(c)
}

#[test]
fn percentage_is_zero_without_classes() {
    assert_eq!(attendance::percentage(0, 0), 0.0);
    assert_eq!(attendance::percentage(5, 0), 0.0);
}

#[test]
fn percentage_matches_ratio() {
    for c in 1..=40u32 {
        for a in 0..=c {
            let expected = 100.0 * f64::from(a) / f64::from(c);
            assert!((attendance::percentage(a, c) - expected).abs() < 1e-9);
        }
    }
}

#[test]
fn safe_bunk_count_is_tight() {
    for c in 1..=80u32 {
        for a in 0..=c {
            if !ok(a, c) {
                continue;
            }
            let k = attendance::safe_bunks(a, c);
            assert!(ok(a, c + k), "a={a} c={c} k={k} drops below threshold");
            assert!(!ok(a, c + k + 1), "a={a} c={c} k={k} is not maximal");
        }
    }
}

#[test]
fn required_attendance_is_tight() {
    for c in 1..=80u32 {
        for a in 0..=c {
            if ok(a, c) {
                assert_eq!(attendance::required_attendance(a, c), 0);
                continue;
            }
            let m = attendance::required_attendance(a, c);
            assert!(m > 0);
            assert!(ok(a + m, c + m), "a={a} c={c} m={m} not enough");
            assert!(!ok(a + m - 1, c + m - 1), "a={a} c={c} m={m} not minimal");
        }
    }
}

#[test]
fn below_threshold_has_no_safe_bunks() {
    assert_eq!(attendance::safe_bunks(1, 4), 0);
    assert_eq!(attendance::safe_bunks(0, 10), 0);
}

#[test]
fn exactly_seventy_five_percent_is_safe_with_zero_bunks() {
    let s = subject("Networks", 3, 4);
    assert_eq!(s.status(), AttendanceStatus::Safe { can_bunk: 0 });
    assert_eq!(s.status().to_string(), "Safe to bunk: 0");
    assert!(s.is_safe());
}

#[test]
fn quarter_attendance_needs_eight_more() {
    let s = subject("Compilers", 1, 4);
    assert_eq!(s.status(), AttendanceStatus::AtRisk { must_attend: 8 });
    assert_eq!(s.status().to_string(), "Attend next: 8");
    assert!(!s.is_safe());
}

#[test]
fn new_subject_reports_no_data() {
    let s = Subject::new("Algorithms");
    assert_eq!(s.percentage(), 0.0);
    assert_eq!(s.status(), AttendanceStatus::NoData);
    assert_eq!(s.status().to_string(), "No classes conducted yet");
}

#[test]
fn attended_above_conducted_still_counts_as_safe() {
    let status = AttendanceStatus::evaluate(10, 4);
    assert_eq!(status, AttendanceStatus::Safe { can_bunk: 9 });
}

#[test]
fn forecast_prefers_first_at_risk_subject() {
    let a = subject("A", 0, 0);
    let b = subject("B", 2, 10);
    let c = subject("C", 8, 10);

    let orders = [
        vec![a.clone(), b.clone(), c.clone()],
        vec![c.clone(), a.clone(), b.clone()],
        vec![b.clone(), c.clone(), a.clone()],
        vec![c.clone(), b.clone(), a.clone()],
    ];
    for subjects in orders {
        match Forecast::from_subjects(&subjects) {
            Forecast::AtRisk {
                subject,
                must_attend,
                ..
            } => {
                assert_eq!(subject, "B");
                assert_eq!(must_attend, 22);
            }
            other => panic!("expected B to be at risk, got {other:?}"),
        }
    }
}

#[test]
fn forecast_reports_first_of_several_at_risk() {
    let subjects = vec![
        subject("Safe", 9, 10),
        subject("First", 1, 4),
        subject("Second", 0, 10),
    ];
    let forecast = Forecast::from_subjects(&subjects);
    assert_eq!(
        forecast,
        Forecast::AtRisk {
            index: 1,
            subject: "First".into(),
            must_attend: 8,
        }
    );
    assert_eq!(forecast.to_string(), "Risk! Attend 8 in First.");
}

#[test]
fn forecast_picks_largest_bunk_count_with_first_tie_winning() {
    let subjects = vec![
        subject("Low", 8, 10),
        subject("HighFirst", 20, 20),
        subject("HighSecond", 20, 20),
    ];
    let forecast = Forecast::from_subjects(&subjects);
    assert_eq!(
        forecast,
        Forecast::Safe {
            index: 1,
            subject: "HighFirst".into(),
            can_bunk: 6,
        }
    );
    assert_eq!(forecast.to_string(), "Relax! Skip 6 in HighFirst.");
}

#[test]
fn forecast_with_zero_bunks_still_names_a_subject() {
    let subjects = vec![subject("Edge", 3, 4)];
    assert_eq!(
        Forecast::from_subjects(&subjects).to_string(),
        "Relax! Skip 0 in Edge."
    );
}

#[test]
fn forecast_distinguishes_empty_and_unstarted() {
    assert_eq!(Forecast::from_subjects(&[]), Forecast::NoSubjects);
    assert_eq!(
        Forecast::NoSubjects.to_string(),
        "Add subjects to get started."
    );

    let unstarted = vec![Subject::new("A"), Subject::new("B")];
    assert_eq!(Forecast::from_subjects(&unstarted), Forecast::NoData);
    assert_eq!(Forecast::NoData.to_string(), "No attendance recorded yet.");
}
