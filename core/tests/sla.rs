//! SLA evaluation: the derived `overdue` flag.

use chrono::{DateTime, Duration, TimeZone, Utc};
use civic_desk_core::{
    complaint::{Complaint, ComplaintStatus, Location},
    sla::{deadline, effective_sla_hours, is_overdue, DEFAULT_SLA_HOURS},
};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

fn complaint(status: ComplaintStatus, sla_hours: u32) -> Complaint {
    let created_at = at(2024, 1, 1, 0, 0, 0);
    Complaint {
        complaint_id: "cmp-test".into(),
        title: "Pothole".into(),
        description: "Deep pothole on the corner".into(),
        category_id: "cat1".into(),
        city: Some("Pune".into()),
        country: Some("India".into()),
        location: Location { lat: 18.52, lng: 73.85, pixel: None },
        photo: None,
        reported_by: "citizen-1".into(),
        status,
        created_at,
        resolved_at: (status == ComplaintStatus::Resolved).then_some(created_at),
        sla_hours,
        assigned_to: None,
    }
}

/// 2024-01-01T00:00:00Z + 48h: one second either side of the deadline.
#[test]
fn open_complaint_flips_to_overdue_after_deadline() {
    let c = complaint(ComplaintStatus::Open, 48);
    assert!(!is_overdue(Some(&c), at(2024, 1, 2, 23, 59, 59)));
    assert!(is_overdue(Some(&c), at(2024, 1, 3, 0, 0, 1)));
}

#[test]
fn deadline_instant_itself_is_not_overdue() {
    let c = complaint(ComplaintStatus::Open, 48);
    let due = deadline(&c).expect("deadline in range");
    assert_eq!(due, at(2024, 1, 3, 0, 0, 0));
    assert!(!is_overdue(Some(&c), due));
}

#[test]
fn resolved_complaint_is_never_overdue() {
    let c = complaint(ComplaintStatus::Resolved, 1);
    for now in [
        at(2024, 1, 1, 0, 0, 0),
        at(2024, 1, 3, 0, 0, 1),
        at(2030, 6, 1, 12, 0, 0),
    ] {
        assert!(!is_overdue(Some(&c), now), "resolved complaint overdue at {now}");
    }
}

#[test]
fn in_progress_uses_the_same_window() {
    let c = complaint(ComplaintStatus::InProgress, 2);
    assert!(!is_overdue(Some(&c), at(2024, 1, 1, 2, 0, 0)));
    assert!(is_overdue(Some(&c), at(2024, 1, 1, 2, 0, 1)));
}

#[test]
fn absent_complaint_is_not_overdue() {
    assert!(!is_overdue(None, at(2099, 1, 1, 0, 0, 0)));
}

#[test]
fn zero_sla_hours_falls_back_to_default() {
    assert_eq!(effective_sla_hours(0), DEFAULT_SLA_HOURS);
    assert_eq!(effective_sla_hours(12), 12);

    let c = complaint(ComplaintStatus::Open, 0);
    assert!(!is_overdue(Some(&c), at(2024, 1, 2, 23, 59, 59)));
    assert!(is_overdue(Some(&c), at(2024, 1, 3, 0, 0, 1)));
}

#[test]
fn evaluation_is_pure() {
    let c = complaint(ComplaintStatus::Open, 48);
    let now = at(2024, 1, 3, 0, 0, 1);
    assert_eq!(is_overdue(Some(&c), now), is_overdue(Some(&c), now));
}

/// For every hour offset around the window, overdue == now > created + sla.
#[test]
fn matches_strict_deadline_formula_across_windows() {
    for sla_hours in [1u32, 24, 48, 72] {
        let c = complaint(ComplaintStatus::Open, sla_hours);
        for offset in -2i64..=2 {
            let now = c.created_at + Duration::hours(i64::from(sla_hours)) + Duration::seconds(offset);
            let expected = now > c.created_at + Duration::hours(i64::from(sla_hours));
            assert_eq!(
                is_overdue(Some(&c), now),
                expected,
                "sla={sla_hours} offset={offset}s"
            );
        }
    }
}
