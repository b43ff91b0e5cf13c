//! DeskStore behind the ComplaintStore trait.

use chrono::{TimeZone, Utc};
use civic_desk_core::{
    complaint::{Complaint, ComplaintPatch, ComplaintStatus, Location, StaffMember},
    error::ErrorKind,
    store::{ComplaintStore, DeskStore},
};

fn migrated() -> DeskStore {
    let store = DeskStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn record(id: &str) -> Complaint {
    Complaint {
        complaint_id: id.into(),
        title: "Overflowing bin".into(),
        description: "Garbage not collected for a week".into(),
        category_id: "cat2".into(),
        city: None,
        country: None,
        location: Location { lat: -33.86, lng: 151.21, pixel: None },
        photo: Some("uploads/bin.jpg".into()),
        reported_by: "citizen-1".into(),
        status: ComplaintStatus::Open,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        resolved_at: None,
        sla_hours: 72,
        assigned_to: None,
    }
}

#[test]
fn insert_then_find_round_trips_the_record() {
    let store = migrated();
    let inserted = store.insert(&record("cmp-1")).unwrap();
    assert_eq!(inserted, record("cmp-1"));
    assert_eq!(store.find_by_id("cmp-1").unwrap(), record("cmp-1"));
    assert_eq!(store.find_all().unwrap().len(), 1);
}

#[test]
fn duplicate_id_is_a_store_failure() {
    let store = migrated();
    store.insert(&record("cmp-1")).unwrap();
    let err = store.insert(&record("cmp-1")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
}

#[test]
fn partial_update_only_touches_given_columns() {
    let store = migrated();
    store.insert(&record("cmp-1")).unwrap();
    let staff = StaffMember {
        staff_id: "stf-1".into(),
        full_name: "Lena Hart".into(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    };
    store.insert_staff(&staff).unwrap();

    let assigned = store
        .update(
            "cmp-1",
            &ComplaintPatch { assigned_to: Some("stf-1".into()), ..ComplaintPatch::default() },
        )
        .unwrap();
    assert_eq!(assigned.assigned_to.as_deref(), Some("stf-1"));
    assert_eq!(assigned.status, ComplaintStatus::Open);
    assert_eq!(assigned.sla_hours, 72);

    let resolved_at = Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap();
    let resolved = store
        .update(
            "cmp-1",
            &ComplaintPatch {
                status: Some(ComplaintStatus::Resolved),
                resolved_at: Some(resolved_at),
                ..ComplaintPatch::default()
            },
        )
        .unwrap();
    assert_eq!(resolved.resolved_at, Some(resolved_at));
    assert_eq!(resolved.assigned_to.as_deref(), Some("stf-1"));
}

#[test]
fn update_unknown_id_is_not_found() {
    let store = migrated();
    let err = store
        .update(
            "cmp-missing",
            &ComplaintPatch { status: Some(ComplaintStatus::InProgress), ..ComplaintPatch::default() },
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn schema_rejects_resolved_without_timestamp() {
    let store = migrated();
    store.insert(&record("cmp-1")).unwrap();
    let err = store
        .update(
            "cmp-1",
            &ComplaintPatch { status: Some(ComplaintStatus::Resolved), ..ComplaintPatch::default() },
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    assert_eq!(store.find_by_id("cmp-1").unwrap().status, ComplaintStatus::Open);
}

#[test]
fn unknown_staff_lookup_is_not_found() {
    let store = migrated();
    assert_eq!(store.find_staff("stf-x").unwrap_err().kind(), ErrorKind::NotFound);
    assert!(store.list_staff().unwrap().is_empty());
}

#[test]
fn migrate_is_repeatable() {
    let store = migrated();
    store.migrate().expect("second migration is a no-op");
}

#[test]
fn category_catalog_is_seeded_once() {
    let store = migrated();
    store.migrate().unwrap();
    let categories = store.list_categories().unwrap();
    assert_eq!(categories.len(), 9);
    assert_eq!(store.find_category("cat5").unwrap().name, "Plumbing & Water Supply");
    assert_eq!(
        store.find_category("roads").unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn complaint_with_unknown_category_is_refused_by_the_schema() {
    let store = migrated();
    let mut bad = record("cmp-1");
    bad.category_id = "cat99".into();
    assert_eq!(store.insert(&bad).unwrap_err().kind(), ErrorKind::StoreUnavailable);
    assert!(store.find_all().unwrap().is_empty());
}

#[test]
fn empty_patch_returns_the_stored_record() {
    let store = migrated();
    store.insert(&record("cmp-1")).unwrap();
    let unchanged = store.update("cmp-1", &ComplaintPatch::default()).unwrap();
    assert_eq!(unchanged, record("cmp-1"));
    assert_eq!(
        store.update("cmp-missing", &ComplaintPatch::default()).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}
