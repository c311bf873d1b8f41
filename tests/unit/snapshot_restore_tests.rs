//! Backup and restore of event enrollments.

use study_enrollment::{
    AccountId, DefaultEnrollmentEngine, EnrollmentError, EnrollmentSnapshotPackage,
    EnrollmentType, Event, InMemoryEnrollmentStore,
};

fn engine() -> DefaultEnrollmentEngine {
    DefaultEnrollmentEngine::new(InMemoryEnrollmentStore::new())
}

fn populated(limit: u32, accounts: &[&str]) -> (DefaultEnrollmentEngine, Event) {
    let engine = engine();
    let event = Event::new("snapshot", EnrollmentType::Fcfs, limit).expect("event");
    for name in accounts {
        engine
            .enroll(&event, AccountId::from_name(name))
            .expect("enroll");
    }
    (engine, event)
}

#[test]
fn restore_into_fresh_engine_preserves_state() {
    let (source, event) = populated(2, &["a", "b", "c", "d"]);
    source
        .disenroll(&event, AccountId::from_name("a"))
        .expect("disenroll");
    let before = source.enrollments(event.id()).expect("list");

    let package = source.create_snapshot_package(event.id()).expect("package");
    let target = engine();
    let restored = target
        .restore_from_snapshot_package(&event, package)
        .expect("restore");

    assert_eq!(restored, 3);
    assert_eq!(target.enrollments(event.id()).expect("list"), before);
    assert_eq!(target.accepted_count(event.id()).expect("count"), 2);
    assert_eq!(target.waiting_count(event.id()).expect("count"), 1);
}

#[test]
fn enrollments_after_restore_sort_last() {
    let (source, event) = populated(1, &["a", "b"]);
    let package = source.create_snapshot_package(event.id()).expect("package");
    let newest = package.snapshot.newest_enrolled_at().expect("non-empty");

    let target = engine();
    target
        .restore_from_snapshot_package(&event, package)
        .expect("restore");

    let late = target
        .enroll(&event, AccountId::from_name("late"))
        .expect("enroll");
    assert!(late.enrolled_at > newest);
    assert!(!late.accepted);

    let ids: Vec<_> = target
        .enrollments(event.id())
        .expect("list")
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids.len(), 3);
    assert!(ids[..2].iter().all(|id| *id != late.id));

    // Promotion keeps FIFO order across the restore boundary.
    let outcome = target
        .disenroll(&event, AccountId::from_name("a"))
        .expect("disenroll");
    assert_eq!(
        outcome.promoted.map(|e| e.account_id),
        Some(AccountId::from_name("b"))
    );
}

#[test]
fn json_round_trip_restores() {
    let (source, event) = populated(3, &["x", "y"]);
    let json = source.snapshot_to_json(event.id()).expect("json");

    let target = engine();
    let restored = target
        .restore_from_snapshot_json(&event, &json)
        .expect("restore");
    assert_eq!(restored, 2);
    assert_eq!(
        target.enrollments(event.id()).expect("list"),
        source.enrollments(event.id()).expect("list")
    );
}

#[test]
fn restore_replaces_existing_enrollments() {
    let (source, event) = populated(2, &["a"]);
    let package = source.create_snapshot_package(event.id()).expect("package");
    source
        .enroll(&event, AccountId::from_name("b"))
        .expect("enroll");

    source
        .restore_from_snapshot_package(&event, package)
        .expect("restore");
    let accounts: Vec<_> = source
        .enrollments(event.id())
        .expect("list")
        .into_iter()
        .map(|e| e.account_id)
        .collect();
    assert_eq!(accounts, vec![AccountId::from_name("a")]);
}

#[test]
fn tampered_package_is_rejected() {
    let (source, event) = populated(1, &["a", "b"]);
    let mut package = source.create_snapshot_package(event.id()).expect("package");
    package.snapshot.enrollments[1].accepted = true;

    let target = engine();
    let result = target.restore_from_snapshot_package(&event, package);
    assert!(matches!(result, Err(EnrollmentError::ChecksumMismatch { .. })));
    assert!(target.enrollments(event.id()).expect("list").is_empty());
}

#[test]
fn unknown_version_is_rejected() {
    let (source, event) = populated(1, &["a"]);
    let mut package = source.create_snapshot_package(event.id()).expect("package");
    package.version += 1;

    let result = engine().restore_from_snapshot_package(&event, package);
    assert!(matches!(result, Err(EnrollmentError::InvalidOperation { .. })));
}

#[test]
fn package_for_another_event_is_rejected() {
    let (source, event) = populated(1, &["a"]);
    let package = source.create_snapshot_package(event.id()).expect("package");
    let other = Event::new("other", EnrollmentType::Fcfs, 1).expect("event");

    let result = engine().restore_from_snapshot_package(&other, package);
    assert!(matches!(result, Err(EnrollmentError::InvalidOperation { .. })));
}

#[test]
fn duplicate_accounts_are_rejected() {
    let (source, event) = populated(3, &["a", "b"]);
    let mut snapshot = source.snapshot(event.id()).expect("snapshot");
    snapshot.enrollments[1].account_id = snapshot.enrollments[0].account_id;
    let package = EnrollmentSnapshotPackage::new(snapshot).expect("package");

    let target = engine();
    let result = target.restore_from_snapshot_package(&event, package);
    assert!(matches!(result, Err(EnrollmentError::InvalidOperation { .. })));
    assert!(target.enrollments(event.id()).expect("list").is_empty());
}

#[test]
fn over_limit_fcfs_snapshot_is_rejected() {
    let (source, event) = populated(1, &["a", "b"]);
    let mut snapshot = source.snapshot(event.id()).expect("snapshot");
    snapshot.enrollments[1].accepted = true;
    let package = EnrollmentSnapshotPackage::new(snapshot).expect("package");

    let result = engine().restore_from_snapshot_package(&event, package);
    assert!(matches!(
        result,
        Err(EnrollmentError::InvalidLimit {
            requested: 1,
            accepted: 2
        })
    ));
}

#[test]
fn garbage_json_is_a_deserialization_error() {
    let event = Event::new("json", EnrollmentType::Fcfs, 1).expect("event");
    let result = engine().restore_from_snapshot_json(&event, "{not json");
    assert!(matches!(
        result,
        Err(EnrollmentError::DeserializationError { .. })
    ));
}

#[test]
fn duplicate_enrollment_ids_are_rejected() {
    let (source, event) = populated(3, &["a", "b"]);
    let mut snapshot = source.snapshot(event.id()).expect("snapshot");
    snapshot.enrollments[1].id = snapshot.enrollments[0].id;
    let package = EnrollmentSnapshotPackage::new(snapshot).expect("package");

    let target = engine();
    let result = target.restore_from_snapshot_package(&event, package);
    assert!(matches!(result, Err(EnrollmentError::InvalidOperation { .. })));
    assert!(target.enrollments(event.id()).expect("list").is_empty());
}

#[test]
fn checked_in_waiting_enrollment_is_rejected() {
    let (source, event) = populated(1, &["a", "b"]);
    let mut snapshot = source.snapshot(event.id()).expect("snapshot");
    assert!(!snapshot.enrollments[1].accepted);
    snapshot.enrollments[1].attended = true;
    let package = EnrollmentSnapshotPackage::new(snapshot).expect("package");

    let target = engine();
    let result = target.restore_from_snapshot_package(&event, package);
    assert!(matches!(result, Err(EnrollmentError::InvalidOperation { .. })));
    assert!(target.enrollments(event.id()).expect("list").is_empty());
}

#[test]
fn checked_in_accepted_enrollment_restores() {
    let (source, event) = populated(1, &["a", "b"]);
    let accepted = source.enrollments(event.id()).expect("list")[0].id;
    source.check_in(&event, accepted).expect("check in");

    let package = source.create_snapshot_package(event.id()).expect("package");
    let target = engine();
    target
        .restore_from_snapshot_package(&event, package)
        .expect("restore");
    let restored = target.enrollments(event.id()).expect("list");
    assert!(restored[0].attended);
}
