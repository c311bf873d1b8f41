//! Walks through an FCFS event with a one-seat limit.
//!
//! May takes the seat, June waits, May leaves and June is promoted.
//! Re-enrolling puts May at the back of the line.

use std::error::Error;
use study_enrollment::{
    AccountId, DefaultEnrollmentEngine, EnrollmentType, Event, InMemoryEnrollmentStore,
};
use tracing::info;
use uuid::Uuid;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let engine = DefaultEnrollmentEngine::new(InMemoryEnrollmentStore::new());
    let event = Event::new("Rust study night", EnrollmentType::Fcfs, 1)?;
    info!(
        "Created {} event '{}' with {} seat(s)",
        event.enrollment_type(),
        event.title(),
        event.limit_of_enrollments()
    );

    let may = AccountId::from_name("may");
    let june = AccountId::from_name("june");

    let first = engine.enroll(&event, may)?;
    info!("may enrolled: {:?}", first.status());
    let second = engine.enroll(&event, june)?;
    info!("june enrolled: {:?}", second.status());

    // Accounts from an external directory keep their own ids
    let guest = AccountId::from_uuid(Uuid::new_v4());
    let third = engine.enroll(&event, guest)?;
    info!("guest enrolled: {:?}", third.status());

    let outcome = engine.disenroll(&event, may)?;
    if let Some(promoted) = &outcome.promoted {
        info!("may left; {} promoted to {:?}", promoted.id, promoted.status());
    }

    let again = engine.enroll(&event, may)?;
    info!("may re-enrolled: {:?}", again.status());

    for enrollment in engine.enrollments(event.id())? {
        info!(
            "{} account={} enrolled_at={} status={:?}",
            enrollment.id,
            enrollment.account_id,
            enrollment.enrolled_at,
            enrollment.status()
        );
    }

    // Adding a seat promotes the head of the waitlist
    let mut event = event;
    let promoted = engine.update_limit(&mut event, 2)?;
    info!("Limit raised to 2, promoted {} waiter(s)", promoted.len());
    info!("Remaining spots: {}", engine.remaining_spots(&event)?);

    let json = engine.snapshot_to_json(event.id())?;
    let value: serde_json::Value = serde_json::from_str(&json)?;
    info!("Snapshot checksum: {}", value["checksum"]);

    Ok(())
}
