//! Example demonstrating notice routing through an event manager.
//!
//! This example shows how to:
//! 1. Manage FCFS and confirmative events with one `EventManagerStd`
//! 2. Consume committed enrollment notices from the manager's channel
//! 3. Accept and check in a confirmative enrollment
//! 4. Cancel an event together with its enrollments

use serde::Serialize;
use study_enrollment::prelude::*;
use tracing::{info, warn};

#[derive(Serialize)]
struct NoticeLine {
    event: String,
    enrollment: u64,
    kind: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("Starting manager notices example");

    let mut manager = EventManagerStd::new();
    let receiver = manager
        .take_notice_receiver()
        .ok_or("notice receiver already taken")?;

    let meetup = manager.add_event(Event::new("Weekly meetup", EnrollmentType::Fcfs, 2)?);
    let workshop = manager.add_event(Event::new(
        "Invite-only workshop",
        EnrollmentType::Confirmative,
        1,
    )?);

    for name in ["ann", "bob", "cid"] {
        if let Err(e) = manager.enroll(meetup, AccountId::from_name(name)) {
            warn!("Failed to enroll {} in meetup: {}", name, e);
        }
    }
    manager.disenroll(meetup, AccountId::from_name("ann"))?;

    let pending = manager.enroll(workshop, AccountId::from_name("dee"))?;
    if let Some(event) = manager.get_event(workshop) {
        manager.engine().accept_enrollment(event, pending.id)?;
        manager.engine().check_in(event, pending.id)?;
    }

    while let Ok(notice) = receiver.try_recv() {
        let line = NoticeLine {
            event: notice.event_id.as_uuid().to_string(),
            enrollment: notice.enrollment_id.as_u64(),
            kind: format!("{:?}", notice.kind),
        };
        info!("{}", serde_json::to_string(&line)?);
    }

    if let Some(removed) = manager.remove_event(meetup)? {
        info!("Cancelled '{}'", removed.title());
    }
    info!("{} event(s) left", manager.event_count());

    Ok(())
}
