/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Multi-event management with centralized notice routing.
//!
//! This module provides event management through a trait-based design, with implementations
//! for both standard library (`EventManagerStd`) and Tokio (`EventManagerTokio`) channels.
//! Managers resolve events, refuse enrollment once the window has closed, and forward every
//! committed enrollment change to a single notice processor.

use crate::enrollment::engine::{DisenrollOutcome, EnrollmentEngine};
use crate::enrollment::error::EnrollmentError;
use crate::enrollment::event::Event;
use crate::enrollment::notice::{EnrollmentListener, EnrollmentNotice};
use crate::enrollment::record::Enrollment;
use crate::enrollment::store::{EnrollmentStore, InMemoryEnrollmentStore};
use crate::enrollment::types::{AccountId, EventId};
use crate::utils::current_time_millis;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

/// Trait for managing multiple events with centralized notice routing.
///
/// This trait defines the interface for event managers, allowing different
/// implementations using various channel types (std::mpsc, tokio::mpsc, etc.).
pub trait EventManager<S>
where
    S: EnrollmentStore,
{
    /// Register an event and return its identifier.
    fn add_event(&mut self, event: Event) -> EventId;

    /// Get a reference to an event by id.
    fn get_event(&self, event_id: EventId) -> Option<&Event>;

    /// Get a mutable reference to an event by id.
    fn get_event_mut(&mut self, event_id: EventId) -> Option<&mut Event>;

    /// Get the ids of all events in this manager.
    fn event_ids(&self) -> Vec<EventId>;

    /// Remove an event together with all of its enrollments.
    fn remove_event(&mut self, event_id: EventId) -> Result<Option<Event>, EnrollmentError>;

    /// Check if an event exists.
    fn has_event(&self, event_id: EventId) -> bool;

    /// Get the number of events in this manager.
    fn event_count(&self) -> usize;

    /// The engine that decides enrollments for every managed event.
    fn engine(&self) -> &EnrollmentEngine<S>;

    /// Enroll an account, refusing events whose enrollment window has closed.
    ///
    /// # Errors
    /// - [`EnrollmentError::EventNotFound`] for unknown events
    /// - [`EnrollmentError::EventClosed`] after `end_enrollment_at`
    /// - any error of [`EnrollmentEngine::enroll`]
    fn enroll(
        &self,
        event_id: EventId,
        account_id: AccountId,
    ) -> Result<Enrollment, EnrollmentError> {
        let event = self
            .get_event(event_id)
            .ok_or(EnrollmentError::EventNotFound(event_id))?;
        if !event.is_enrollable_at(current_time_millis()) {
            return Err(EnrollmentError::EventClosed {
                event_id,
                end_enrollment_at: event.end_enrollment_at(),
            });
        }
        self.engine().enroll(event, account_id)
    }

    /// Disenroll an account from a managed event.
    ///
    /// # Errors
    /// - [`EnrollmentError::EventNotFound`] for unknown events
    /// - any error of [`EnrollmentEngine::disenroll`]
    fn disenroll(
        &self,
        event_id: EventId,
        account_id: AccountId,
    ) -> Result<DisenrollOutcome, EnrollmentError> {
        let event = self
            .get_event(event_id)
            .ok_or(EnrollmentError::EventNotFound(event_id))?;
        self.engine().disenroll(event, account_id)
    }

    /// Change the capacity of a managed event, promoting waiters on FCFS events.
    ///
    /// # Errors
    /// - [`EnrollmentError::EventNotFound`] for unknown events
    /// - any error of [`EnrollmentEngine::update_limit`]
    fn update_limit(
        &mut self,
        event_id: EventId,
        new_limit: u32,
    ) -> Result<Vec<Enrollment>, EnrollmentError> {
        let mut event = self
            .get_event(event_id)
            .cloned()
            .ok_or(EnrollmentError::EventNotFound(event_id))?;
        let promoted = self.engine().update_limit(&mut event, new_limit)?;
        if let Some(slot) = self.get_event_mut(event_id) {
            *slot = event;
        }
        Ok(promoted)
    }
}

/// Builds a listener that forwards every notice through `send`.
fn forwarding_listener<F>(send: F) -> EnrollmentListener
where
    F: Fn(EnrollmentNotice) -> Result<(), String> + Send + Sync + 'static,
{
    Arc::new(move |notice: &EnrollmentNotice| {
        let event_id = notice.event_id;
        if let Err(e) = send(notice.clone()) {
            error!("Failed to send enrollment notice for {}: {}", event_id, e);
        }
    })
}

/// Log a single committed enrollment change.
fn process_notice(notice: EnrollmentNotice) {
    info!(
        "Processing notice for event {}: {:?} (account: {}, enrollment: {})",
        notice.event_id, notice.kind, notice.account_id, notice.enrollment_id
    );
}

/// EventManager implementation using standard library mpsc channels.
pub struct EventManagerStd<S = InMemoryEnrollmentStore>
where
    S: EnrollmentStore,
{
    /// Collection of events indexed by id
    events: HashMap<EventId, Event>,
    /// Engine wired to the notice channel
    engine: EnrollmentEngine<S>,
    /// Receiver for notices (taken when processor starts)
    notice_receiver: Option<std::sync::mpsc::Receiver<EnrollmentNotice>>,
}

impl EventManagerStd<InMemoryEnrollmentStore> {
    /// Create a new EventManagerStd over an in-memory store.
    pub fn new() -> Self {
        Self::with_store(InMemoryEnrollmentStore::new())
    }
}

impl<S> EventManagerStd<S>
where
    S: EnrollmentStore,
{
    /// Create a new EventManagerStd over `store` with a standard library mpsc channel.
    pub fn with_store(store: S) -> Self {
        let (sender, receiver) = std::sync::mpsc::channel();
        let listener = forwarding_listener(move |notice| {
            sender.send(notice).map_err(|e| e.to_string())
        });

        Self {
            events: HashMap::new(),
            engine: EnrollmentEngine::with_listener(store, listener),
            notice_receiver: Some(receiver),
        }
    }

    /// Take the notice receiver to consume notices directly instead of
    /// starting the processor.
    pub fn take_notice_receiver(&mut self) -> Option<std::sync::mpsc::Receiver<EnrollmentNotice>> {
        self.notice_receiver.take()
    }

    /// Start the notice processor in a separate thread.
    ///
    /// # Errors
    /// Returns [`EnrollmentError::InvalidOperation`] if the receiver was
    /// already taken.
    pub fn start_notice_processor(
        &mut self,
    ) -> Result<std::thread::JoinHandle<()>, EnrollmentError> {
        let receiver =
            self.notice_receiver
                .take()
                .ok_or_else(|| EnrollmentError::InvalidOperation {
                    message: "Notice processor already started".to_string(),
                })?;

        Ok(std::thread::spawn(move || {
            info!("Notice processor started");

            while let Ok(notice) = receiver.recv() {
                process_notice(notice);
            }

            info!("Notice processor stopped");
        }))
    }
}

impl<S> EventManager<S> for EventManagerStd<S>
where
    S: EnrollmentStore,
{
    fn add_event(&mut self, event: Event) -> EventId {
        let event_id = event.id();
        info!("Added {} event {}: {}", event.enrollment_type(), event_id, event.title());
        self.events.insert(event_id, event);
        event_id
    }

    fn get_event(&self, event_id: EventId) -> Option<&Event> {
        self.events.get(&event_id)
    }

    fn get_event_mut(&mut self, event_id: EventId) -> Option<&mut Event> {
        self.events.get_mut(&event_id)
    }

    fn event_ids(&self) -> Vec<EventId> {
        self.events.keys().copied().collect()
    }

    fn remove_event(&mut self, event_id: EventId) -> Result<Option<Event>, EnrollmentError> {
        if !self.events.contains_key(&event_id) {
            return Ok(None);
        }
        // Enrollments go first so a store failure leaves the event registered.
        self.engine.cancel_event(event_id)?;
        let result = self.events.remove(&event_id);
        info!("Removed event: {}", event_id);
        Ok(result)
    }

    fn has_event(&self, event_id: EventId) -> bool {
        self.events.contains_key(&event_id)
    }

    fn event_count(&self) -> usize {
        self.events.len()
    }

    fn engine(&self) -> &EnrollmentEngine<S> {
        &self.engine
    }
}

impl Default for EventManagerStd<InMemoryEnrollmentStore> {
    fn default() -> Self {
        Self::new()
    }
}

/// EventManager implementation using Tokio mpsc channels.
pub struct EventManagerTokio<S = InMemoryEnrollmentStore>
where
    S: EnrollmentStore,
{
    /// Collection of events indexed by id
    events: HashMap<EventId, Event>,
    /// Engine wired to the notice channel
    engine: EnrollmentEngine<S>,
    /// Receiver for notices (taken when processor starts)
    notice_receiver: Option<tokio::sync::mpsc::UnboundedReceiver<EnrollmentNotice>>,
}

impl EventManagerTokio<InMemoryEnrollmentStore> {
    /// Create a new EventManagerTokio over an in-memory store.
    pub fn new() -> Self {
        Self::with_store(InMemoryEnrollmentStore::new())
    }
}

impl<S> EventManagerTokio<S>
where
    S: EnrollmentStore,
{
    /// Create a new EventManagerTokio over `store` with a Tokio unbounded mpsc channel.
    pub fn with_store(store: S) -> Self {
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
        let listener = forwarding_listener(move |notice| {
            sender.send(notice).map_err(|e| e.to_string())
        });

        Self {
            events: HashMap::new(),
            engine: EnrollmentEngine::with_listener(store, listener),
            notice_receiver: Some(receiver),
        }
    }

    /// Take the notice receiver to consume notices directly instead of
    /// starting the processor.
    pub fn take_notice_receiver(
        &mut self,
    ) -> Option<tokio::sync::mpsc::UnboundedReceiver<EnrollmentNotice>> {
        self.notice_receiver.take()
    }

    /// Start the notice processor as an async task.
    ///
    /// Returns a JoinHandle for the spawned task.
    ///
    /// # Errors
    /// Returns [`EnrollmentError::InvalidOperation`] if the receiver was
    /// already taken.
    pub fn start_notice_processor(
        &mut self,
    ) -> Result<tokio::task::JoinHandle<()>, EnrollmentError> {
        let mut receiver =
            self.notice_receiver
                .take()
                .ok_or_else(|| EnrollmentError::InvalidOperation {
                    message: "Notice processor already started".to_string(),
                })?;

        Ok(tokio::spawn(async move {
            info!("Notice processor started (Tokio)");

            while let Some(notice) = receiver.recv().await {
                process_notice(notice);
            }

            info!("Notice processor stopped (Tokio)");
        }))
    }
}

impl<S> EventManager<S> for EventManagerTokio<S>
where
    S: EnrollmentStore,
{
    fn add_event(&mut self, event: Event) -> EventId {
        let event_id = event.id();
        info!("Added {} event {}: {}", event.enrollment_type(), event_id, event.title());
        self.events.insert(event_id, event);
        event_id
    }

    fn get_event(&self, event_id: EventId) -> Option<&Event> {
        self.events.get(&event_id)
    }

    fn get_event_mut(&mut self, event_id: EventId) -> Option<&mut Event> {
        self.events.get_mut(&event_id)
    }

    fn event_ids(&self) -> Vec<EventId> {
        self.events.keys().copied().collect()
    }

    fn remove_event(&mut self, event_id: EventId) -> Result<Option<Event>, EnrollmentError> {
        if !self.events.contains_key(&event_id) {
            return Ok(None);
        }
        // Enrollments go first so a store failure leaves the event registered.
        self.engine.cancel_event(event_id)?;
        let result = self.events.remove(&event_id);
        info!("Removed event: {}", event_id);
        Ok(result)
    }

    fn has_event(&self, event_id: EventId) -> bool {
        self.events.contains_key(&event_id)
    }

    fn event_count(&self) -> usize {
        self.events.len()
    }

    fn engine(&self) -> &EnrollmentEngine<S> {
        &self.engine
    }
}

impl Default for EventManagerTokio<InMemoryEnrollmentStore> {
    fn default() -> Self {
        Self::new()
    }
}
