// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared test fixtures for API tests.

use gearbook_audit::{
    Actor, AuditError, AuditEvent, AuditRecorder, MemoryAuditRecorder, MemoryNotifier,
    Notification, Notifier, NotifyError,
};
use gearbook_domain::{PhysicalAttributes, UserId};
use gearbook_persistence::Persistence;
use time::{Date, Month};

use crate::{
    Collaborators, CreateCategoryRequest, CreateEventRequest, CreateItemRequest,
    CreateStockTypeRequest, SetReservationRequest, create_category, create_event, create_item,
    create_stock_type, set_reservation,
};

/// Responsible user of events created by [`TestContext::event`].
pub const RESPONSIBLE_USER: i64 = 42;

pub fn jan(day: u8) -> Date {
    Date::from_calendar_date(2026, Month::January, day).expect("Valid test date")
}

pub fn create_test_actor() -> Actor {
    Actor::new(UserId::new(1), "quartermaster")
}

/// An in-memory store with recording collaborators.
pub struct TestContext {
    pub persistence: Persistence,
    pub audit: MemoryAuditRecorder,
    pub notifier: MemoryNotifier,
    pub actor: Actor,
    pub category_id: i64,
    pub stock_type_id: i64,
}

impl TestContext {
    pub fn new() -> Self {
        let mut persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create persistence");
        let audit = MemoryAuditRecorder::new();
        let notifier = MemoryNotifier::new();
        let actor: Actor = create_test_actor();

        let collaborators = Collaborators::new(&audit, &notifier);
        let category_id: i64 = create_category(
            &mut persistence,
            &collaborators,
            &CreateCategoryRequest {
                name: String::from("Lighting"),
                parent_id: None,
            },
            &actor,
        )
        .expect("Failed to create category")
        .category_id;
        let stock_type_id: i64 = create_stock_type(
            &mut persistence,
            &collaborators,
            &CreateStockTypeRequest {
                category_id,
                subcategory_id: None,
                name: String::from("Moving head"),
                attributes: PhysicalAttributes {
                    weight_kg: Some(21.5),
                    ..PhysicalAttributes::default()
                },
            },
            &actor,
        )
        .expect("Failed to create stock type")
        .stock_type_id;

        Self {
            persistence,
            audit,
            notifier,
            actor,
            category_id,
            stock_type_id,
        }
    }

    /// Registers a moving head with the given inventory number.
    pub fn item(&mut self, inventory_number: &str) -> i64 {
        let collaborators = Collaborators::new(&self.audit, &self.notifier);
        create_item(
            &mut self.persistence,
            &collaborators,
            &CreateItemRequest {
                stock_type_id: self.stock_type_id,
                inventory_number: inventory_number.to_string(),
                comment: None,
                photo: None,
            },
            &self.actor,
        )
        .expect("Failed to create item")
        .item_id
    }

    /// Creates an event over Jan 10-15 reserving `reserved` moving heads.
    pub fn event(&mut self, name: &str, reserved: u32) -> i64 {
        let collaborators = Collaborators::new(&self.audit, &self.notifier);
        let event_id: i64 = create_event(
            &mut self.persistence,
            &collaborators,
            &CreateEventRequest {
                name: name.to_string(),
                start_date: jan(10),
                end_date: jan(15),
                responsible_user_id: Some(RESPONSIBLE_USER),
            },
            &self.actor,
        )
        .expect("Failed to create event")
        .event_id;
        set_reservation(
            &mut self.persistence,
            &collaborators,
            &SetReservationRequest {
                event_id,
                stock_type_id: self.stock_type_id,
                quantity: reserved,
            },
            &self.actor,
        )
        .expect("Failed to set reservation");
        event_id
    }
}

/// A recorder whose backend is down.
pub struct FailingRecorder;

impl AuditRecorder for FailingRecorder {
    fn record(&self, _event: &AuditEvent) -> Result<(), AuditError> {
        Err(AuditError(String::from("audit store unavailable")))
    }
}

/// A notifier whose backend is down.
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _notification: &Notification) -> Result<(), NotifyError> {
        Err(NotifyError(String::from("mail relay unavailable")))
    }
}
