// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod availability_tests;
mod concurrency_tests;
mod issuance_tests;

use gearbook::IssuanceOutcome;
use gearbook_audit::Actor;
use gearbook_domain::{
    CategoryId, DateRange, EventId, ItemId, PhysicalAttributes, StockTypeId, UserId,
};
use time::{Date, Month};

use crate::{IssuanceRecord, NewStockItem, NewStockType, Persistence};

/// Builds a January 2026 date.
pub fn jan(day: u8) -> Date {
    Date::from_calendar_date(2026, Month::January, day).expect("Valid test date")
}

pub fn jan_range(start: u8, end: u8) -> DateRange {
    DateRange::new(jan(start), jan(end)).expect("Valid test range")
}

pub fn create_test_actor() -> Actor {
    Actor::new(UserId::new(1), "quartermaster")
}

/// A store seeded with one category and one serialized type.
pub struct Fixture {
    pub persistence: Persistence,
    pub category_id: CategoryId,
    pub stock_type_id: StockTypeId,
    pub actor: Actor,
}

impl Fixture {
    pub fn new() -> Self {
        Self::seed(Persistence::new_in_memory().expect("Failed to create persistence"))
    }

    pub fn seed(mut persistence: Persistence) -> Self {
        let category_id: CategoryId = persistence
            .create_category("Audio", None)
            .expect("Failed to create category")
            .category_id;
        let stock_type_id: StockTypeId = persistence
            .create_stock_type(&NewStockType {
                category_id,
                subcategory_id: None,
                name: String::from("Speaker"),
                attributes: PhysicalAttributes::default(),
            })
            .expect("Failed to create stock type")
            .stock_type_id;

        Self {
            persistence,
            category_id,
            stock_type_id,
            actor: create_test_actor(),
        }
    }

    pub fn item(&mut self, inventory_number: &str) -> ItemId {
        self.persistence
            .create_item(&NewStockItem {
                stock_type_id: self.stock_type_id,
                inventory_number: inventory_number.to_string(),
                comment: None,
                photo: None,
            })
            .expect("Failed to create item")
            .item_id
    }

    /// Creates an event over Jan 10-15 with a reservation of `reserved` speakers.
    pub fn event(&mut self, name: &str, reserved: u32) -> EventId {
        let event_id: EventId = self
            .persistence
            .create_event(name, jan_range(10, 15), Some(UserId::new(9)))
            .expect("Failed to create event")
            .event_id;
        self.persistence
            .set_reservation(event_id, self.stock_type_id, reserved)
            .expect("Failed to set reservation");
        event_id
    }

    pub fn issue(&mut self, event_id: EventId, item_id: ItemId) -> IssuanceOutcome<IssuanceRecord> {
        let actor: Actor = self.actor.clone();
        self.persistence
            .issue_item(event_id, item_id, &actor)
            .expect("Issue failed")
    }

    pub fn return_item(
        &mut self,
        event_id: EventId,
        item_id: ItemId,
    ) -> IssuanceOutcome<IssuanceRecord> {
        let actor: Actor = self.actor.clone();
        self.persistence
            .return_item(event_id, item_id, &actor)
            .expect("Return failed")
    }

    pub fn transfer(
        &mut self,
        source: EventId,
        target: EventId,
        item_id: ItemId,
    ) -> IssuanceOutcome<IssuanceRecord> {
        let actor: Actor = self.actor.clone();
        self.persistence
            .transfer_item(source, target, item_id, &actor)
            .expect("Transfer failed")
    }
}
