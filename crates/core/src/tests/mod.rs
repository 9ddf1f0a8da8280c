// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use gearbook_domain::{
    EventId, EventStatus, InventoryNumber, IssueId, ItemId, ItemStatus, StockTypeId,
};

use crate::{EventCapacity, IssuanceFacts, ItemSnapshot, OpenIssueRef};

pub fn item_in_storage(id: i64) -> ItemSnapshot {
    ItemSnapshot {
        item_id: ItemId::new(id),
        inventory_number: InventoryNumber::new(&format!("INV-{id:03}")).unwrap(),
        stock_type_id: StockTypeId::new(1),
        status: ItemStatus::Storage,
        is_lost: false,
        has_open_repair: false,
        open_issue: None,
    }
}

pub fn item_at_event(id: i64, event: i64, issue: i64) -> ItemSnapshot {
    ItemSnapshot {
        status: ItemStatus::Event,
        open_issue: Some(OpenIssueRef {
            issue_id: IssueId::new(issue),
            event_id: EventId::new(event),
        }),
        ..item_in_storage(id)
    }
}

pub fn planned_event(id: i64, reserved: Option<u32>, open_issued: u32) -> EventCapacity {
    EventCapacity {
        event_id: EventId::new(id),
        status: EventStatus::Planned,
        reserved,
        open_issued,
    }
}

pub fn facts(item: ItemSnapshot, event: EventCapacity) -> IssuanceFacts {
    IssuanceFacts { item, event }
}
