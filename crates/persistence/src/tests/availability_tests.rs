// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gearbook_domain::{
    AvailabilityReport, DomainError, EquipmentTypeId, EventId, RepairHoldStatus,
};

use super::{Fixture, jan, jan_range};
use crate::{BookingReport, PersistenceError};

fn cables(fixture: &mut Fixture, total: u32) -> EquipmentTypeId {
    fixture
        .persistence
        .create_equipment_type(fixture.category_id, "XLR cable", total)
        .unwrap()
        .equipment_type_id
}

#[test]
fn test_booking_reduces_overlapping_availability() {
    let mut fixture = Fixture::new();
    let cable: EquipmentTypeId = cables(&mut fixture, 5);
    let event_id: EventId = fixture.event("Festival", 0);

    fixture
        .persistence
        .set_booking(event_id, cable, 3, jan_range(10, 15))
        .unwrap();

    let report: AvailabilityReport = fixture
        .persistence
        .availability(cable, jan_range(12, 20), None)
        .unwrap();
    assert_eq!(report.reserved, 3);
    assert_eq!(report.available, 2);

    let later: AvailabilityReport = fixture
        .persistence
        .availability(cable, jan_range(16, 20), None)
        .unwrap();
    assert_eq!(later.available, 5);
}

#[test]
fn test_over_booking_is_stored_and_flagged() {
    let mut fixture = Fixture::new();
    let cable: EquipmentTypeId = cables(&mut fixture, 5);
    let first: EventId = fixture.event("Festival", 0);
    let second: EventId = fixture.event("Gala", 0);

    let fits: BookingReport = fixture
        .persistence
        .set_booking(first, cable, 4, jan_range(10, 12))
        .unwrap();
    assert!(!fits.over_committed);
    assert_eq!(fits.availability.available, 5);

    let over: BookingReport = fixture
        .persistence
        .set_booking(second, cable, 3, jan_range(11, 11))
        .unwrap();
    assert!(over.over_committed);
    assert_eq!(over.availability.available, 1);

    assert_eq!(
        fixture
            .persistence
            .list_bookings_for_type(cable)
            .unwrap()
            .len(),
        2
    );
    let overall: AvailabilityReport = fixture
        .persistence
        .availability(cable, jan_range(11, 11), None)
        .unwrap();
    assert_eq!(overall.available, 0);
    assert_eq!(overall.shortfall(), 2);
}

#[test]
fn test_rebooking_replaces_quantity() {
    let mut fixture = Fixture::new();
    let cable: EquipmentTypeId = cables(&mut fixture, 10);
    let event_id: EventId = fixture.event("Festival", 0);

    let original: BookingReport = fixture
        .persistence
        .set_booking(event_id, cable, 3, jan_range(10, 15))
        .unwrap();
    let updated: BookingReport = fixture
        .persistence
        .set_booking(event_id, cable, 6, jan_range(11, 14))
        .unwrap();

    assert_eq!(updated.booking.booking_id, original.booking.booking_id);
    assert_eq!(updated.booking.quantity, 6);
    assert_eq!(updated.availability.available, 10);

    let excluded: AvailabilityReport = fixture
        .persistence
        .availability(cable, jan_range(10, 15), Some(updated.booking.booking_id))
        .unwrap();
    assert_eq!(excluded.available, 10);
}

#[test]
fn test_zero_quantity_booking_is_rejected() {
    let mut fixture = Fixture::new();
    let cable: EquipmentTypeId = cables(&mut fixture, 10);
    let event_id: EventId = fixture.event("Festival", 0);

    let result = fixture
        .persistence
        .set_booking(event_id, cable, 0, jan_range(10, 15));
    assert!(matches!(
        result,
        Err(PersistenceError::Domain(DomainError::ZeroQuantity { .. }))
    ));
}

#[test]
fn test_booking_for_unknown_event_is_not_found() {
    let mut fixture = Fixture::new();
    let cable: EquipmentTypeId = cables(&mut fixture, 10);

    let result = fixture
        .persistence
        .set_booking(EventId::new(404), cable, 1, jan_range(10, 15));
    assert_eq!(result, Err(PersistenceError::not_found("event", 404)));
}

#[test]
fn test_open_repair_hold_blocks_until_returned() {
    let mut fixture = Fixture::new();
    let cable: EquipmentTypeId = cables(&mut fixture, 5);

    let hold = fixture
        .persistence
        .open_repair_hold(cable, 2, jan(5), None)
        .unwrap();

    let during: AvailabilityReport = fixture
        .persistence
        .availability(cable, jan_range(20, 25), None)
        .unwrap();
    assert_eq!(during.in_repair, 2);
    assert_eq!(during.available, 3);

    let closed = fixture
        .persistence
        .close_repair_hold(hold.repair_hold_id, jan(8))
        .unwrap();
    assert_eq!(closed.status, RepairHoldStatus::Returned);
    assert_eq!(closed.end_date, Some(jan(8)));

    let after: AvailabilityReport = fixture
        .persistence
        .availability(cable, jan_range(6, 7), None)
        .unwrap();
    assert_eq!(after.in_repair, 0);
    assert_eq!(after.available, 5);
}

#[test]
fn test_closing_returned_hold_twice_fails() {
    let mut fixture = Fixture::new();
    let cable: EquipmentTypeId = cables(&mut fixture, 5);
    let hold = fixture
        .persistence
        .open_repair_hold(cable, 1, jan(5), Some(jan(9)))
        .unwrap();

    fixture
        .persistence
        .close_repair_hold(hold.repair_hold_id, jan(7))
        .unwrap();
    let again = fixture
        .persistence
        .close_repair_hold(hold.repair_hold_id, jan(8));
    assert!(matches!(
        again,
        Err(PersistenceError::Domain(
            DomainError::RepairHoldAlreadyReturned(_)
        ))
    ));
}

#[test]
fn test_quantity_change_is_reflected() {
    let mut fixture = Fixture::new();
    let cable: EquipmentTypeId = cables(&mut fixture, 5);
    fixture
        .persistence
        .set_equipment_quantity(cable, 8)
        .unwrap();

    let report: AvailabilityReport = fixture
        .persistence
        .availability(cable, jan_range(1, 2), None)
        .unwrap();
    assert_eq!(report.quantity_total, 8);
    assert_eq!(report.available, 8);
}
