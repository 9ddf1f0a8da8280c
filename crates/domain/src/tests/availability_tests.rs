// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::jan;
use crate::{
    AvailabilityReport, Booking, BookingId, DateRange, EquipmentTypeId, EventId, RepairHold,
    RepairHoldId, RepairHoldStatus, compute_availability,
};

fn booking(id: i64, quantity: u32, start: u8, end: u8) -> Booking {
    Booking {
        booking_id: BookingId::new(id),
        event_id: EventId::new(id),
        equipment_type_id: EquipmentTypeId::new(1),
        quantity,
        range: DateRange::new(jan(start), jan(end)).expect("Valid range"),
    }
}

fn hold(
    id: i64,
    quantity: u32,
    status: RepairHoldStatus,
    start: u8,
    end: Option<u8>,
) -> RepairHold {
    RepairHold {
        repair_hold_id: RepairHoldId::new(id),
        equipment_type_id: EquipmentTypeId::new(1),
        quantity,
        status,
        start_date: jan(start),
        end_date: end.map(jan),
    }
}

fn range(start: u8, end: u8) -> DateRange {
    DateRange::new(jan(start), jan(end)).expect("Valid range")
}

#[test]
fn test_overlapping_booking_reduces_availability() {
    let bookings: Vec<Booking> = vec![booking(1, 3, 10, 15)];

    let report: AvailabilityReport = compute_availability(5, &bookings, &[], &range(12, 20), None);

    assert_eq!(report.reserved, 3);
    assert_eq!(report.in_repair, 0);
    assert_eq!(report.available, 2);
}

#[test]
fn test_booking_touching_range_edge_counts_as_overlap() {
    let bookings: Vec<Booking> = vec![booking(1, 2, 1, 12), booking(2, 1, 20, 25)];

    let report: AvailabilityReport = compute_availability(5, &bookings, &[], &range(12, 20), None);

    assert_eq!(report.reserved, 3);
    assert_eq!(report.available, 2);
}

#[test]
fn test_disjoint_booking_is_ignored() {
    let bookings: Vec<Booking> = vec![booking(1, 4, 1, 9), booking(2, 4, 21, 31)];

    let report: AvailabilityReport = compute_availability(5, &bookings, &[], &range(10, 20), None);

    assert_eq!(report.reserved, 0);
    assert_eq!(report.available, 5);
}

#[test]
fn test_excluded_booking_does_not_count_against_itself() {
    let bookings: Vec<Booking> = vec![booking(1, 4, 10, 15), booking(2, 1, 10, 15)];

    let report: AvailabilityReport = compute_availability(
        5,
        &bookings,
        &[],
        &range(10, 15),
        Some(BookingId::new(1)),
    );

    assert_eq!(report.reserved, 1);
    assert_eq!(report.available, 4);
}

#[test]
fn test_open_ended_repair_hold_overlaps_future_ranges() {
    let holds: Vec<RepairHold> = vec![hold(1, 2, RepairHoldStatus::InRepair, 5, None)];

    let report: AvailabilityReport = compute_availability(5, &[], &holds, &range(25, 31), None);

    assert_eq!(report.in_repair, 2);
    assert_eq!(report.available, 3);
}

#[test]
fn test_open_ended_repair_hold_does_not_reach_backwards() {
    let holds: Vec<RepairHold> = vec![hold(1, 2, RepairHoldStatus::InRepair, 20, None)];

    let report: AvailabilityReport = compute_availability(5, &[], &holds, &range(1, 19), None);

    assert_eq!(report.in_repair, 0);
}

#[test]
fn test_returned_repair_hold_is_ignored() {
    let holds: Vec<RepairHold> = vec![hold(1, 2, RepairHoldStatus::Returned, 1, Some(31))];

    let report: AvailabilityReport = compute_availability(5, &[], &holds, &range(10, 12), None);

    assert_eq!(report.in_repair, 0);
    assert_eq!(report.available, 5);
}

#[test]
fn test_over_commitment_clamps_to_zero_and_reports_shortfall() {
    let bookings: Vec<Booking> = vec![booking(1, 4, 10, 15)];
    let holds: Vec<RepairHold> = vec![hold(1, 3, RepairHoldStatus::InRepair, 11, Some(12))];

    let report: AvailabilityReport =
        compute_availability(5, &bookings, &holds, &range(10, 15), None);

    assert_eq!(report.available, 0);
    assert_eq!(report.shortfall(), 2);
    assert!(report.is_over_committed());
    assert!(!report.can_fit(1));
}

#[test]
fn test_sum_identity_holds_when_not_over_committed() {
    let bookings: Vec<Booking> = vec![
        booking(1, 2, 3, 8),
        booking(2, 1, 7, 9),
        booking(3, 5, 25, 30),
    ];
    let holds: Vec<RepairHold> = vec![
        hold(1, 1, RepairHoldStatus::InRepair, 1, None),
        hold(2, 4, RepairHoldStatus::Returned, 1, None),
    ];

    for (start, end) in [(1, 2), (3, 8), (8, 8), (9, 24), (1, 31)] {
        let report: AvailabilityReport =
            compute_availability(10, &bookings, &holds, &range(start, end), None);
        assert_eq!(
            report.available + report.reserved + report.in_repair,
            u64::from(report.quantity_total),
            "identity broken for [{start}, {end}]"
        );
    }
}

#[test]
fn test_zero_quantity_type_is_never_negative() {
    let bookings: Vec<Booking> = vec![booking(1, 3, 1, 31)];

    let report: AvailabilityReport = compute_availability(0, &bookings, &[], &range(1, 31), None);

    assert_eq!(report.available, 0);
    assert_eq!(report.shortfall(), 3);
}
