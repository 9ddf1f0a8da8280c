// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fungible availability accounting.
//!
//! Computes how many units of a bulk equipment type are free over an
//! inclusive date range:
//!
//! ```text
//! available = quantity_total - reserved(range) - in_repair(range), floored at 0
//! ```
//!
//! The result is advisory. The bulk booking path reports over-commitment to
//! the caller but never refuses to store a booking.

use serde::{Deserialize, Serialize};

use crate::types::{Booking, BookingId, DateRange, RepairHold};

/// Breakdown of a fungible availability computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityReport {
    /// Total owned quantity of the type.
    pub quantity_total: u32,
    /// Sum of booking quantities overlapping the range.
    pub reserved: u64,
    /// Sum of active repair hold quantities overlapping the range.
    pub in_repair: u64,
    /// Free quantity, never negative.
    pub available: u64,
}

impl AvailabilityReport {
    /// How far the unclamped availability went below zero.
    ///
    /// Zero when the type is not over-committed in the range.
    #[must_use]
    pub fn shortfall(&self) -> u64 {
        (self.reserved + self.in_repair).saturating_sub(u64::from(self.quantity_total))
    }

    /// Returns whether bookings and repairs exceed the owned quantity.
    #[must_use]
    pub fn is_over_committed(&self) -> bool {
        self.shortfall() > 0
    }

    /// Returns whether `quantity` more units would fit into the range.
    #[must_use]
    pub fn can_fit(&self, quantity: u32) -> bool {
        self.available >= u64::from(quantity)
    }
}

/// Sums booking quantities overlapping `range`, skipping `exclude`.
///
/// `exclude` lets a caller re-check an existing booking without counting its
/// own prior quantity against itself.
#[must_use]
pub fn reserved_in_range(
    bookings: &[Booking],
    range: &DateRange,
    exclude: Option<BookingId>,
) -> u64 {
    bookings
        .iter()
        .filter(|b| Some(b.booking_id) != exclude)
        .filter(|b| b.range.overlaps(range))
        .map(|b| u64::from(b.quantity))
        .sum()
}

/// Sums quantities of `in_repair` holds overlapping `range`.
///
/// Open-ended holds overlap every day from their start onwards.
#[must_use]
pub fn in_repair_in_range(holds: &[RepairHold], range: &DateRange) -> u64 {
    holds
        .iter()
        .filter(|h| h.blocks(range))
        .map(|h| u64::from(h.quantity))
        .sum()
}

/// Computes availability of a fungible type over `range`.
///
/// `bookings` and `holds` may contain records of any date; only those
/// overlapping `range` are counted. Callers normally pass every booking and
/// hold for the type.
///
/// # Arguments
///
/// * `quantity_total` - Total owned quantity of the type
/// * `bookings` - Bookings of the type
/// * `holds` - Repair holds of the type
/// * `range` - The inclusive date range being asked about
/// * `exclude` - A booking to leave out of the reserved total
#[must_use]
pub fn compute_availability(
    quantity_total: u32,
    bookings: &[Booking],
    holds: &[RepairHold],
    range: &DateRange,
    exclude: Option<BookingId>,
) -> AvailabilityReport {
    let reserved: u64 = reserved_in_range(bookings, range, exclude);
    let in_repair: u64 = in_repair_in_range(holds, range);
    let available: u64 = u64::from(quantity_total)
        .saturating_sub(reserved)
        .saturating_sub(in_repair);

    AvailabilityReport {
        quantity_total,
        reserved,
        in_repair,
        available,
    }
}
