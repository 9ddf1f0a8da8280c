// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation ledger accounting.
//!
//! Reservations are planning commitments, not allocation locks. Capacity is
//! only enforced at issuance time, against the event's own reservation.

use serde::{Deserialize, Serialize};

use crate::types::{EventId, StockTypeId};

/// Remaining issuance capacity for an (event, type) pair.
///
/// A missing reservation has no capacity. Saturates at zero.
#[must_use]
pub fn remaining_capacity(reserved: Option<u32>, open_issued: u32) -> u32 {
    reserved.unwrap_or(0).saturating_sub(open_issued)
}

/// Per-type reservation state of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationTally {
    pub event_id: EventId,
    pub stock_type_id: StockTypeId,
    /// Display name of the type, for reasons shown to the user.
    pub stock_type_name: String,
    /// Reserved quantity.
    pub reserved: u32,
    /// Units currently out at the event.
    pub open_issued: u32,
    /// Distinct units that were ever issued to the event.
    pub ever_issued: u32,
}

impl ReservationTally {
    /// Units that may still be issued.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        remaining_capacity(Some(self.reserved), self.open_issued)
    }

    /// Reserved units that were never issued even once.
    #[must_use]
    pub const fn shortfall(&self) -> u32 {
        self.reserved.saturating_sub(self.ever_issued)
    }
}
