// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `catalog`: Categories, types, units and kits
//! - `bookings`: Bookings and repair holds of the fungible line
//! - `events`: Events and their issuance history
//! - `ledger`: Reservations and issue counts
//! - `issuance`: Facts loaded for the issuance state machine
//! - `repairs`: Repair tickets of serialized units
//! - `status`: Item status history

pub mod bookings;
pub mod catalog;
pub mod events;
pub mod issuance;
pub mod ledger;
pub mod repairs;
pub mod status;

use gearbook_domain::DomainError;
use num_traits::ToPrimitive;

use crate::error::PersistenceError;

/// Narrows a SQL `COUNT` result.
pub(crate) fn count_to_u32(count: i64) -> Result<u32, PersistenceError> {
    count
        .to_u32()
        .ok_or(PersistenceError::Domain(DomainError::QuantityOutOfRange(count)))
}
