// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules.
//!
//! This module contains all state-changing operations for the persistence
//! layer. Functions take a bare connection; `Persistence` in `lib.rs` wraps
//! each public operation in one immediate transaction.
//!
//! ## Module Organization
//!
//! - `catalog`: Categories, types, units and kits
//! - `bookings`: Bookings and repair holds
//! - `events`: Event creation and guarded lifecycle transitions
//! - `ledger`: Reservations
//! - `issuance`: Issue, return and transfer
//! - `repairs`: Repair tickets and the lost flag
//! - `status`: The durable status setter

pub mod bookings;
pub mod catalog;
pub mod events;
pub mod issuance;
pub mod ledger;
pub mod repairs;
pub mod status;

pub use status::SqliteStatusSetter;
