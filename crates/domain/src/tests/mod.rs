// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod availability_tests;
mod lifecycle_tests;
mod types_tests;

use time::{Date, Month};

/// Builds a January 2026 date.
pub fn jan(day: u8) -> Date {
    Date::from_calendar_date(2026, Month::January, day).expect("Valid test date")
}
