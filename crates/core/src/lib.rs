// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod command;
mod error;
mod machine;
mod state;
mod status;

#[cfg(test)]
mod tests;

pub use command::Command;
pub use error::{IssuanceOutcome, PolicyRejection};
pub use machine::{IssuanceFacts, apply};
pub use state::{EventCapacity, ItemSnapshot, OpenIssueRef, Transition};
pub use status::{RecordingStatusSetter, StatusChange, StatusSetter};
