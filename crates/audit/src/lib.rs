// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit and notification collaborators.
//!
//! Gearbook does not own audit persistence or notification delivery. It
//! talks to both through the one-way interfaces defined here:
//!
//! - [`AuditRecorder`] is fire-and-forget. A failed `record` is logged by the
//!   caller and never undoes the change being audited.
//! - [`Notifier`] is best-effort. A missing recipient is a silent no-op.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod notify;
mod recorder;
mod types;

#[cfg(test)]
mod tests;

pub use notify::{MemoryNotifier, Notifier, NotifyError, NullNotifier, TracingNotifier};
pub use recorder::{AuditError, AuditRecorder, MemoryAuditRecorder, TracingAuditRecorder};
pub use types::{Actor, AuditAction, AuditEvent, Notification};
