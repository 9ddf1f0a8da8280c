// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gearbook_domain::{EventId, EventStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An expected business-rule refusal.
///
/// Rejections are outcomes, not faults: the caller shows the message to the
/// user and nothing was written. Every variant has a stable [`code`].
///
/// [`code`]: PolicyRejection::code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum PolicyRejection {
    /// The unit is held by an open repair ticket.
    #[error("Item is in repair")]
    InRepair,
    /// The event's reservation for the unit's type is missing or fully issued.
    #[error("No capacity: {issued} of {reserved} reserved units already issued")]
    NoCapacity {
        /// Reserved quantity (0 when there is no reservation).
        reserved: u32,
        /// Units currently issued against it.
        issued: u32,
    },
    /// The unit is currently out at another event.
    #[error("Item is issued elsewhere (event {event_id})")]
    IssuedElsewhere {
        /// The event holding the unit.
        event_id: EventId,
    },
    /// The unit is already out at this event. Nothing was changed.
    #[error("Item is already issued to this event")]
    AlreadyIssuedHere,
    /// There is no open issue for this unit at this event to return or transfer.
    #[error("Item is not issued to this event")]
    NotIssuedHere,
    /// The unit is reported lost.
    #[error("Item is lost")]
    ItemLost,
    /// The event no longer accepts equipment.
    #[error("Event is {status} and does not accept equipment")]
    EventNotOpen {
        /// The event's current status.
        status: EventStatus,
    },
    /// A transfer named the same event as source and target.
    #[error("Source and target event are the same")]
    SameEvent,
}

impl PolicyRejection {
    /// Stable reason code for this rejection.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InRepair => "in_repair",
            Self::NoCapacity { .. } => "no_capacity",
            Self::IssuedElsewhere { .. } => "issued_elsewhere",
            Self::AlreadyIssuedHere => "already_issued_here",
            Self::NotIssuedHere => "not_issued_here",
            Self::ItemLost => "item_lost",
            Self::EventNotOpen { .. } => "event_not_open",
            Self::SameEvent => "same_event",
        }
    }

    /// Returns whether the rejection signals that the requested state
    /// already holds, so a retrying caller can treat it as success.
    #[must_use]
    pub const fn is_idempotent_noop(&self) -> bool {
        matches!(self, Self::AlreadyIssuedHere)
    }
}

/// Either a completed change or the rule that refused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum IssuanceOutcome<T> {
    Completed(T),
    Rejected(PolicyRejection),
}

impl<T> IssuanceOutcome<T> {
    /// Returns the completed value, if any.
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }

    /// Returns the rejection, if any.
    #[must_use]
    pub const fn rejection(&self) -> Option<&PolicyRejection> {
        match self {
            Self::Completed(_) => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }

    /// Maps the completed value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> IssuanceOutcome<U> {
        match self {
            Self::Completed(value) => IssuanceOutcome::Completed(f(value)),
            Self::Rejected(rejection) => IssuanceOutcome::Rejected(rejection),
        }
    }
}

impl<T> From<Result<T, PolicyRejection>> for IssuanceOutcome<T> {
    fn from(result: Result<T, PolicyRejection>) -> Self {
        match result {
            Ok(value) => Self::Completed(value),
            Err(rejection) => Self::Rejected(rejection),
        }
    }
}
