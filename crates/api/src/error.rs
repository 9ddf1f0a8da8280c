// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use gearbook::PolicyRejection;
use gearbook_domain::DomainError;
use gearbook_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain, core and persistence errors and represent
/// the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// An issuance rule refused the command. Nothing was written.
    PolicyRejection {
        /// Stable rejection code, e.g. `no_capacity`.
        code: String,
        /// A human-readable description of the rejection.
        message: String,
    },
    /// A concurrent writer won, even after one retry.
    Conflict {
        /// A description of the conflict.
        message: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Returns the rejection code if this is a policy rejection.
    #[must_use]
    pub fn rejection_code(&self) -> Option<&str> {
        match self {
            Self::PolicyRejection { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PolicyRejection { code, message } => {
                write!(f, "Rejected ({code}): {message}")
            }
            Self::Conflict { message } => {
                write!(f, "Conflict: {message}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<PolicyRejection> for ApiError {
    fn from(rejection: PolicyRejection) -> Self {
        Self::PolicyRejection {
            code: rejection.code().to_string(),
            message: rejection.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidDateRange { start, end } => ApiError::InvalidInput {
            field: String::from("date_range"),
            message: format!("Start date {start} is after end date {end}"),
        },
        DomainError::ZeroQuantity { context } => ApiError::InvalidInput {
            field: String::from("quantity"),
            message: format!("Quantity for {context} must be greater than 0"),
        },
        DomainError::QuantityOutOfRange(value) => ApiError::InvalidInput {
            field: String::from("quantity"),
            message: format!("Quantity {value} is out of range"),
        },
        DomainError::InvalidInventoryNumber(value) => ApiError::InvalidInput {
            field: String::from("inventory_number"),
            message: format!("'{value}' is not a valid inventory number"),
        },
        DomainError::InvalidName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidItemStatus(_)
        | DomainError::InvalidEventStatus(_)
        | DomainError::InvalidRepairHoldStatus(_) => ApiError::Internal {
            message: format!("Stored data is inconsistent: {err}"),
        },
        DomainError::InvalidEventTransition { from, to } => ApiError::DomainRuleViolation {
            rule: String::from("event_transition"),
            message: format!("Event is already {from} and cannot become {to}"),
        },
        DomainError::SelfReferencingKit(_)
        | DomainError::ReciprocalKit { .. }
        | DomainError::DuplicateKitComponent { .. } => ApiError::DomainRuleViolation {
            rule: String::from("kit_structure"),
            message: err.to_string(),
        },
        DomainError::RepairAlreadyOpen(item_id) => ApiError::DomainRuleViolation {
            rule: String::from("single_open_repair"),
            message: format!("Item {item_id} already has an open repair ticket"),
        },
        DomainError::NoOpenRepair(item_id) => ApiError::DomainRuleViolation {
            rule: String::from("open_repair_required"),
            message: format!("Item {item_id} has no open repair ticket"),
        },
        DomainError::RepairHoldAlreadyReturned(id) => ApiError::DomainRuleViolation {
            rule: String::from("repair_hold_open"),
            message: format!("Repair hold {id} is already returned"),
        },
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound { entity, id } => ApiError::ResourceNotFound {
            resource_type: capitalize(entity),
            message: format!("{entity} {id} does not exist"),
        },
        PersistenceError::Conflict(message) => ApiError::Conflict { message },
        PersistenceError::EntityInUse { entity, id, detail } => ApiError::DomainRuleViolation {
            rule: String::from("entity_in_use"),
            message: format!("{entity} {id} is still in use: {detail}"),
        },
        PersistenceError::Domain(domain_err) => translate_domain_error(domain_err),
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
