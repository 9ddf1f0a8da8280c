// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::DatabaseErrorKind;
use gearbook_domain::DomainError;
use thiserror::Error;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    DatabaseError(String),
    /// Database connection failed.
    #[error("Database connection failed: {0}")]
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),
    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Initialization error.
    #[error("Initialization error: {0}")]
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    #[error("Foreign key enforcement is not enabled")]
    ForeignKeyEnforcementNotEnabled,
    /// The requested entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// The kind of entity looked up.
        entity: &'static str,
        /// The identifier that was looked up.
        id: i64,
    },
    /// A uniqueness constraint rejected the write.
    ///
    /// For issuance this means a concurrent writer won the race.
    #[error("Conflict: {0}")]
    Conflict(String),
    /// The entity is still referenced and cannot be deleted.
    #[error("{entity} {id} is still in use: {detail}")]
    EntityInUse {
        /// The kind of entity.
        entity: &'static str,
        /// The entity's identifier.
        id: i64,
        /// What still references it.
        detail: String,
    },
    /// A domain rule was violated.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl PersistenceError {
    /// Shorthand for a `NotFound` error.
    #[must_use]
    pub const fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Returns whether this error is a uniqueness conflict.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::Conflict(info.message().to_string())
            }
            diesel::result::Error::NotFound => Self::QueryFailed(String::from("record not found")),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<time::error::Format> for PersistenceError {
    fn from(err: time::error::Format) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<time::error::Parse> for PersistenceError {
    fn from(err: time::error::Parse) -> Self {
        Self::SerializationError(err.to_string())
    }
}
