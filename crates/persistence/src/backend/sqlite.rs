// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Connection setup for `SQLite`.
//!
//! Every connection, in-memory or file, goes through [`open`]: pragmas
//! first, then migrations, then a check that foreign keys really are on.
//! Raw SQL here is limited to PRAGMA statements and `last_insert_rowid()`,
//! which Diesel has no DSL for.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::StoreOptions;
use crate::error::PersistenceError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(QueryableByName)]
struct ForeignKeysRow {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Returns the rowid of the last row inserted on this connection.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

fn pragma(conn: &mut SqliteConnection, statement: &str) -> Result<(), PersistenceError> {
    diesel::sql_query(format!("PRAGMA {statement}"))
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("PRAGMA {statement}: {e}")))?;
    Ok(())
}

/// Opens a connection and brings its schema up to date.
///
/// The busy timeout is applied before migrations, so processes that open
/// the same file at the same moment queue behind each other's schema
/// check instead of failing with `SQLITE_BUSY`.
///
/// # Errors
///
/// Returns an error if the connection, a pragma or a migration fails, or
/// if foreign keys could not be enabled.
pub fn open(
    database_url: &str,
    options: &StoreOptions,
) -> Result<SqliteConnection, PersistenceError> {
    info!(database_url, wal = options.wal, "Opening SQLite database");

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    let busy_timeout: String = format!("busy_timeout = {}", options.busy_timeout_ms);
    pragma(&mut conn, &busy_timeout)?;
    pragma(&mut conn, "foreign_keys = ON")?;
    if options.wal {
        pragma(&mut conn, "journal_mode = WAL")?;
        pragma(&mut conn, "synchronous = NORMAL")?;
    }

    debug!("Running pending migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    verify_foreign_key_enforcement(&mut conn)?;
    Ok(conn)
}

/// Fails unless `PRAGMA foreign_keys` reports enforcement as on.
///
/// # Errors
///
/// Returns an error if the pragma cannot be read or enforcement is off.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let row: ForeignKeysRow = diesel::sql_query("PRAGMA foreign_keys").get_result(conn)?;
    if row.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }
    Ok(())
}
