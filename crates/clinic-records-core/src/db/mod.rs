//! Database layer for clinic records.

mod schema;
mod medicines;
mod patients;
mod templates;
mod visits;

pub use schema::*;
#[allow(unused_imports)]
pub use medicines::*;
#[allow(unused_imports)]
pub use patients::*;
#[allow(unused_imports)]
pub use templates::*;
pub use visits::*;

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

use crate::config::{ClinicConfig, DatabaseLocation};

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Open whichever database the configuration points at.
    pub fn open_with_config(config: &ClinicConfig) -> DbResult<Self> {
        match config.database() {
            DatabaseLocation::InMemory => Self::open_in_memory(),
            DatabaseLocation::File(path) => Self::open(path),
        }
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        tracing::debug!("clinic schema initialized");
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction spanning every store on this connection.
    ///
    /// Store methods keep working through `&self` while the transaction is
    /// open; dropping it without `commit()` rolls all of them back.
    pub fn begin(&self) -> DbResult<rusqlite::Transaction<'_>> {
        Ok(self.conn.unchecked_transaction()?)
    }
}
