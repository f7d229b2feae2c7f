//! Database connection management.
//!
//! A [`Database`] owns one SQLite connection. It has no internal
//! synchronization: share it by reference on one thread, and open a separate
//! connection per thread for concurrent work.

use std::{path::Path, time::Duration};

use rusqlite::{types::Value, Connection};
use tracing::{debug, trace};

use crate::{
    config::DatabaseConfig,
    error::{DbError, Result},
    result::QueryResult,
};

/// A SQLite database connection.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (creating if needed) the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DbError::Open {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "opened database");
        Ok(Self { conn })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| DbError::Open {
            path: ":memory:".to_string(),
            source,
        })?;
        debug!("opened in-memory database");
        Ok(Self { conn })
    }

    /// Opens the database described by `config` and applies its pragmas.
    pub fn open_with(config: &DatabaseConfig) -> Result<Self> {
        let db = if config.is_memory() {
            Self::open_in_memory()?
        } else {
            Self::open(&config.path)?
        };

        if let Some(mode) = config.journal_mode {
            let applied: String = db
                .conn
                .pragma_update_and_check(None, "journal_mode", mode.as_str(), |row| row.get(0))
                .map_err(|source| DbError::Pragma {
                    pragma: "journal_mode",
                    source,
                })?;
            debug!(requested = mode.as_str(), applied = %applied, "set journal mode");
        }

        if let Some(enabled) = config.foreign_keys {
            db.conn
                .pragma_update(None, "foreign_keys", enabled)
                .map_err(|source| DbError::Pragma {
                    pragma: "foreign_keys",
                    source,
                })?;
            debug!(enabled, "set foreign keys");
        }

        if let Some(timeout) = config.busy_timeout_ms {
            db.conn
                .busy_timeout(Duration::from_millis(timeout))
                .map_err(|source| DbError::Pragma {
                    pragma: "busy_timeout",
                    source,
                })?;
            debug!(timeout_ms = timeout, "set busy timeout");
        }

        Ok(db)
    }

    /// Executes `sql` without parameters.
    pub fn execute(&self, sql: &str) -> Result<QueryResult> {
        self.execute_with(sql, &[])
    }

    /// Executes `sql`, binding `params` to placeholders `1..=params.len()`
    /// in order, and buffers every row the statement produces.
    pub fn execute_with(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        debug!(sql = sql, params = params.len(), "executing statement");

        let mut stmt = self.conn.prepare(sql).map_err(|source| DbError::Prepare {
            sql: sql.to_string(),
            source,
        })?;

        let expected = stmt.parameter_count();
        if expected != params.len() {
            return Err(DbError::ParameterCount {
                sql: sql.to_string(),
                expected,
                found: params.len(),
            });
        }

        for (i, value) in params.iter().enumerate() {
            let index = i + 1;
            trace!(index, value = ?value, "binding parameter");
            stmt.raw_bind_parameter(index, value)
                .map_err(|source| DbError::Bind {
                    sql: sql.to_string(),
                    index,
                    source,
                })?;
        }

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let width = columns.len();
        let readonly = stmt.readonly();

        let step_error = |source: rusqlite::Error| DbError::Step {
            sql: sql.to_string(),
            source,
        };

        let mut rows = Vec::new();
        let mut cursor = stmt.raw_query();
        while let Some(row) = cursor.next().map_err(step_error)? {
            let mut values = Vec::with_capacity(width);
            for index in 0..width {
                values.push(row.get::<_, Value>(index).map_err(step_error)?);
            }
            rows.push(values);
        }
        drop(cursor);

        // `changes()` keeps the count of the last writing statement.
        let changes = if readonly { 0 } else { self.conn.changes() as u64 };
        trace!(rows = rows.len(), changes, "statement finished");

        Ok(QueryResult::new(columns, rows, changes))
    }

    /// Row id of the most recent successful INSERT on this connection.
    pub fn last_insert_rowid(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    /// The underlying rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
