//! SQLite connection, value and result layer for `typesql`.
//!
//! This crate executes SQL text with positional parameters and exposes the
//! produced rows. The statement builders live in the `typesql` crate, which
//! re-exports everything here.

pub mod config;
pub mod connection;
pub mod error;
pub mod result;
pub mod types;

pub use config::{DatabaseConfig, JournalMode};
pub use connection::Database;
pub use error::{DbError, Result};
pub use result::{FromColumns, QueryResult, TypedResult};
pub use rusqlite::types::Value;
pub use types::{
    type_name, Blob, Bool, FromSqlType, Integer, Kind, Numeric, Real, SqlType, Storage, Text,
};
