//! Error types for typesql-db.

use miette::Diagnostic;
use thiserror::Error;

/// Database error type for typesql-db operations.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Cannot open database {path}: {source}")]
    #[diagnostic(
        code(typesql_db::open),
        help("Check if the database file exists and is accessible")
    )]
    Open {
        path: String,
        source: rusqlite::Error,
    },

    #[error("Cannot apply pragma {pragma}: {source}")]
    #[diagnostic(
        code(typesql_db::pragma),
        help("Check the journal mode and timeout values in your configuration")
    )]
    Pragma {
        pragma: &'static str,
        source: rusqlite::Error,
    },

    #[error("SQLite error in statement \"{sql}\": {source}")]
    #[diagnostic(
        code(typesql_db::prepare),
        help("The statement could not be compiled; check that the referenced tables exist")
    )]
    Prepare {
        sql: String,
        source: rusqlite::Error,
    },

    #[error("Statement \"{sql}\" expects {expected} parameters, {found} were supplied")]
    #[diagnostic(code(typesql_db::parameter_count))]
    ParameterCount {
        sql: String,
        expected: usize,
        found: usize,
    },

    #[error("Cannot bind parameter #{index} of statement \"{sql}\": {source}")]
    #[diagnostic(code(typesql_db::bind))]
    Bind {
        sql: String,
        index: usize,
        source: rusqlite::Error,
    },

    #[error("SQLite error in statement \"{sql}\": {source}")]
    #[diagnostic(
        code(typesql_db::step),
        help("Check constraints on the target table")
    )]
    Step {
        sql: String,
        source: rusqlite::Error,
    },

    #[error("Column #{index} holds {found}, expected {expected}")]
    #[diagnostic(
        code(typesql_db::column_type),
        help("Make sure the declared column type matches the stored data")
    )]
    ColumnType {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Value conversion failed: {0}")]
    #[diagnostic(code(typesql_db::conversion))]
    Conversion(String),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(typesql_db::config),
        help("Check your database configuration syntax and structure")
    )]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    #[diagnostic(
        code(typesql_db::io),
        help("Check file permissions and disk space")
    )]
    Io(#[from] std::io::Error),
}

/// Result type alias for typesql-db operations.
pub type Result<T> = std::result::Result<T, DbError>;
