//! Statement builders.
//!
//! Each builder renders to SQL text with `?` placeholders plus the ordered
//! list of values bound to them. Everything implementing [`Statement`] can be
//! rendered with [`Statement::sql`] and run with [`Statement::execute`].

pub mod clause;
pub mod create;
pub mod insert;
pub mod select;
pub mod state;
pub mod update;

use std::fmt;

use tracing::trace;
use typesql_db::{Database, QueryResult, Result, Value};

pub use clause::{
    AssignmentItem, Assignments, ExprList, RowValues, Selection, Sort, SortExt, SortList,
    ValueList,
};
pub use create::{create_table, create_table_if_not_exists, CreateTable};
pub use insert::{insert_into, insert_values, Insert, InsertData, InsertRow, InsertValues};
pub use select::{
    select, Select, SelectData, SelectGroupBy, SelectLimit, SelectOrderBy, SelectWhere,
};
pub use state::{CanGroup, CanLimit, CanOrder, Filtered, Grouped, Limited, Ordered, Unfiltered};
pub use update::{update, Update, UpdateData, UpdateWhere};

/// A complete SQL statement.
pub trait Statement {
    /// Writes the SQL text.
    fn dump(&self, out: &mut dyn fmt::Write) -> fmt::Result;

    /// Values bound to the placeholders, in the order they appear in the
    /// SQL text.
    fn bindings(&self) -> &[Value];

    /// Renders the SQL text.
    fn sql(&self) -> String {
        let mut sql = String::new();
        // Writing into a String cannot fail.
        let _ = self.dump(&mut sql);
        sql
    }

    /// Runs the statement against `db`.
    fn execute(&self, db: &Database) -> Result<QueryResult> {
        let sql = self.sql();
        trace!(sql = %sql, "rendered statement");
        db.execute_with(&sql, self.bindings())
    }
}
