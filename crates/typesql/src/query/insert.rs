//! INSERT statements.
//!
//! There are three shapes, all rendered from one [`InsertData`]:
//!
//! - [`insert_into`] alone inserts a row of defaults;
//! - `.values(row)` supplies every column positionally;
//! - [`insert_values`] supplies a subset of columns by name.
//!
//! A positional row must match the table's column count and kinds:
//!
//! ```compile_fail
//! use typesql::{define_table, insert_into};
//!
//! define_table!(t {
//!     table: "T",
//!     columns: {
//!         ID: i64 => "id",
//!         TEXT: String => "text",
//!     }
//! });
//!
//! let _ = insert_into(t::TABLE).values(("1", 1.0));
//! ```
//!
//! ```compile_fail
//! use typesql::{define_table, insert_into};
//!
//! define_table!(t {
//!     table: "T",
//!     columns: {
//!         ID: i64 => "id",
//!         TEXT: String => "text",
//!     }
//! });
//!
//! let _ = insert_into(t::TABLE).values((1,));
//! ```
//!
//! Named values must all belong to one table:
//!
//! ```compile_fail
//! use typesql::{define_table, insert_values};
//!
//! define_table!(a {
//!     table: "a",
//!     columns: { X: i64 => "x" }
//! });
//!
//! define_table!(b {
//!     table: "b",
//!     columns: { Y: i64 => "y" }
//! });
//!
//! let _ = insert_values((a::X.value(1), b::Y.value(2)));
//! ```

use std::{fmt, marker::PhantomData};

use typesql_db::Value;

use super::{
    clause::{RowValues, ValueList},
    Statement,
};
use crate::table::Table;

/// Target table, optional column list and bound values of an INSERT.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertData {
    table: &'static str,
    columns: Vec<&'static str>,
    binds: Vec<Value>,
}

impl InsertData {
    fn new(table: &'static str) -> Self {
        Self {
            table,
            columns: Vec::new(),
            binds: Vec::new(),
        }
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    pub fn dump(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "INSERT INTO {}", self.table)?;

        if self.binds.is_empty() {
            return out.write_str(" DEFAULT VALUES");
        }

        if !self.columns.is_empty() {
            write!(out, " ({})", self.columns.join(", "))?;
        }

        let placeholders = vec!["?"; self.binds.len()].join(", ");
        write!(out, " VALUES ({})", placeholders)
    }
}

macro_rules! insert_statement {
    ($($name:ident),+) => {
        $(
            impl<T> Statement for $name<T> {
                fn dump(&self, out: &mut dyn fmt::Write) -> fmt::Result {
                    self.data.dump(out)
                }

                fn bindings(&self) -> &[Value] {
                    &self.data.binds
                }
            }

            impl<T> fmt::Display for $name<T> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    self.data.dump(f)
                }
            }

            impl<T> Clone for $name<T> {
                fn clone(&self) -> Self {
                    Self {
                        data: self.data.clone(),
                        _table: PhantomData,
                    }
                }
            }

            impl<T> $name<T> {
                pub fn data(&self) -> &InsertData {
                    &self.data
                }
            }
        )+
    };
}

/// `INSERT INTO t DEFAULT VALUES`, until `.values()` supplies a row.
#[derive(Debug)]
pub struct Insert<T> {
    data: InsertData,
    _table: PhantomData<fn() -> T>,
}

/// `INSERT INTO t VALUES (?, ...)` with one value per column.
#[derive(Debug)]
pub struct InsertRow<T> {
    data: InsertData,
    _table: PhantomData<fn() -> T>,
}

/// `INSERT INTO t (c1, ...) VALUES (?, ...)` for a subset of columns.
#[derive(Debug)]
pub struct InsertValues<T> {
    data: InsertData,
    _table: PhantomData<fn() -> T>,
}

insert_statement!(Insert, InsertRow, InsertValues);

/// Starts an INSERT into `table`.
pub fn insert_into<T: Table>(_table: T) -> Insert<T> {
    Insert {
        data: InsertData::new(T::NAME),
        _table: PhantomData,
    }
}

impl<T: Table> Insert<T> {
    /// Supplies a value for every column, in declaration order.
    pub fn values<R: RowValues<T::Kinds>>(self, row: R) -> InsertRow<T> {
        let mut data = self.data;
        data.binds = row.into_values();
        InsertRow {
            data,
            _table: PhantomData,
        }
    }
}

/// An INSERT naming its columns, built from [`Column::value`] pairs.
///
/// [`Column::value`]: crate::table::Column::value
///
/// # Example
///
/// ```rust
/// use typesql::{define_table, insert_values, Statement};
///
/// define_table!(users {
///     table: "users",
///     columns: {
///         ID: i64 => "id",
///         NAME: String => "name"
///     }
/// });
///
/// let insert = insert_values(users::NAME.value("ada"));
/// assert_eq!(insert.sql(), "INSERT INTO users (name) VALUES (?)");
/// ```
pub fn insert_values<L: ValueList>(values: L) -> InsertValues<L::Table> {
    let mut data = InsertData::new(<L::Table as Table>::NAME);
    values.collect_into(&mut data.columns, &mut data.binds);
    InsertValues {
        data,
        _table: PhantomData,
    }
}
