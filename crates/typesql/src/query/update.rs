//! UPDATE statements.
//!
//! Every assignment must target a distinct column of the same table:
//!
//! ```compile_fail
//! use typesql::{define_table, update};
//!
//! define_table!(t {
//!     table: "T",
//!     columns: {
//!         ID: i64 => "id",
//!         TEXT: String => "text",
//!     }
//! });
//!
//! let _ = update((t::ID.set(1), t::ID.set(2)));
//! ```

use std::{fmt, marker::PhantomData};

use tracing::trace;
use typesql_db::{Bool, Value};

use super::{
    clause::Assignments,
    state::{Filtered, Unfiltered},
    Statement,
};
use crate::{
    expr::{IntoExpr, Node},
    table::Table,
};

/// Target table, SET list, optional WHERE and bound values of an UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateData {
    table: &'static str,
    assignments: Vec<(&'static str, Node)>,
    filter: Option<Node>,
    binds: Vec<Value>,
}

impl UpdateData {
    pub fn table(&self) -> &'static str {
        self.table
    }

    /// Assigned column names, in SET order.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.assignments.iter().map(|(column, _)| *column)
    }

    pub fn dump(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "UPDATE {} SET ", self.table)?;
        for (i, (column, node)) in self.assignments.iter().enumerate() {
            if i > 0 {
                out.write_str(", ")?;
            }
            write!(out, "{} = ", column)?;
            node.dump(out, false)?;
        }

        if let Some(filter) = &self.filter {
            out.write_str(" WHERE ")?;
            filter.dump(out, false)?;
        }

        Ok(())
    }
}

/// An UPDATE of table `T` in state `S`.
#[derive(Debug)]
pub struct Update<T, S = Unfiltered> {
    data: UpdateData,
    _state: PhantomData<fn() -> (T, S)>,
}

pub type UpdateWhere<T> = Update<T, Filtered>;

/// Starts an UPDATE from one assignment or a tuple of assignments.
///
/// # Example
///
/// ```rust
/// use typesql::{define_table, update, Expression, Statement};
///
/// define_table!(users {
///     table: "users",
///     columns: {
///         ID: i64 => "id",
///         NAME: String => "name",
///         VISITS: i64 => "visits"
///     }
/// });
///
/// let query = update((users::NAME.set("ada"), users::VISITS.set(users::VISITS + 1)))
///     .filter(users::ID.eq(7));
///
/// assert_eq!(
///     query.sql(),
///     "UPDATE users SET name = ?, visits = users.visits + ? WHERE users.id = ?"
/// );
/// ```
pub fn update<L: Assignments>(assignments: L) -> Update<L::Table> {
    let () = L::CHECK;

    let mut collected = Vec::new();
    assignments.collect_into(&mut collected);

    let mut binds = Vec::new();
    let assignments = collected
        .into_iter()
        .filter_map(|(column, data)| {
            let (root, _, values) = data.into_parts();
            binds.extend(values);
            root.map(|node| (column, node))
        })
        .collect();

    Update {
        data: UpdateData {
            table: <L::Table as Table>::NAME,
            assignments,
            filter: None,
            binds,
        },
        _state: PhantomData,
    }
}

impl<T, S> Update<T, S> {
    pub fn data(&self) -> &UpdateData {
        &self.data
    }
}

impl<T: Table> Update<T, Unfiltered> {
    /// Restricts the rows updated.
    ///
    /// # Panics
    ///
    /// If the condition references a table other than `T`.
    pub fn filter<C: IntoExpr<Bool>>(self, condition: C) -> UpdateWhere<T> {
        let (root, tables, binds) = condition.into_operand().into_data().into_parts();
        if let Some(foreign) = tables.iter().find(|table| *table != T::NAME) {
            panic!(
                "cannot filter an UPDATE of {} on table {}",
                T::NAME,
                foreign
            );
        }
        trace!(table = T::NAME, "adding UPDATE filter");

        let mut data = self.data;
        data.filter = root;
        data.binds.extend(binds);
        Update {
            data,
            _state: PhantomData,
        }
    }
}

impl<T, S> Clone for Update<T, S> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            _state: PhantomData,
        }
    }
}

impl<T, S> Statement for Update<T, S> {
    fn dump(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        self.data.dump(out)
    }

    fn bindings(&self) -> &[Value] {
        &self.data.binds
    }
}

impl<T, S> fmt::Display for Update<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.data.dump(f)
    }
}

#[cfg(test)]
mod tests {
    use typesql_db::Database;

    use super::*;
    use crate::{
        define_table,
        expr::Expression,
        query::{create_table, insert_into, select},
    };

    define_table!(t {
        table: "T",
        columns: {
            ID: i64 => "id",
            TEXT: String => "text",
        }
    });

    define_table!(other {
        table: "other",
        columns: { ID: i64 => "id" }
    });

    #[test]
    fn test_single_assignment() {
        let query = update(t::TEXT.set("Hi"));
        assert_eq!(query.sql(), "UPDATE T SET text = ?");
        assert_eq!(query.bindings(), &[Value::Text("Hi".into())]);
    }

    #[test]
    fn test_bindings_follow_set_then_where() {
        let query = update((t::ID.set(t::ID * 2), t::TEXT.set("x"))).filter(t::ID.lt(5));
        assert_eq!(
            query.sql(),
            "UPDATE T SET id = T.id * ?, text = ? WHERE T.id < ?"
        );
        assert_eq!(
            query.bindings(),
            &[Value::Integer(2), Value::Text("x".into()), Value::Integer(5)]
        );
        assert_eq!(query.data().columns().collect::<Vec<_>>(), vec!["id", "text"]);
    }

    #[test]
    #[should_panic(expected = "cannot filter an UPDATE of T on table other")]
    fn test_foreign_filter_panics() {
        let _ = update(t::TEXT.set("x")).filter(t::ID.eq(other::ID));
    }

    #[test]
    fn test_execute_updates() {
        let db = Database::open_in_memory().unwrap();
        create_table(t::TABLE).execute(&db).unwrap();
        for (id, text) in [(1, "a"), (2, "b"), (3, "c")] {
            insert_into(t::TABLE).values((id, text)).execute(&db).unwrap();
        }

        let result = update(t::TEXT.set("z"))
            .filter(t::ID.gte(2))
            .execute(&db)
            .unwrap();
        assert_eq!(result.changes(), 2);

        let rows = select(t::TEXT).order_by(t::ID).fetch(&db).unwrap();
        assert_eq!(
            rows,
            vec![
                Some("a".to_string()),
                Some("z".to_string()),
                Some("z".to_string()),
            ]
        );
    }
}
