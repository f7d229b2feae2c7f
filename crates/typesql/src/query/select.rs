//! SELECT statements.

use std::{fmt, marker::PhantomData};

use typesql_db::{Bool, Database, FromColumns, Result, TypedResult, Value};

use super::{
    clause::{ExprCollector, ExprList, Selection, SortList},
    state::{CanGroup, CanLimit, CanOrder, Filtered, Grouped, Limited, Ordered, Unfiltered},
    Statement,
};
use crate::expr::{IntoExpr, Node, TableSet};

/// Everything a SELECT has accumulated so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectData {
    columns: Vec<String>,
    tables: TableSet,
    filter: Option<Node>,
    group_by: Vec<Node>,
    order_by: Vec<(Node, bool)>,
    limit: Option<u64>,
    binds: Vec<Value>,
}

impl SelectData {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn tables(&self) -> &TableSet {
        &self.tables
    }

    pub fn dump(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "SELECT {} FROM {}", self.columns.join(", "), self.tables)?;

        if let Some(filter) = &self.filter {
            out.write_str(" WHERE ")?;
            filter.dump(out, false)?;
        }

        if !self.group_by.is_empty() {
            out.write_str(" GROUP BY ")?;
            for (i, node) in self.group_by.iter().enumerate() {
                if i > 0 {
                    out.write_str(", ")?;
                }
                node.dump(out, false)?;
            }
        }

        if !self.order_by.is_empty() {
            out.write_str(" ORDER BY ")?;
            for (i, (node, descending)) in self.order_by.iter().enumerate() {
                if i > 0 {
                    out.write_str(", ")?;
                }
                node.dump(out, false)?;
                if *descending {
                    out.write_str(" DESC")?;
                }
            }
        }

        if let Some(limit) = self.limit {
            write!(out, " LIMIT {}", limit)?;
        }

        Ok(())
    }

    fn take(&mut self, collected: ExprCollector) -> Vec<(Node, bool)> {
        let ExprCollector { inner, descending } = collected;
        self.tables.union(inner.tables);
        self.binds.extend(inner.binds);
        inner.nodes.into_iter().zip(descending).collect()
    }
}

/// A SELECT statement in state `S`, yielding rows of type `R`.
///
/// Built with [`select`]; `.filter()`, `.group_by()`, `.order_by()` and
/// `.limit()` are each optional but must come in that order:
///
/// ```compile_fail
/// use typesql::{define_table, select, Expression};
///
/// define_table!(users {
///     table: "users",
///     columns: { ID: i64 => "id" }
/// });
///
/// let _ = select(users::TABLE).limit(1).filter(users::ID.eq(1));
/// ```
#[derive(Debug)]
pub struct Select<R, S = Unfiltered> {
    data: SelectData,
    _state: PhantomData<fn() -> (R, S)>,
}

pub type SelectWhere<R> = Select<R, Filtered>;
pub type SelectGroupBy<R> = Select<R, Grouped>;
pub type SelectOrderBy<R> = Select<R, Ordered>;
pub type SelectLimit<R> = Select<R, Limited>;

/// Starts a SELECT over `selection`: a table (all of its columns), a
/// column, or a tuple mixing both. FROM lists every table involved.
///
/// # Example
///
/// ```rust
/// use typesql::{define_table, select, Expression, SortExt, Statement};
///
/// define_table!(users {
///     table: "users",
///     columns: {
///         ID: i64 => "id",
///         NAME: String => "name",
///         AGE: i64 => "age"
///     }
/// });
///
/// let query = select((users::NAME, users::AGE))
///     .filter(users::AGE.gte(18))
///     .order_by(users::AGE.desc())
///     .limit(10);
///
/// assert_eq!(
///     query.sql(),
///     "SELECT users.name, users.age FROM users WHERE users.age >= ? ORDER BY users.age DESC LIMIT 10"
/// );
/// ```
pub fn select<L: Selection>(selection: L) -> Select<L::Row> {
    let mut data = SelectData::default();
    selection.collect(&mut data.columns, &mut data.tables);
    Select {
        data,
        _state: PhantomData,
    }
}

impl<R, S> Select<R, S> {
    fn into_state<N>(self) -> Select<R, N> {
        Select {
            data: self.data,
            _state: PhantomData,
        }
    }

    pub fn data(&self) -> &SelectData {
        &self.data
    }
}

impl<R> Select<R, Unfiltered> {
    /// Sets the WHERE clause. Tables the condition references join FROM.
    pub fn filter<C: IntoExpr<Bool>>(mut self, condition: C) -> SelectWhere<R> {
        let (root, tables, binds) = condition.into_operand().into_data().into_parts();
        self.data.filter = root;
        self.data.tables.union(tables);
        self.data.binds.extend(binds);
        self.into_state()
    }
}

impl<R, S: CanGroup> Select<R, S> {
    /// Sets GROUP BY to one expression or a tuple of expressions.
    pub fn group_by<L: ExprList>(mut self, exprs: L) -> SelectGroupBy<R> {
        let mut collected = ExprCollector::default();
        exprs.collect_into(&mut collected);
        self.data.group_by = self
            .data
            .take(collected)
            .into_iter()
            .map(|(node, _)| node)
            .collect();
        self.into_state()
    }
}

impl<R, S: CanOrder> Select<R, S> {
    /// Sets ORDER BY to one sort key or a tuple of sort keys.
    pub fn order_by<L: SortList>(mut self, keys: L) -> SelectOrderBy<R> {
        let mut collected = ExprCollector::default();
        keys.collect_into(&mut collected);
        self.data.order_by = self.data.take(collected);
        self.into_state()
    }
}

impl<R, S: CanLimit> Select<R, S> {
    /// Caps the number of returned rows.
    pub fn limit(mut self, limit: u64) -> SelectLimit<R> {
        self.data.limit = Some(limit);
        self.into_state()
    }
}

impl<R: FromColumns, S> Select<R, S> {
    /// Executes the query, decoding rows as `R`.
    pub fn execute_typed(&self, db: &Database) -> Result<TypedResult<R>> {
        Statement::execute(self, db).map(TypedResult::new)
    }

    /// Executes the query and decodes every row.
    pub fn fetch(&self, db: &Database) -> Result<Vec<R>> {
        self.execute_typed(db)?.rows()
    }
}

impl<R, S> Clone for Select<R, S> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            _state: PhantomData,
        }
    }
}

impl<R, S> Statement for Select<R, S> {
    fn dump(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        self.data.dump(out)
    }

    fn bindings(&self) -> &[Value] {
        &self.data.binds
    }
}

impl<R, S> fmt::Display for Select<R, S> {
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
        expr::{lit, Expression},
        query::{clause::SortExt, create_table, insert_into},
    };

    define_table!(a {
        table: "a",
        columns: { A: i64 => "a" }
    });

    define_table!(b {
        table: "b",
        columns: { B: i64 => "b" }
    });

    define_table!(c {
        table: "c",
        columns: { C: i64 => "c" }
    });

    define_table!(d {
        table: "d",
        columns: { D: String => "d" }
    });

    define_table!(flags {
        table: "flags",
        columns: {
            A: i64 => "a",
            B: i64 => "b",
        }
    });

    define_table!(scores {
        table: "scores",
        columns: {
            PLAYER: String => "player",
            POINTS: i64 => "points",
        }
    });

    #[test]
    fn test_operator_precedence() {
        let query = select(a::A)
            .filter(a::A.eq(0) & ((b::B + 1).eq(c::C) | d::D.ne("x")));

        assert_eq!(
            query.sql(),
            "SELECT a.a FROM a, b, c, d WHERE a.a = ? AND (b.b + ? = c.c OR d.d <> ?)"
        );
        assert_eq!(
            query.bindings(),
            &[Value::Integer(0), Value::Integer(1), Value::Text("x".into())]
        );
    }

    #[test]
    fn test_negated_condition_as_comparison_operand() {
        let db = Database::open_in_memory().unwrap();
        create_table(flags::TABLE).execute(&db).unwrap();
        insert_into(flags::TABLE).values((0, 1)).execute(&db).unwrap();

        let query = select(flags::A).filter((!flags::A.eq(1)).lt(flags::B.eq(0)));
        assert_eq!(
            query.sql(),
            "SELECT flags.a FROM flags WHERE (NOT (flags.a = ?)) < (flags.b = ?)"
        );
        assert!(query.fetch(&db).unwrap().is_empty());

        let query = select(flags::A).filter((!flags::A.eq(1)).gt(flags::B.eq(0)));
        assert_eq!(query.fetch(&db).unwrap(), vec![Some(0)]);
    }

    #[test]
    fn test_select_table() {
        let query = select(a::TABLE);
        assert_eq!(query.sql(), "SELECT a.* FROM a");
        assert!(query.bindings().is_empty());
    }

    #[test]
    fn test_tables_listed_once() {
        let query = select((a::A, a::TABLE)).filter(a::A.gt(b::B).and(b::B.lt(a::A)));
        assert_eq!(
            query.sql(),
            "SELECT a.a, a.* FROM a, b WHERE a.a > b.b AND b.b < a.a"
        );
    }

    #[test]
    fn test_full_chain() {
        let query = select((scores::PLAYER, scores::POINTS))
            .filter(scores::POINTS.gt(10))
            .group_by(scores::PLAYER)
            .order_by((scores::POINTS.desc(), scores::PLAYER))
            .limit(3);

        assert_eq!(
            query.to_string(),
            "SELECT scores.player, scores.points FROM scores WHERE scores.points > ? \
             GROUP BY scores.player ORDER BY scores.points DESC, scores.player LIMIT 3"
        );
    }

    #[test]
    fn test_skipped_stages() {
        let query = select(scores::TABLE).order_by(scores::POINTS * 2).limit(1);
        assert_eq!(
            query.sql(),
            "SELECT scores.* FROM scores ORDER BY scores.points * ? LIMIT 1"
        );
        assert_eq!(query.bindings(), &[Value::Integer(2)]);
    }

    #[test]
    fn test_bindings_follow_clause_order() {
        let query = select(scores::PLAYER)
            .filter(scores::POINTS.gt(1))
            .group_by(scores::POINTS % 2)
            .order_by(lit(3i64) * scores::POINTS);

        assert_eq!(
            query.bindings(),
            &[Value::Integer(1), Value::Integer(2), Value::Integer(3)]
        );
    }

    #[test]
    fn test_execute_without_bindings() {
        let db = Database::open_in_memory().unwrap();
        create_table(scores::TABLE).execute(&db).unwrap();
        insert_into(scores::TABLE)
            .values(("ada", 5))
            .execute(&db)
            .unwrap();

        let query = select(scores::TABLE);
        let built = query.execute(&db).unwrap();
        let raw = db.execute_with(&query.sql(), &[]).unwrap();

        assert_eq!(built.count(), raw.count());
        assert_eq!(built.text(0).unwrap(), raw.text(0).unwrap());
        assert_eq!(built.integer(1).unwrap(), Some(5));
    }

    #[test]
    fn test_execute_typed() {
        let db = Database::open_in_memory().unwrap();
        create_table(scores::TABLE).execute(&db).unwrap();
        for (player, points) in [("ada", 5), ("bob", 12), ("cy", 20)] {
            insert_into(scores::TABLE)
                .values((player, points))
                .execute(&db)
                .unwrap();
        }

        let rows = select((scores::PLAYER, scores::POINTS))
            .filter(scores::POINTS.gte(10))
            .order_by(scores::POINTS.desc())
            .fetch(&db)
            .unwrap();

        assert_eq!(
            rows,
            vec![
                (Some("cy".to_string()), Some(20)),
                (Some("bob".to_string()), Some(12)),
            ]
        );
    }
}
