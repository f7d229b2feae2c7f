//! Argument lists accepted by the statement builders.
//!
//! Each builder method takes either a single item or a tuple of items. The
//! traits here walk those tuples, collecting SQL fragments, tables and
//! bindings in argument order, and carry the type-level checks: matching
//! kinds for positional inserts, a single table for named inserts, and
//! distinct columns for updates.

use typesql_db::{FromColumns, FromSqlType, Kind, SqlType, Value};

use crate::{
    expr::{Data, Expr, Expression, Node, TableSet},
    table::{Assignment, Column, ColumnValue, Table},
};

/// The column list of a SELECT: a table (`table.*`), a column, or a tuple of
/// selections.
pub trait Selection {
    /// Decoded form of one selected row.
    type Row: FromColumns;

    fn collect(&self, columns: &mut Vec<String>, tables: &mut TableSet);
}

impl<T: Table, V: FromSqlType, const I: usize> Selection for Column<T, V, I> {
    type Row = Option<V>;

    fn collect(&self, columns: &mut Vec<String>, tables: &mut TableSet) {
        columns.push(format!("{}.{}", T::NAME, self.name()));
        tables.insert(T::NAME);
    }
}

/// Accumulates the parts of the expressions fed to one clause.
#[derive(Debug, Default)]
pub(crate) struct Collector {
    pub nodes: Vec<Node>,
    pub tables: TableSet,
    pub binds: Vec<Value>,
}

impl Collector {
    pub fn push(&mut self, data: Data) {
        let (root, tables, binds) = data.into_parts();
        if let Some(node) = root {
            self.nodes.push(node);
        }
        self.tables.union(tables);
        self.binds.extend(binds);
    }
}

/// One or more expressions, as taken by `group_by`.
pub trait ExprList {
    #[doc(hidden)]
    fn collect_into(self, out: &mut ExprCollector);
}

/// Opaque accumulator passed to [`ExprList`] and [`SortList`].
#[derive(Debug, Default)]
pub struct ExprCollector {
    pub(crate) inner: Collector,
    pub(crate) descending: Vec<bool>,
}

impl ExprCollector {
    fn push(&mut self, data: Data, descending: bool) {
        self.inner.push(data);
        self.descending.push(descending);
    }
}

/// One or more sort keys, as taken by `order_by`.
///
/// Any expression sorts ascending; wrap it with [`Sort::desc`] (or call
/// `.desc()` on a column or expression through [`SortExt`]) to reverse it.
pub trait SortList {
    #[doc(hidden)]
    fn collect_into(self, out: &mut ExprCollector);
}

/// An expression with an explicit sort direction.
#[derive(Debug, Clone)]
pub struct Sort {
    data: Data,
    descending: bool,
}

impl Sort {
    pub fn asc<E: Expression>(expr: E) -> Self {
        Self {
            data: expr.into_expr().into_data(),
            descending: false,
        }
    }

    pub fn desc<E: Expression>(expr: E) -> Self {
        Self {
            data: expr.into_expr().into_data(),
            descending: true,
        }
    }
}

/// `.asc()` and `.desc()` for anything that can be sorted on.
pub trait SortExt: Expression {
    fn asc(self) -> Sort {
        Sort::asc(self)
    }

    fn desc(self) -> Sort {
        Sort::desc(self)
    }
}

impl<E: Expression> SortExt for E {}

impl SortList for Sort {
    fn collect_into(self, out: &mut ExprCollector) {
        out.push(self.data, self.descending);
    }
}

macro_rules! expr_items {
    ($([$($gen:tt)*] $ty:ty),+ $(,)?) => {
        $(
            impl<$($gen)*> ExprList for $ty {
                fn collect_into(self, out: &mut ExprCollector) {
                    out.push(self.into_expr().into_data(), false);
                }
            }

            impl<$($gen)*> SortList for $ty {
                fn collect_into(self, out: &mut ExprCollector) {
                    out.push(self.into_expr().into_data(), false);
                }
            }
        )+
    };
}

expr_items!(
    [K: Kind] Expr<K>,
    ['a, K: Kind] &'a Expr<K>,
    [T: Table, V: SqlType, const I: usize] Column<T, V, I>,
);

/// Positional values for every column of a table whose kinds are `K`.
///
/// Implemented for tuples whose element kinds equal `K` position by
/// position, so a row with the wrong arity or a transposed value does not
/// compile.
pub trait RowValues<K> {
    fn into_values(self) -> Vec<Value>;
}

/// Named values for a subset of one table's columns.
pub trait ValueList {
    type Table: Table;

    #[doc(hidden)]
    fn collect_into(self, columns: &mut Vec<&'static str>, values: &mut Vec<Value>);
}

impl<T: Table> ValueList for ColumnValue<T> {
    type Table = T;

    fn collect_into(self, columns: &mut Vec<&'static str>, values: &mut Vec<Value>) {
        let (column, value) = self.into_parts();
        columns.push(column);
        values.push(value);
    }
}

/// A single `column = expression` item of an UPDATE.
pub trait AssignmentItem {
    type Table: Table;

    /// Index of the assigned column.
    const INDEX: usize;

    #[doc(hidden)]
    fn into_parts(self) -> (&'static str, Data);
}

impl<T: Table, const I: usize> AssignmentItem for Assignment<T, I> {
    type Table = T;

    const INDEX: usize = I;

    fn into_parts(self) -> (&'static str, Data) {
        Assignment::into_parts(self)
    }
}

/// The SET list of an UPDATE: one assignment or a tuple of assignments to
/// distinct columns of one table.
pub trait Assignments {
    type Table: Table;

    /// Fails to evaluate when a column is assigned twice.
    const CHECK: ();

    #[doc(hidden)]
    fn collect_into(self, out: &mut Vec<(&'static str, Data)>);
}

impl<T: Table, const I: usize> Assignments for Assignment<T, I> {
    type Table = T;

    const CHECK: () = ();

    fn collect_into(self, out: &mut Vec<(&'static str, Data)>) {
        out.push(Assignment::into_parts(self));
    }
}

pub(crate) const fn all_distinct(indices: &[usize]) -> bool {
    let mut i = 0;
    while i < indices.len() {
        let mut j = i + 1;
        while j < indices.len() {
            if indices[i] == indices[j] {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

macro_rules! tuple_lists {
    ($first:ident $(, $rest:ident)*) => {
        impl<$first: Selection $(, $rest: Selection)*> Selection for ($first, $($rest,)*) {
            type Row = ($first::Row, $($rest::Row,)*);

            #[allow(non_snake_case)]
            fn collect(&self, columns: &mut Vec<String>, tables: &mut TableSet) {
                let ($first, $($rest,)*) = self;
                $first.collect(columns, tables);
                $($rest.collect(columns, tables);)*
            }
        }

        impl<$first: ExprList $(, $rest: ExprList)*> ExprList for ($first, $($rest,)*) {
            #[allow(non_snake_case)]
            fn collect_into(self, out: &mut ExprCollector) {
                let ($first, $($rest,)*) = self;
                $first.collect_into(out);
                $($rest.collect_into(out);)*
            }
        }

        impl<$first: SortList $(, $rest: SortList)*> SortList for ($first, $($rest,)*) {
            #[allow(non_snake_case)]
            fn collect_into(self, out: &mut ExprCollector) {
                let ($first, $($rest,)*) = self;
                $first.collect_into(out);
                $($rest.collect_into(out);)*
            }
        }

        impl<$first: SqlType $(, $rest: SqlType)*> RowValues<($first::Kind, $($rest::Kind,)*)>
            for ($first, $($rest,)*)
        {
            #[allow(non_snake_case)]
            fn into_values(self) -> Vec<Value> {
                let ($first, $($rest,)*) = self;
                vec![$first.to_value() $(, $rest.to_value())*]
            }
        }

        impl<$first: ValueList $(, $rest: ValueList<Table = $first::Table>)*> ValueList
            for ($first, $($rest,)*)
        {
            type Table = $first::Table;

            #[allow(non_snake_case)]
            fn collect_into(self, columns: &mut Vec<&'static str>, values: &mut Vec<Value>) {
                let ($first, $($rest,)*) = self;
                $first.collect_into(columns, values);
                $($rest.collect_into(columns, values);)*
            }
        }

        impl<$first: AssignmentItem $(, $rest: AssignmentItem<Table = $first::Table>)*> Assignments
            for ($first, $($rest,)*)
        {
            type Table = $first::Table;

            const CHECK: () = assert!(
                all_distinct(&[$first::INDEX $(, $rest::INDEX)*]),
                "cannot update the same column twice"
            );

            #[allow(non_snake_case)]
            fn collect_into(self, out: &mut Vec<(&'static str, Data)>) {
                let ($first, $($rest,)*) = self;
                out.push($first.into_parts());
                $(out.push($rest.into_parts());)*
            }
        }
    };
}

tuple_lists!(A);
tuple_lists!(A, B);
tuple_lists!(A, B, C);
tuple_lists!(A, B, C, D);
tuple_lists!(A, B, C, D, E);
tuple_lists!(A, B, C, D, E, F);
tuple_lists!(A, B, C, D, E, F, G);
tuple_lists!(A, B, C, D, E, F, G, H);
tuple_lists!(A, B, C, D, E, F, G, H, I);
tuple_lists!(A, B, C, D, E, F, G, H, I, J);
tuple_lists!(A, B, C, D, E, F, G, H, I, J, K);
tuple_lists!(A, B, C, D, E, F, G, H, I, J, K, L);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_distinct() {
        assert!(all_distinct(&[]));
        assert!(all_distinct(&[0, 2, 1]));
        assert!(!all_distinct(&[0, 2, 0]));
    }
}
