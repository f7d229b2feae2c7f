//! Typed tables and columns.
//!
//! A table is a type implementing [`Table`]; its columns are zero-sized
//! [`Column`] handles carrying the table type, the value type and the column
//! index. Handles hold no reference to a table instance, so they can be
//! copied freely and never dangle. Tables are usually declared with
//! [`crate::define_table!`].

use std::{fmt, marker::PhantomData};

use typesql_db::{FromColumns, Kind, SqlType, Value};

use crate::expr::{Data, Expr, Expression, IntoExpr};

/// A declared table.
pub trait Table: 'static {
    /// Table name as written in SQL.
    const NAME: &'static str;

    /// Column names, in declaration order.
    const COLUMNS: &'static [&'static str];

    /// Storage kinds of the columns, as a tuple in declaration order.
    type Kinds: KindList;

    /// The decoded form of a full row, one `Option` per column.
    type Row: FromColumns;
}

/// A tuple of storage kinds.
pub trait KindList {
    const LEN: usize;

    /// SQL type names, in order.
    fn type_names() -> Vec<&'static str>;
}

macro_rules! kind_list {
    ($len:literal; $($name:ident),+) => {
        impl<$($name: Kind),+> KindList for ($($name,)+) {
            const LEN: usize = $len;

            fn type_names() -> Vec<&'static str> {
                vec![$($name::TYPE_NAME),+]
            }
        }
    };
}

kind_list!(1; A);
kind_list!(2; A, B);
kind_list!(3; A, B, C);
kind_list!(4; A, B, C, D);
kind_list!(5; A, B, C, D, E);
kind_list!(6; A, B, C, D, E, F);
kind_list!(7; A, B, C, D, E, F, G);
kind_list!(8; A, B, C, D, E, F, G, H);
kind_list!(9; A, B, C, D, E, F, G, H, I);
kind_list!(10; A, B, C, D, E, F, G, H, I, J);
kind_list!(11; A, B, C, D, E, F, G, H, I, J, K);
kind_list!(12; A, B, C, D, E, F, G, H, I, J, K, L);

/// Column `I` of table `T`, holding values of type `V`.
pub struct Column<T, V, const I: usize> {
    _marker: PhantomData<fn() -> (T, V)>,
}

impl<T: Table, V: SqlType, const I: usize> Column<T, V, I> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        T::COLUMNS[I]
    }

    pub fn table(&self) -> &'static str {
        T::NAME
    }

    pub const fn index(&self) -> usize {
        I
    }

    /// Pairs the column with a value for [`crate::insert_values`].
    pub fn value<X: SqlType<Kind = V::Kind>>(self, value: X) -> ColumnValue<T> {
        ColumnValue {
            column: self.name(),
            value: value.to_value(),
            _table: PhantomData,
        }
    }

    /// Builds `column = rhs` for [`crate::update`].
    ///
    /// # Panics
    ///
    /// If `rhs` references a table other than the column's own, which an
    /// UPDATE statement cannot express.
    pub fn set<R: IntoExpr<V::Kind>>(self, rhs: R) -> Assignment<T, I> {
        let data = rhs.into_operand().into_data();
        if let Some(foreign) = data.tables().iter().find(|table| *table != T::NAME) {
            panic!(
                "cannot assign {}.{} from an expression over table {}",
                T::NAME,
                self.name(),
                foreign
            );
        }

        Assignment {
            column: self.name(),
            data,
            _table: PhantomData,
        }
    }
}

impl<T, V, const I: usize> Clone for Column<T, V, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, V, const I: usize> Copy for Column<T, V, I> {}

impl<T: Table, V: SqlType, const I: usize> fmt::Debug for Column<T, V, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Column({}.{})", T::NAME, self.name())
    }
}

impl<T: Table, V: SqlType, const I: usize> Expression for Column<T, V, I> {
    type Kind = V::Kind;

    fn into_expr(self) -> Expr<V::Kind> {
        Expr::from_data(Data::column(T::NAME, self.name()))
    }
}

impl<T: Table, V: SqlType, const I: usize> IntoExpr<V::Kind> for Column<T, V, I> {
    fn into_operand(self) -> Expr<V::Kind> {
        self.into_expr()
    }
}

/// A value destined for one column of table `T` in a named insert.
#[derive(Debug, Clone)]
pub struct ColumnValue<T> {
    column: &'static str,
    value: Value,
    _table: PhantomData<fn() -> T>,
}

impl<T> ColumnValue<T> {
    pub fn column(&self) -> &'static str {
        self.column
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub(crate) fn into_parts(self) -> (&'static str, Value) {
        (self.column, self.value)
    }
}

/// `column = expression` targeting column `I` of table `T`.
#[derive(Debug, Clone)]
pub struct Assignment<T, const I: usize> {
    column: &'static str,
    data: Data,
    _table: PhantomData<fn() -> T>,
}

impl<T, const I: usize> Assignment<T, I> {
    pub fn column(&self) -> &'static str {
        self.column
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub(crate) fn into_parts(self) -> (&'static str, Data) {
        (self.column, self.data)
    }
}
