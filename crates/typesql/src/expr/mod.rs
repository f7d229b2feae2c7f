//! Typed expressions and conditions.
//!
//! An [`Expr<K>`] wraps a [`Data`] tree and records, in its type, the kind
//! `K` the expression evaluates to. Conditions are expressions of kind
//! [`Bool`]. Operators only combine operands of matching kinds, so a Text
//! column compared against a Real value is rejected by the compiler:
//!
//! ```compile_fail
//! use typesql::{define_table, Expression};
//!
//! define_table!(notes {
//!     table: "notes",
//!     columns: {
//!         TITLE: String => "title",
//!         SCORE: f64 => "score",
//!     }
//! });
//!
//! let _ = notes::TITLE.eq(notes::SCORE);
//! ```
//!
//! Arithmetic between Integer and Real does not widen implicitly:
//!
//! ```compile_fail
//! use typesql::define_table;
//!
//! define_table!(stats {
//!     table: "stats",
//!     columns: {
//!         COUNT: i64 => "count",
//!         RATIO: f64 => "ratio",
//!     }
//! });
//!
//! let _ = stats::COUNT + stats::RATIO;
//! ```

pub mod data;
pub mod node;
pub mod ops;
pub mod tables;

use std::{fmt, marker::PhantomData};

use typesql_db::{Bool, Kind, Numeric, SqlType, Value};

pub use data::Data;
pub use node::{BinaryOp, Leaf, Node, Precedence, UnaryOp};
pub use tables::TableSet;

/// An expression evaluating to kind `K`.
pub struct Expr<K> {
    data: Data,
    _kind: PhantomData<fn() -> K>,
}

/// An expression evaluating to a boolean, usable in WHERE clauses.
pub type Condition = Expr<Bool>;

impl<K: Kind> Expr<K> {
    pub(crate) fn from_data(data: Data) -> Self {
        Self {
            data,
            _kind: PhantomData,
        }
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn into_data(self) -> Data {
        self.data
    }

    /// Tables referenced anywhere in the expression.
    pub fn tables(&self) -> &TableSet {
        self.data.tables()
    }

    /// Values bound to the expression's placeholders, left to right.
    pub fn bindings(&self) -> &[Value] {
        self.data.binds()
    }
}

impl<K: Numeric> Expr<K> {
    /// Unary `+`.
    pub fn plus(self) -> Self {
        Self::from_data(Data::unary(UnaryOp::Plus, self.data))
    }
}

impl Condition {
    /// `self AND rhs`.
    pub fn and<R: IntoExpr<Bool>>(self, rhs: R) -> Condition {
        binary(BinaryOp::And, self, rhs)
    }

    /// `self OR rhs`.
    pub fn or<R: IntoExpr<Bool>>(self, rhs: R) -> Condition {
        binary(BinaryOp::Or, self, rhs)
    }
}

impl<K> Clone for Expr<K> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K> fmt::Debug for Expr<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Expr").field(&self.data).finish()
    }
}

impl<K> fmt::Display for Expr<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.data.dump(f)
    }
}

/// A typed operand that comparisons can be built from.
///
/// Implemented by [`Expr`], `&Expr` (which clones) and table columns.
pub trait Expression: Sized {
    type Kind: Kind;

    fn into_expr(self) -> Expr<Self::Kind>;

    /// Creates a SQL `=` condition.
    fn eq<R: IntoExpr<Self::Kind>>(self, rhs: R) -> Condition {
        binary(BinaryOp::Eq, self, rhs)
    }

    /// Creates a SQL `<>` condition.
    fn ne<R: IntoExpr<Self::Kind>>(self, rhs: R) -> Condition {
        binary(BinaryOp::Ne, self, rhs)
    }

    /// Creates a SQL `<` condition.
    fn lt<R: IntoExpr<Self::Kind>>(self, rhs: R) -> Condition {
        binary(BinaryOp::Lt, self, rhs)
    }

    /// Creates a SQL `<=` condition.
    fn lte<R: IntoExpr<Self::Kind>>(self, rhs: R) -> Condition {
        binary(BinaryOp::Le, self, rhs)
    }

    /// Creates a SQL `>` condition.
    fn gt<R: IntoExpr<Self::Kind>>(self, rhs: R) -> Condition {
        binary(BinaryOp::Gt, self, rhs)
    }

    /// Creates a SQL `>=` condition.
    fn gte<R: IntoExpr<Self::Kind>>(self, rhs: R) -> Condition {
        binary(BinaryOp::Ge, self, rhs)
    }
}

impl<K: Kind> Expression for Expr<K> {
    type Kind = K;

    fn into_expr(self) -> Expr<K> {
        self
    }
}

impl<K: Kind> Expression for &Expr<K> {
    type Kind = K;

    fn into_expr(self) -> Expr<K> {
        self.clone()
    }
}

/// Anything usable as an operand of kind `K`.
///
/// Besides typed expressions and columns, any [`SqlType`] value is accepted
/// and becomes a `?` placeholder bound to that value.
pub trait IntoExpr<K: Kind> {
    fn into_operand(self) -> Expr<K>;
}

impl<K: Kind> IntoExpr<K> for Expr<K> {
    fn into_operand(self) -> Expr<K> {
        self
    }
}

impl<K: Kind> IntoExpr<K> for &Expr<K> {
    fn into_operand(self) -> Expr<K> {
        self.clone()
    }
}

impl<V: SqlType> IntoExpr<V::Kind> for V {
    fn into_operand(self) -> Expr<V::Kind> {
        lit(self)
    }
}

/// A literal bound through a placeholder.
///
/// Needed when a literal is the left operand, as in `lit(5).lt(users::AGE)`.
pub fn lit<V: SqlType>(value: V) -> Expr<V::Kind> {
    Expr::from_data(Data::param(value.to_value()))
}

pub(crate) fn binary<L, R, K>(op: BinaryOp, lhs: L, rhs: R) -> Expr<K>
where
    L: Expression,
    R: IntoExpr<L::Kind>,
    K: Kind,
{
    Expr::from_data(Data::binary(
        op,
        lhs.into_expr().into_data(),
        rhs.into_operand().into_data(),
    ))
}

pub(crate) fn unary<E: Expression>(op: UnaryOp, operand: E) -> Expr<E::Kind> {
    Expr::from_data(Data::unary(op, operand.into_expr().into_data()))
}

#[cfg(test)]
mod tests {
    use typesql_db::{Integer, Text};

    use super::*;

    fn column<K: Kind>(table: &'static str, name: &'static str) -> Expr<K> {
        Expr::from_data(Data::column(table, name))
    }

    #[test]
    fn test_literal_becomes_binding() {
        let cond = column::<Integer>("users", "age").gt(21);
        assert_eq!(cond.to_string(), "users.age > ?");
        assert_eq!(cond.bindings(), &[Value::Integer(21)]);
        assert!(lit("x").tables().is_empty());
    }

    #[test]
    fn test_binding_order() {
        let a = column::<Integer>("a", "a");
        let b = column::<Integer>("b", "b");
        let cond = a.eq(1).and(b.eq(2));

        assert_eq!(cond.to_string(), "a.a = ? AND b.b = ?");
        assert_eq!(cond.bindings(), &[Value::Integer(1), Value::Integer(2)]);
    }

    #[test]
    fn test_table_union_is_order_independent() {
        let a = || column::<Integer>("a", "a").eq(1);
        let b = || column::<Text>("b", "b").eq("x");

        let ab = a().or(b());
        let ba = b().or(a());
        assert_eq!(ab.tables(), ba.tables());
        assert_eq!(ab.tables().len(), 2);
    }

    #[test]
    fn test_copy_path_leaves_operand_usable() {
        let total = column::<Integer>("orders", "total");
        let low = (&total).lt(10);
        let high = (&total).gt(100);
        let cond = low.or(high);

        assert_eq!(cond.to_string(), "orders.total < ? OR orders.total > ?");
        assert_eq!(total.to_string(), "orders.total");
    }

    #[test]
    fn test_literal_on_the_left() {
        let cond = lit(5i64).lte(column::<Integer>("t", "n"));
        assert_eq!(cond.to_string(), "? <= t.n");
        assert_eq!(cond.bindings(), &[Value::Integer(5)]);
    }

    #[test]
    fn test_unary_plus() {
        let expr = column::<Integer>("t", "n").plus();
        assert_eq!(expr.to_string(), "+t.n");
    }
}
