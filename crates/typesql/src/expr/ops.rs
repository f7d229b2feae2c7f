//! Operator overloads for expressions and columns.
//!
//! - `+ - * /` and unary `-` need a numeric kind on both sides.
//! - `% << >> & |` and `!` (complement) need Integer operands.
//! - `& | !` on conditions build `AND`, `OR` and `NOT`.
//!
//! Every operator is implemented for owned expressions, borrowed expressions
//! (which clone) and columns. Rust has no overloadable `==` returning a
//! non-bool, so comparisons are methods on [`Expression`].

use std::ops::{Add, BitAnd, BitOr, Div, Mul, Neg, Not, Rem, Shl, Shr, Sub};

use typesql_db::{Bool, Integer, Numeric, Real, SqlType};

use super::{binary, lit, unary, BinaryOp, Expr, Expression, IntoExpr, UnaryOp};
use crate::table::{Column, Table};

macro_rules! binary_ops {
    (
        @one [$($gen:tt)*] $ty:ty => $kind:ty where [$($bound:tt)*];
        $trait:ident :: $method:ident => $op:ident
    ) => {
        impl<$($gen)* R: IntoExpr<$kind>> $trait<R> for $ty
        where
            $($bound)*
        {
            type Output = Expr<$kind>;

            fn $method(self, rhs: R) -> Expr<$kind> {
                binary(BinaryOp::$op, self, rhs)
            }
        }
    };
    (
        $gens:tt $ty:ty => $kind:ty where $bounds:tt;
        $($trait:ident :: $method:ident => $op:ident),+ $(,)?
    ) => {
        $(
            binary_ops!(@one $gens $ty => $kind where $bounds; $trait::$method => $op);
        )+
    };
}

macro_rules! unary_op {
    ([$($gen:tt)*] $ty:ty => $kind:ty where [$($bound:tt)*]; $trait:ident :: $method:ident => $op:ident) => {
        impl<$($gen)*> $trait for $ty
        where
            $($bound)*
        {
            type Output = Expr<$kind>;

            fn $method(self) -> Expr<$kind> {
                unary(UnaryOp::$op, self)
            }
        }
    };
}

macro_rules! arithmetic {
    ($([$($gen:tt)*] $ty:ty => $kind:ty where [$($bound:tt)*]),+ $(,)?) => {
        $(
            binary_ops!(
                [$($gen)*] $ty => $kind where [$($bound)*];
                Add::add => Add,
                Sub::sub => Sub,
                Mul::mul => Mul,
                Div::div => Div,
            );
            unary_op!([$($gen)*] $ty => $kind where [$($bound)*]; Neg::neg => Negate);
        )+
    };
}

macro_rules! integer_ops {
    ($([$($gen:tt)*] $ty:ty where [$($bound:tt)*]),+ $(,)?) => {
        $(
            binary_ops!(
                [$($gen)*] $ty => Integer where [$($bound)*];
                Rem::rem => Rem,
                Shl::shl => Shl,
                Shr::shr => Shr,
                BitAnd::bitand => BitAnd,
                BitOr::bitor => BitOr,
            );
            unary_op!([$($gen)*] $ty => Integer where [$($bound)*]; Not::not => Complement);
        )+
    };
}

arithmetic!(
    [K: Numeric,] Expr<K> => K where [],
    ['a, K: Numeric,] &'a Expr<K> => K where [],
    [T: Table, V: SqlType, const I: usize,] Column<T, V, I> => <V as SqlType>::Kind
        where [<V as SqlType>::Kind: Numeric],
);

integer_ops!(
    [] Expr<Integer> where [],
    ['a,] &'a Expr<Integer> where [],
    [T: Table, V: SqlType<Kind = Integer>, const I: usize,] Column<T, V, I> where [],
);

binary_ops!(
    [] Expr<Bool> => Bool where [];
    BitAnd::bitand => And,
    BitOr::bitor => Or,
);

binary_ops!(
    ['a,] &'a Expr<Bool> => Bool where [];
    BitAnd::bitand => And,
    BitOr::bitor => Or,
);

unary_op!([] Expr<Bool> => Bool where []; Not::not => Not);
unary_op!(['a,] &'a Expr<Bool> => Bool where []; Not::not => Not);

// A literal on the left of an arithmetic operator.
macro_rules! literal_lhs {
    ($($lit:ty => $kind:ty),+ $(,)?) => {
        $(
            literal_lhs!(@op $lit => $kind; Add::add => Add, Sub::sub => Sub, Mul::mul => Mul, Div::div => Div);
        )+
    };
    (@op $lit:ty => $kind:ty; $($trait:ident :: $method:ident => $op:ident),+) => {
        $(
            impl $trait<Expr<$kind>> for $lit {
                type Output = Expr<$kind>;

                fn $method(self, rhs: Expr<$kind>) -> Expr<$kind> {
                    binary(BinaryOp::$op, lit(self), rhs)
                }
            }

            impl<'a> $trait<&'a Expr<$kind>> for $lit {
                type Output = Expr<$kind>;

                fn $method(self, rhs: &'a Expr<$kind>) -> Expr<$kind> {
                    binary(BinaryOp::$op, lit(self), rhs)
                }
            }

            impl<T: Table, V: SqlType<Kind = $kind>, const I: usize> $trait<Column<T, V, I>> for $lit {
                type Output = Expr<$kind>;

                fn $method(self, rhs: Column<T, V, I>) -> Expr<$kind> {
                    binary(BinaryOp::$op, lit(self), rhs)
                }
            }
        )+
    };
}

literal_lhs!(i32 => Integer, i64 => Integer, f64 => Real);
