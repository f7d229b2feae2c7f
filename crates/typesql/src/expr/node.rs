//! The expression tree.
//!
//! A [`Node`] is either a leaf (a qualified column or a `?` placeholder), a
//! unary operator with one child, or a binary operator with two. Trees are
//! plain values: cloning deep-copies every node and no subtree is shared.

use std::fmt::{self, Write};

/// Binding strength of a node when rendered as SQL, loosest first.
///
/// SQLite binds `NOT` looser than any comparison, so a negated condition
/// sits between `And` and `Equality` rather than with the other prefix
/// operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Or,
    And,
    Not,
    Equality,
    Ordering,
    BitOr,
    BitAnd,
    Shift,
    Additive,
    Multiplicative,
    Unary,
    Value,
}

impl Precedence {
    const fn is_bitwise(self) -> bool {
        matches!(self, Precedence::BitOr | Precedence::BitAnd | Precedence::Shift)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Plus,
    Complement,
    Not,
}

impl UnaryOp {
    pub const fn token(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Complement => "~",
            UnaryOp::Not => "NOT ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl BinaryOp {
    pub const fn token(self) -> &'static str {
        match self {
            BinaryOp::Mul => " * ",
            BinaryOp::Div => " / ",
            BinaryOp::Rem => " % ",
            BinaryOp::Add => " + ",
            BinaryOp::Sub => " - ",
            BinaryOp::Shl => " << ",
            BinaryOp::Shr => " >> ",
            BinaryOp::BitAnd => " & ",
            BinaryOp::BitOr => " | ",
            BinaryOp::Lt => " < ",
            BinaryOp::Le => " <= ",
            BinaryOp::Gt => " > ",
            BinaryOp::Ge => " >= ",
            BinaryOp::Eq => " = ",
            BinaryOp::Ne => " <> ",
            BinaryOp::And => " AND ",
            BinaryOp::Or => " OR ",
        }
    }

    pub const fn precedence(self) -> Precedence {
        match self {
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => Precedence::Multiplicative,
            BinaryOp::Add | BinaryOp::Sub => Precedence::Additive,
            BinaryOp::Shl | BinaryOp::Shr => Precedence::Shift,
            BinaryOp::BitAnd => Precedence::BitAnd,
            BinaryOp::BitOr => Precedence::BitOr,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => Precedence::Ordering,
            BinaryOp::Eq | BinaryOp::Ne => Precedence::Equality,
            BinaryOp::And => Precedence::And,
            BinaryOp::Or => Precedence::Or,
        }
    }

    /// Whether `a op (b op c)` means the same as `a op b op c`.
    const fn is_associative(self) -> bool {
        matches!(
            self,
            BinaryOp::Mul
                | BinaryOp::Add
                | BinaryOp::BitAnd
                | BinaryOp::BitOr
                | BinaryOp::And
                | BinaryOp::Or
        )
    }

    fn needs_parens(self, child: Precedence, is_right: bool) -> bool {
        let parent = self.precedence();
        child < parent
            || (is_right && child == parent && !self.is_associative())
            // SQLite gives shifts, `&` and `|` a single precedence level.
            || (child != parent && parent.is_bitwise() && child.is_bitwise())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leaf {
    /// Renders as `table.column`.
    Column {
        table: &'static str,
        column: &'static str,
    },
    /// Renders as `?`. The value travels in the binding list.
    Param,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(Leaf),
    Unary {
        op: UnaryOp,
        child: Box<Node>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn column(table: &'static str, column: &'static str) -> Self {
        Node::Leaf(Leaf::Column { table, column })
    }

    pub fn param() -> Self {
        Node::Leaf(Leaf::Param)
    }

    pub fn unary(op: UnaryOp, child: Node) -> Self {
        Node::Unary {
            op,
            child: Box::new(child),
        }
    }

    pub fn binary(op: BinaryOp, left: Node, right: Node) -> Self {
        Node::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn precedence(&self) -> Precedence {
        match self {
            Node::Leaf(_) => Precedence::Value,
            Node::Unary { op: UnaryOp::Not, .. } => Precedence::Not,
            Node::Unary { .. } => Precedence::Unary,
            Node::Binary { op, .. } => op.precedence(),
        }
    }

    /// Number of `?` placeholders in the tree.
    pub fn placeholders(&self) -> usize {
        match self {
            Node::Leaf(Leaf::Param) => 1,
            Node::Leaf(Leaf::Column { .. }) => 0,
            Node::Unary { child, .. } => child.placeholders(),
            Node::Binary { left, right, .. } => left.placeholders() + right.placeholders(),
        }
    }

    /// Writes the tree as SQL, wrapped in parentheses when `parenthesize`.
    ///
    /// A child is parenthesized when it binds looser than its parent. The
    /// right operand of a non-associative operator is also parenthesized at
    /// equal precedence, so `a - (b - c)` keeps its grouping. Mixed bitwise
    /// operators are always grouped explicitly.
    pub fn dump(&self, out: &mut dyn Write, parenthesize: bool) -> fmt::Result {
        if parenthesize {
            out.write_char('(')?;
        }

        match self {
            Node::Leaf(Leaf::Column { table, column }) => write!(out, "{}.{}", table, column)?,
            Node::Leaf(Leaf::Param) => out.write_char('?')?,
            Node::Unary { op, child } => {
                out.write_str(op.token())?;
                // `--x` would start a comment.
                child.dump(out, child.precedence() <= Precedence::Unary)?;
            }
            Node::Binary { op, left, right } => {
                left.dump(out, op.needs_parens(left.precedence(), false))?;
                out.write_str(op.token())?;
                right.dump(out, op.needs_parens(right.precedence(), true))?;
            }
        }

        if parenthesize {
            out.write_char(')')?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.dump(f, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &'static str) -> Node {
        Node::column(name, name)
    }

    #[test]
    fn test_leaves() {
        assert_eq!(col("a").to_string(), "a.a");
        assert_eq!(Node::param().to_string(), "?");
    }

    #[test]
    fn test_looser_child_is_parenthesized() {
        let sum = Node::binary(BinaryOp::Add, col("a"), col("b"));
        let product = Node::binary(BinaryOp::Mul, sum, col("c"));
        assert_eq!(product.to_string(), "(a.a + b.b) * c.c");

        let or = Node::binary(BinaryOp::Or, col("a"), col("b"));
        let and = Node::binary(BinaryOp::And, col("c"), or);
        assert_eq!(and.to_string(), "c.c AND (a.a OR b.b)");
    }

    #[test]
    fn test_tighter_child_is_not_parenthesized() {
        let product = Node::binary(BinaryOp::Mul, col("a"), col("b"));
        let sum = Node::binary(BinaryOp::Add, product, col("c"));
        assert_eq!(sum.to_string(), "a.a * b.b + c.c");

        let lhs = Node::binary(BinaryOp::Add, col("b"), Node::param());
        let eq = Node::binary(BinaryOp::Eq, lhs, col("c"));
        assert_eq!(eq.to_string(), "b.b + ? = c.c");
    }

    #[test]
    fn test_equal_precedence() {
        let inner = Node::binary(BinaryOp::Sub, col("a"), col("b"));
        let left = Node::binary(BinaryOp::Sub, inner.clone(), col("c"));
        assert_eq!(left.to_string(), "a.a - b.b - c.c");

        let right = Node::binary(BinaryOp::Sub, col("c"), inner);
        assert_eq!(right.to_string(), "c.c - (a.a - b.b)");

        let and = Node::binary(BinaryOp::And, col("a"), col("b"));
        let chained = Node::binary(BinaryOp::And, col("c"), and);
        assert_eq!(chained.to_string(), "c.c AND a.a AND b.b");
    }

    #[test]
    fn test_mixed_bitwise_is_grouped() {
        let and = Node::binary(BinaryOp::BitAnd, col("b"), col("c"));
        let or = Node::binary(BinaryOp::BitOr, col("a"), and);
        assert_eq!(or.to_string(), "a.a | (b.b & c.c)");

        let shift = Node::binary(BinaryOp::Shl, col("a"), Node::param());
        let masked = Node::binary(BinaryOp::BitAnd, shift, col("b"));
        assert_eq!(masked.to_string(), "(a.a << ?) & b.b");
    }

    #[test]
    fn test_unary() {
        let sum = Node::binary(BinaryOp::Add, col("a"), col("b"));
        assert_eq!(
            Node::unary(UnaryOp::Negate, sum).to_string(),
            "-(a.a + b.b)"
        );
        assert_eq!(Node::unary(UnaryOp::Complement, col("a")).to_string(), "~a.a");

        let negated = Node::unary(UnaryOp::Negate, col("a"));
        assert_eq!(
            Node::unary(UnaryOp::Negate, negated).to_string(),
            "-(-a.a)"
        );

        let eq = Node::binary(BinaryOp::Eq, col("a"), Node::param());
        assert_eq!(Node::unary(UnaryOp::Not, eq).to_string(), "NOT (a.a = ?)");
    }

    #[test]
    fn test_not_binds_looser_than_comparison() {
        let negated = Node::unary(UnaryOp::Not, col("a"));
        assert_eq!(negated.precedence(), Precedence::Not);

        let cmp = Node::binary(BinaryOp::Lt, negated.clone(), col("b"));
        assert_eq!(cmp.to_string(), "(NOT a.a) < b.b");

        let eq = Node::binary(BinaryOp::Eq, col("b"), negated.clone());
        assert_eq!(eq.to_string(), "b.b = (NOT a.a)");

        let and = Node::binary(BinaryOp::And, negated.clone(), col("b"));
        assert_eq!(and.to_string(), "NOT a.a AND b.b");

        let twice = Node::unary(UnaryOp::Not, negated);
        assert_eq!(twice.to_string(), "NOT (NOT a.a)");
    }

    #[test]
    fn test_parenthesize_root() {
        let mut out = String::new();
        Node::binary(BinaryOp::Or, col("a"), col("b"))
            .dump(&mut out, true)
            .unwrap();
        assert_eq!(out, "(a.a OR b.b)");
    }

    #[test]
    fn test_clone_is_deep() {
        let original = Node::binary(BinaryOp::Add, col("a"), Node::param());
        let copy = original.clone();
        assert_eq!(original, copy);
        assert_eq!(copy.placeholders(), 1);
    }
}
