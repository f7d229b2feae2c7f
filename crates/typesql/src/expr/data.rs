//! Expression trees together with their tables and bindings.

use std::fmt;

use typesql_db::Value;

use super::{
    node::{BinaryOp, Node, UnaryOp},
    tables::TableSet,
};

/// Owns an expression tree, the tables it references and the values bound
/// to its placeholders.
///
/// `binds` lists one value per `?` leaf in left-to-right order. Every
/// constructor preserves that: combining two operands concatenates their
/// bindings left first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Data {
    root: Option<Node>,
    tables: TableSet,
    binds: Vec<Value>,
}

impl Data {
    /// A reference to `table.column`.
    pub fn column(table: &'static str, column: &'static str) -> Self {
        Self {
            root: Some(Node::column(table, column)),
            tables: TableSet::single(table),
            binds: Vec::new(),
        }
    }

    /// A placeholder bound to `value`.
    pub fn param(value: Value) -> Self {
        Self {
            root: Some(Node::param()),
            tables: TableSet::new(),
            binds: vec![value],
        }
    }

    pub fn unary(op: UnaryOp, child: Data) -> Self {
        Self {
            root: child.root.map(|node| Node::unary(op, node)),
            tables: child.tables,
            binds: child.binds,
        }
    }

    /// Combines two operands. An empty operand contributes nothing.
    pub fn binary(op: BinaryOp, left: Data, right: Data) -> Self {
        let root = match (left.root, right.root) {
            (Some(l), Some(r)) => Some(Node::binary(op, l, r)),
            (Some(node), None) | (None, Some(node)) => Some(node),
            (None, None) => None,
        };

        let mut tables = left.tables;
        tables.union(right.tables);

        let mut binds = left.binds;
        binds.extend(right.binds);

        Self {
            root,
            tables,
            binds,
        }
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn tables(&self) -> &TableSet {
        &self.tables
    }

    pub fn binds(&self) -> &[Value] {
        &self.binds
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn into_parts(self) -> (Option<Node>, TableSet, Vec<Value>) {
        (self.root, self.tables, self.binds)
    }

    /// Writes the tree as SQL. An empty tree writes nothing.
    pub fn dump(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        match &self.root {
            Some(node) => node.dump(out, false),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.dump(f)
    }
}
