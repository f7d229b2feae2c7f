//! Sets of table names referenced by expressions and statements.

use std::fmt;

use indexmap::IndexSet;

/// The distinct tables an expression or statement touches.
///
/// Iteration follows first insertion, so a FROM clause built from the set
/// lists tables in the order the statement first mentioned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSet(IndexSet<&'static str>);

impl TableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(table: &'static str) -> Self {
        let mut set = Self::new();
        set.insert(table);
        set
    }

    /// Adds `table`, returning `false` if it was already present.
    pub fn insert(&mut self, table: &'static str) -> bool {
        self.0.insert(table)
    }

    /// Adds every table of `other` not yet present.
    pub fn union(&mut self, other: TableSet) {
        self.0.extend(other.0);
    }

    pub fn contains(&self, table: &str) -> bool {
        self.0.contains(table)
    }

    pub fn is_subset(&self, other: &TableSet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().copied()
    }
}

impl<'a> IntoIterator for &'a TableSet {
    type Item = &'a &'static str;
    type IntoIter = indexmap::set::Iter<'a, &'static str>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<&'static str> for TableSet {
    fn from_iter<I: IntoIterator<Item = &'static str>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Renders the tables separated by `, `.
impl fmt::Display for TableSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, table) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(table)?;
        }
        Ok(())
    }
}
