//! Row cursors returned by [`crate::Database::execute`].

use std::marker::PhantomData;

use rusqlite::types::Value;

use crate::{
    error::{DbError, Result},
    types::{type_name, FromSqlType, Kind, Storage},
};

/// The rows produced by one statement, positioned on the first row.
///
/// Column access is by zero-based index. Reading a column outside
/// `0..count()`, or reading after the cursor ran past the last row, is a
/// programming error and panics.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    position: usize,
    changes: u64,
}

impl QueryResult {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Vec<Value>>, changes: u64) -> Self {
        Self {
            columns,
            rows,
            position: 0,
            changes,
        }
    }

    /// Whether the cursor is positioned on a row.
    pub fn has_data(&self) -> bool {
        self.position < self.rows.len()
    }

    /// Advances to the next row. Returns `false` once the rows are exhausted.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        if self.has_data() {
            self.position += 1;
        }
        self.has_data()
    }

    /// Number of columns in the result set.
    pub fn count(&self) -> usize {
        self.columns.len()
    }

    /// Number of buffered rows, regardless of the cursor position.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows inserted, updated or deleted by the statement.
    pub fn changes(&self) -> u64 {
        self.changes
    }

    /// Name of column `index`.
    pub fn name(&self, index: usize) -> &str {
        self.check_index(index);
        &self.columns[index]
    }

    /// Raw value of column `index` in the current row.
    pub fn value(&self, index: usize) -> &Value {
        self.check_index(index);
        match self.rows.get(self.position) {
            Some(row) => &row[index],
            None => panic!("no current row: the result has been fully consumed"),
        }
    }

    /// Reads column `index` as `V`, returning `None` for SQL NULL.
    pub fn get<V: FromSqlType>(&self, index: usize) -> Result<Option<V>> {
        let value = self.value(index);
        if let Value::Null = value {
            return Ok(None);
        }

        let native =
            <V::Kind as Storage>::decode(value).ok_or_else(|| DbError::ColumnType {
                index,
                expected: <V::Kind as Kind>::TYPE_NAME,
                found: type_name(value),
            })?;
        V::from_native(native).map(Some)
    }

    pub fn integer(&self, index: usize) -> Result<Option<i64>> {
        self.get(index)
    }

    pub fn real(&self, index: usize) -> Result<Option<f64>> {
        self.get(index)
    }

    pub fn text(&self, index: usize) -> Result<Option<String>> {
        self.get(index)
    }

    pub fn blob(&self, index: usize) -> Result<Option<Vec<u8>>> {
        self.get(index)
    }

    fn check_index(&self, index: usize) {
        if index >= self.columns.len() {
            panic!(
                "Incorrect column index {} (result has {} columns)",
                index,
                self.columns.len()
            );
        }
    }
}

/// A type that can be decoded from consecutive columns of a row.
///
/// Implemented for `Option<V>` (one column) and for tuples of decoders,
/// which lets a row be read as nested tuples mirroring the selection.
pub trait FromColumns: Sized {
    /// Number of columns consumed.
    const WIDTH: usize;

    fn from_columns(result: &QueryResult, offset: usize) -> Result<Self>;
}

impl<V: FromSqlType> FromColumns for Option<V> {
    const WIDTH: usize = 1;

    fn from_columns(result: &QueryResult, offset: usize) -> Result<Self> {
        result.get(offset)
    }
}

macro_rules! tuple_columns {
    ($($name:ident),+) => {
        impl<$($name: FromColumns),+> FromColumns for ($($name,)+) {
            const WIDTH: usize = 0 $(+ $name::WIDTH)+;

            #[allow(unused_assignments)]
            fn from_columns(result: &QueryResult, mut offset: usize) -> Result<Self> {
                Ok(($({
                    let value = $name::from_columns(result, offset)?;
                    offset += $name::WIDTH;
                    value
                },)+))
            }
        }
    };
}

tuple_columns!(A);
tuple_columns!(A, B);
tuple_columns!(A, B, C);
tuple_columns!(A, B, C, D);
tuple_columns!(A, B, C, D, E);
tuple_columns!(A, B, C, D, E, F);
tuple_columns!(A, B, C, D, E, F, G);
tuple_columns!(A, B, C, D, E, F, G, H);
tuple_columns!(A, B, C, D, E, F, G, H, I);
tuple_columns!(A, B, C, D, E, F, G, H, I, J);
tuple_columns!(A, B, C, D, E, F, G, H, I, J, K);
tuple_columns!(A, B, C, D, E, F, G, H, I, J, K, L);

/// A [`QueryResult`] tagged with the row type its statement selects.
#[derive(Debug, Clone)]
pub struct TypedResult<R> {
    inner: QueryResult,
    _row: PhantomData<fn() -> R>,
}

impl<R: FromColumns> TypedResult<R> {
    pub fn new(inner: QueryResult) -> Self {
        Self {
            inner,
            _row: PhantomData,
        }
    }

    pub fn has_data(&self) -> bool {
        self.inner.has_data()
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        self.inner.next()
    }

    /// Decodes the current row.
    pub fn row(&self) -> Result<R> {
        R::from_columns(&self.inner, 0)
    }

    /// Decodes the current row and every row after it.
    pub fn rows(mut self) -> Result<Vec<R>> {
        let mut rows = Vec::with_capacity(self.inner.len());
        while self.has_data() {
            rows.push(self.row()?);
            self.next();
        }
        Ok(rows)
    }

    pub fn result(&self) -> &QueryResult {
        &self.inner
    }

    pub fn into_inner(self) -> QueryResult {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QueryResult {
        QueryResult::new(
            vec!["id".into(), "name".into(), "score".into()],
            vec![
                vec![
                    Value::Integer(1),
                    Value::Text("alice".into()),
                    Value::Real(9.5),
                ],
                vec![Value::Integer(2), Value::Null, Value::Integer(7)],
            ],
            0,
        )
    }

    #[test]
    fn test_cursor() {
        let mut result = sample();
        assert!(result.has_data());
        assert_eq!(result.count(), 3);
        assert_eq!(result.name(1), "name");
        assert!(result.next());
        assert!(!result.next());
        assert!(!result.has_data());
        assert!(!result.next());
    }

    #[test]
    fn test_typed_access() {
        let mut result = sample();
        assert_eq!(result.integer(0).unwrap(), Some(1));
        assert_eq!(result.text(1).unwrap(), Some("alice".to_string()));
        assert_eq!(result.real(2).unwrap(), Some(9.5));

        result.next();
        assert_eq!(result.text(1).unwrap(), None);
        assert_eq!(result.real(2).unwrap(), Some(7.0));
    }

    #[test]
    fn test_kind_mismatch() {
        let result = sample();
        let err = result.text(0).unwrap_err();
        assert!(matches!(
            err,
            DbError::ColumnType {
                index: 0,
                expected: "TEXT",
                found: "INTEGER"
            }
        ));
    }

    #[test]
    #[should_panic(expected = "Incorrect column index")]
    fn test_index_out_of_range() {
        sample().name(3);
    }

    #[test]
    fn test_typed_rows() {
        let typed = TypedResult::<((Option<i64>, Option<String>), Option<f64>)>::new(sample());
        let rows = typed.rows().unwrap();
        assert_eq!(
            rows,
            vec![
                ((Some(1), Some("alice".to_string())), Some(9.5)),
                ((Some(2), None), Some(7.0)),
            ]
        );
    }
}
