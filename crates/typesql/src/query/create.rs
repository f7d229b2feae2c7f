//! CREATE TABLE statements derived from a table declaration.

use std::{fmt, marker::PhantomData};

use typesql_db::Value;

use super::Statement;
use crate::table::{KindList, Table};

/// `CREATE TABLE` for table `T`, one column per declared column with the
/// SQL type of its kind.
#[derive(Debug)]
pub struct CreateTable<T> {
    if_not_exists: bool,
    _table: PhantomData<fn() -> T>,
}

/// Builds `CREATE TABLE t (...)`.
pub fn create_table<T: Table>(_table: T) -> CreateTable<T> {
    CreateTable {
        if_not_exists: false,
        _table: PhantomData,
    }
}

/// Builds `CREATE TABLE IF NOT EXISTS t (...)`.
pub fn create_table_if_not_exists<T: Table>(_table: T) -> CreateTable<T> {
    CreateTable {
        if_not_exists: true,
        _table: PhantomData,
    }
}

impl<T: Table> CreateTable<T> {
    fn render(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        out.write_str("CREATE TABLE ")?;
        if self.if_not_exists {
            out.write_str("IF NOT EXISTS ")?;
        }
        write!(out, "{} (", T::NAME)?;

        let types = <T::Kinds as KindList>::type_names();
        for (i, (column, ty)) in T::COLUMNS.iter().zip(types).enumerate() {
            if i > 0 {
                out.write_str(", ")?;
            }
            write!(out, "{} {}", column, ty)?;
        }

        out.write_char(')')
    }
}

impl<T> Clone for CreateTable<T> {
    fn clone(&self) -> Self {
        Self {
            if_not_exists: self.if_not_exists,
            _table: PhantomData,
        }
    }
}

impl<T: Table> Statement for CreateTable<T> {
    fn dump(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        self.render(out)
    }

    fn bindings(&self) -> &[Value] {
        &[]
    }
}

impl<T: Table> fmt::Display for CreateTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f)
    }
}

#[cfg(test)]
mod tests {
    use typesql_db::Database;

    use super::*;
    use crate::{
        define_table,
        expr::Expression,
        query::{insert_into, select},
    };

    define_table!(t {
        table: "T",
        columns: {
            ID: i64 => "id",
            TEXT: String => "text",
        }
    });

    define_table!(samples {
        table: "samples",
        columns: {
            ID: i64 => "id",
            WEIGHT: f64 => "weight",
            PAYLOAD: Vec<u8> => "payload",
            VALID: bool => "valid",
        }
    });

    #[test]
    fn test_create_sql() {
        assert_eq!(
            create_table(t::TABLE).sql(),
            "CREATE TABLE T (id INTEGER, text TEXT)"
        );
        assert_eq!(
            create_table_if_not_exists(samples::TABLE).to_string(),
            "CREATE TABLE IF NOT EXISTS samples \
             (id INTEGER, weight REAL, payload BLOB, valid INTEGER)"
        );
        assert!(create_table(t::TABLE).bindings().is_empty());
    }

    #[test]
    fn test_create_insert_select_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        create_table(t::TABLE).execute(&db).unwrap();
        insert_into(t::TABLE).values((10, "Hi")).execute(&db).unwrap();

        let mut result = select(t::TABLE).execute_typed(&db).unwrap();
        assert!(result.has_data());
        assert_eq!(result.row().unwrap(), (Some(10), Some("Hi".to_string())));
        assert!(!result.next());
        assert!(!result.has_data());
    }

    #[test]
    fn test_if_not_exists_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        create_table_if_not_exists(samples::TABLE).execute(&db).unwrap();
        create_table_if_not_exists(samples::TABLE).execute(&db).unwrap();
        assert!(create_table(samples::TABLE).execute(&db).is_err());

        insert_into(samples::TABLE)
            .values((1, 2.5, vec![1u8, 2], true))
            .execute(&db)
            .unwrap();

        let rows = select((samples::WEIGHT, samples::PAYLOAD, samples::VALID))
            .filter(samples::ID.eq(1))
            .fetch(&db)
            .unwrap();
        assert_eq!(rows, vec![(Some(2.5), Some(vec![1, 2]), Some(true))]);
    }
}
