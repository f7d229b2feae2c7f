//! Type-checked SQL statements for SQLite.
//!
//! Tables are declared with [`define_table!`]. Their columns are typed
//! handles that combine into expressions and conditions whose kinds are
//! checked at compile time, and the statement builders ([`select`],
//! [`insert_into`], [`insert_values`], [`update`] and [`create_table`])
//! render those into SQL with `?` placeholders and an ordered binding list.
//!
//! ```rust
//! use typesql::{
//!     create_table, define_table, insert_into, select, Database, Expression, Statement,
//! };
//!
//! define_table!(users {
//!     table: "users",
//!     columns: {
//!         ID: i64 => "id",
//!         NAME: String => "name"
//!     }
//! });
//!
//! let db = Database::open_in_memory()?;
//! create_table(users::TABLE).execute(&db)?;
//! insert_into(users::TABLE).values((1, "ada")).execute(&db)?;
//!
//! let names = select(users::NAME).filter(users::ID.eq(1)).fetch(&db)?;
//! assert_eq!(names, vec![Some("ada".to_string())]);
//! # Ok::<(), typesql::DbError>(())
//! ```

pub mod expr;
pub mod macros;
pub mod query;
pub mod table;

pub use expr::{lit, Condition, Expr, Expression, IntoExpr};
pub use query::*;
pub use table::{Assignment, Column, ColumnValue, KindList, Table};
pub use typesql_db::{
    type_name, Blob, Bool, Database, DatabaseConfig, DbError, FromColumns, FromSqlType, Integer,
    JournalMode, Kind, Numeric, QueryResult, Real, Result, SqlType, Storage, Text, TypedResult,
    Value,
};

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Tags(Vec<String>);

    impl SqlType for Tags {
        type Kind = Text;

        fn to_value(&self) -> Value {
            Value::Text(serde_json::to_string(self).unwrap_or_default())
        }
    }

    impl FromSqlType for Tags {
        fn from_native(native: String) -> Result<Self> {
            serde_json::from_str(&native).map_err(|err| DbError::Conversion(err.to_string()))
        }
    }

    define_table!(posts {
        table: "posts",
        columns: {
            ID: i64 => "id",
            TITLE: String => "title",
            TAGS: Tags => "tags",
            SCORE: f64 => "score",
        }
    });

    define_table!(authors {
        table: "authors",
        columns: {
            POST: i64 => "post",
            NAME: String => "name",
        }
    });

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        create_table(posts::TABLE).execute(&db).unwrap();
        create_table(authors::TABLE).execute(&db).unwrap();

        let tags = |list: &[&str]| Tags(list.iter().map(|s| s.to_string()).collect());
        insert_into(posts::TABLE)
            .values((1, "intro", tags(&["rust"]), 4.5))
            .execute(&db)
            .unwrap();
        insert_into(posts::TABLE)
            .values((2, "deep dive", tags(&["rust", "sql"]), 9.0))
            .execute(&db)
            .unwrap();
        insert_values((authors::POST.value(2), authors::NAME.value("ada")))
            .execute(&db)
            .unwrap();
        db
    }

    #[test]
    fn test_custom_type_roundtrip() {
        let db = seeded();
        let rows = select(posts::TAGS)
            .filter(posts::ID.eq(2))
            .fetch(&db)
            .unwrap();
        assert_eq!(
            rows,
            vec![Some(Tags(vec!["rust".to_string(), "sql".to_string()]))]
        );

        let query = select(posts::ID).filter(posts::TAGS.eq(Tags(vec!["rust".into()])));
        assert_eq!(query.bindings(), &[Value::Text(r#"["rust"]"#.into())]);
        assert_eq!(query.fetch(&db).unwrap(), vec![Some(1)]);
    }

    #[test]
    fn test_join_through_condition() {
        let db = seeded();
        let query = select((posts::TITLE, authors::NAME))
            .filter(posts::ID.eq(authors::POST) & posts::SCORE.gt(5.0));

        assert_eq!(
            query.sql(),
            "SELECT posts.title, authors.name FROM posts, authors \
             WHERE posts.id = authors.post AND posts.score > ?"
        );
        assert_eq!(
            query.fetch(&db).unwrap(),
            vec![(Some("deep dive".to_string()), Some("ada".to_string()))]
        );
    }

    #[test]
    fn test_update_then_read_back() {
        let db = seeded();
        update(posts::SCORE.set(posts::SCORE * 2.0))
            .filter(posts::ID.eq(1))
            .execute(&db)
            .unwrap();

        let mut result = select(posts::SCORE)
            .order_by(posts::ID)
            .execute_typed(&db)
            .unwrap();
        assert_eq!(result.row().unwrap(), Some(9.0));
        assert!(result.next());
        assert_eq!(result.row().unwrap(), Some(9.0));
        assert!(!result.next());
    }

    #[test]
    fn test_invalid_stored_value_is_a_conversion_error() {
        let db = seeded();
        db.execute("UPDATE posts SET tags = 'not json' WHERE id = 1")
            .unwrap();

        let err = select(posts::TAGS)
            .filter(posts::ID.eq(1))
            .fetch(&db)
            .unwrap_err();
        assert!(matches!(err, DbError::Conversion(_)));
    }

    #[test]
    fn test_column_type_mismatch_on_read() {
        let db = seeded();
        db.execute("UPDATE posts SET score = 'high' WHERE id = 1")
            .unwrap();

        let result = select(posts::SCORE)
            .filter(posts::ID.eq(1))
            .execute(&db)
            .unwrap();
        assert!(matches!(
            result.real(0),
            Err(DbError::ColumnType {
                expected: "REAL",
                found: "TEXT",
                ..
            })
        ));
    }
}
