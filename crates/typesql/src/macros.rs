//! Macros for declaring tables.
//!
//! The [`define_table!`] macro generates a module holding a table type and a
//! typed [`Column`](crate::table::Column) constant for each column.

/// Declares a table and its columns.
///
/// # Syntax
///
/// ```ignore
/// define_table!(users {
///     table: "users",
///     columns: {
///         ID: i64 => "id",
///         NAME: String => "name"
///     }
/// });
/// ```
///
/// This expands to roughly:
///
/// ```ignore
/// pub mod users {
///     pub struct Table;
///     pub const TABLE: Table = Table;
///     pub const ID: Column<Table, i64, 0> = Column::new();
///     pub const NAME: Column<Table, String, 1> = Column::new();
/// }
/// ```
///
/// Column types must implement [`FromSqlType`](crate::FromSqlType). Types
/// declared next to the macro invocation are visible inside the module, but
/// they appear in the public column constants, so they must be `pub`.
///
/// # Usage
///
/// ```rust
/// use typesql::{define_table, select, Expression, Statement};
///
/// define_table!(users {
///     table: "users",
///     columns: {
///         ID: i64 => "id",
///         NAME: String => "name"
///     }
/// });
///
/// let query = select(users::NAME).filter(users::ID.gt(0));
/// assert_eq!(query.sql(), "SELECT users.name FROM users WHERE users.id > ?");
/// ```
#[macro_export]
macro_rules! define_table {
    (
        $module:ident {
            table: $table:literal,
            columns: {
                $($col_name:ident: $col_type:ty => $db_col:literal),+ $(,)?
            }
        }
    ) => {
        pub mod $module {
            #[allow(unused_imports)]
            use super::*;

            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            pub struct Table;

            pub const TABLE: Table = Table;

            impl $crate::table::Table for Table {
                const NAME: &'static str = $table;
                const COLUMNS: &'static [&'static str] = &[$($db_col),+];
                type Kinds = ($(<$col_type as $crate::SqlType>::Kind,)+);
                type Row = ($(::core::option::Option<$col_type>,)+);
            }

            impl $crate::query::Selection for Table {
                type Row = <Self as $crate::table::Table>::Row;

                fn collect(
                    &self,
                    columns: &mut ::std::vec::Vec<::std::string::String>,
                    tables: &mut $crate::expr::TableSet,
                ) {
                    columns.push(::std::format!("{}.*", $table));
                    tables.insert($table);
                }
            }

            $crate::define_table!(@columns Table; 0usize; $($col_name: $col_type,)+);
        }
    };

    (@columns $table:ident; $index:expr; $col_name:ident: $col_type:ty, $($rest:tt)*) => {
        pub const $col_name: $crate::table::Column<$table, $col_type, { $index }> =
            $crate::table::Column::new();

        $crate::define_table!(@columns $table; $index + 1usize; $($rest)*);
    };

    (@columns $table:ident; $index:expr;) => {};
}
