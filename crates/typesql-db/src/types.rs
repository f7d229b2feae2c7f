//! Storage kinds and the conversion contract between Rust values and SQLite.
//!
//! Every value that reaches the database is stored as one of four kinds:
//! [`Integer`], [`Real`], [`Text`] or [`Blob`]. A Rust type takes part in
//! statements by implementing [`SqlType`], which names its kind and produces
//! the [`Value`] that gets bound to a placeholder. Types that can also be read
//! back from a result implement [`FromSqlType`].
//!
//! # Example
//!
//! ```rust
//! use typesql_db::{Blob, DbError, FromSqlType, SqlType, Value};
//!
//! #[derive(Debug, PartialEq)]
//! struct Rgb(u8, u8, u8);
//!
//! impl SqlType for Rgb {
//!     type Kind = Blob;
//!
//!     fn to_value(&self) -> Value {
//!         Value::Blob(vec![self.0, self.1, self.2])
//!     }
//! }
//!
//! impl FromSqlType for Rgb {
//!     fn from_native(native: Vec<u8>) -> typesql_db::Result<Self> {
//!         match native.as_slice() {
//!             [r, g, b] => Ok(Rgb(*r, *g, *b)),
//!             _ => Err(DbError::Conversion("expected three bytes".into())),
//!         }
//!     }
//! }
//!
//! assert_eq!(Rgb(1, 2, 3).to_value(), Value::Blob(vec![1, 2, 3]));
//! ```

use rusqlite::types::Value;

use crate::error::{DbError, Result};

mod sealed {
    pub trait Sealed {}
}

/// The kind an expression evaluates to.
pub trait Kind: sealed::Sealed + 'static {
    /// SQL type name used in `CREATE TABLE`.
    const TYPE_NAME: &'static str = "UNKNOWN";
}

/// A kind that can be stored in a column.
pub trait Storage: Kind {
    /// The Rust type SQLite hands back for this kind.
    type Native;

    /// Extracts the native value, `None` if `value` holds another kind.
    fn decode(value: &Value) -> Option<Self::Native>;
}

/// Kinds that support arithmetic and negation.
pub trait Numeric: Storage {}

/// 64-bit signed integer storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Integer;

/// 64-bit floating point storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Real;

/// UTF-8 text storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Text;

/// Raw byte storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Blob;

/// Result kind of conditions. Never stored in a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bool;

impl sealed::Sealed for Integer {}
impl sealed::Sealed for Real {}
impl sealed::Sealed for Text {}
impl sealed::Sealed for Blob {}
impl sealed::Sealed for Bool {}

impl Kind for Integer {
    const TYPE_NAME: &'static str = "INTEGER";
}

impl Kind for Real {
    const TYPE_NAME: &'static str = "REAL";
}

impl Kind for Text {
    const TYPE_NAME: &'static str = "TEXT";
}

impl Kind for Blob {
    const TYPE_NAME: &'static str = "BLOB";
}

impl Kind for Bool {}

impl Storage for Integer {
    type Native = i64;

    fn decode(value: &Value) -> Option<i64> {
        match value {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl Storage for Real {
    type Native = f64;

    // SQLite reports integral REAL results (e.g. `SUM`) as integers.
    fn decode(value: &Value) -> Option<f64> {
        match value {
            Value::Real(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl Storage for Text {
    type Native = String;

    fn decode(value: &Value) -> Option<String> {
        match value {
            Value::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl Storage for Blob {
    type Native = Vec<u8>;

    fn decode(value: &Value) -> Option<Vec<u8>> {
        match value {
            Value::Blob(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl Numeric for Integer {}
impl Numeric for Real {}

/// Returns the storage class name of a bound or fetched value.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NULL",
        Value::Integer(_) => Integer::TYPE_NAME,
        Value::Real(_) => Real::TYPE_NAME,
        Value::Text(_) => Text::TYPE_NAME,
        Value::Blob(_) => Blob::TYPE_NAME,
    }
}

/// Maps a Rust type onto a storage kind.
pub trait SqlType {
    type Kind: Storage;

    /// Converts the value into the binding passed to SQLite.
    fn to_value(&self) -> Value;
}

/// A [`SqlType`] that can be rebuilt from its kind's native value.
pub trait FromSqlType: SqlType + Sized {
    fn from_native(native: <Self::Kind as Storage>::Native) -> Result<Self>;
}

macro_rules! integer_types {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SqlType for $ty {
                type Kind = Integer;

                fn to_value(&self) -> Value {
                    Value::Integer(i64::from(*self))
                }
            }

            impl FromSqlType for $ty {
                fn from_native(native: i64) -> Result<Self> {
                    <$ty>::try_from(native).map_err(|_| {
                        DbError::Conversion(format!(
                            "{} is out of range for {}",
                            native,
                            stringify!($ty)
                        ))
                    })
                }
            }
        )*
    };
}

integer_types!(i8, i16, i32, i64, u8, u16, u32);

impl SqlType for bool {
    type Kind = Integer;

    fn to_value(&self) -> Value {
        Value::Integer(i64::from(*self))
    }
}

impl FromSqlType for bool {
    fn from_native(native: i64) -> Result<Self> {
        Ok(native != 0)
    }
}

impl SqlType for char {
    type Kind = Integer;

    fn to_value(&self) -> Value {
        Value::Integer(i64::from(u32::from(*self)))
    }
}

impl FromSqlType for char {
    fn from_native(native: i64) -> Result<Self> {
        u32::try_from(native)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| DbError::Conversion(format!("{} is not a valid char", native)))
    }
}

impl SqlType for f32 {
    type Kind = Real;

    fn to_value(&self) -> Value {
        Value::Real(f64::from(*self))
    }
}

impl FromSqlType for f32 {
    fn from_native(native: f64) -> Result<Self> {
        Ok(native as f32)
    }
}

impl SqlType for f64 {
    type Kind = Real;

    fn to_value(&self) -> Value {
        Value::Real(*self)
    }
}

impl FromSqlType for f64 {
    fn from_native(native: f64) -> Result<Self> {
        Ok(native)
    }
}

impl SqlType for String {
    type Kind = Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl FromSqlType for String {
    fn from_native(native: String) -> Result<Self> {
        Ok(native)
    }
}

impl SqlType for &str {
    type Kind = Text;

    fn to_value(&self) -> Value {
        Value::Text((*self).to_owned())
    }
}

impl SqlType for Vec<u8> {
    type Kind = Blob;

    fn to_value(&self) -> Value {
        Value::Blob(self.clone())
    }
}

impl FromSqlType for Vec<u8> {
    fn from_native(native: Vec<u8>) -> Result<Self> {
        Ok(native)
    }
}

impl SqlType for &[u8] {
    type Kind = Blob;

    fn to_value(&self) -> Value {
        Value::Blob(self.to_vec())
    }
}
