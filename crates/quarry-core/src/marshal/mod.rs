//! Conversion between host values and the engine's typed cells.
//!
//! # Host values
//!
//! Two kinds of host value are understood:
//!
//! - Native Rust scalars (`bool`, integers, floats, strings, byte buffers and
//!   `Option` of any of these), which always map to a cell.
//! - Dynamic JSON values ([`serde_json::Value`]), standing in for a scripting
//!   environment's dynamic values. Objects and arrays have no cell
//!   representation and fail with [`QuarryError::UnbindableType`] when bound
//!   as a scalar; as containers they drive bulk binding
//!   ([`Statement::bind_json`]).
//!
//! # Dispatch rule
//!
//! | Host value | Engine cell                         |
//! |------------|-------------------------------------|
//! | null       | NULL                                |
//! | boolean    | integer 0 / 1                       |
//! | integer    | 64-bit integer                      |
//! | number     | double                              |
//! | text       | text, copied at bind time           |
//! | bytes      | blob, copied at bind time           |
//!
//! JSON numbers follow the "number" row: they are always bound as doubles.
//!
//! [`Statement::bind_json`]: crate::Statement::bind_json

use serde::Serialize;

use crate::{
    error::{QuarryError, Result},
    outcome::ColumnType,
};

pub mod bind;
pub mod columns;

pub use columns::ColumnTag;

/// A value ready to be bound to a statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Null,
    /// Bound as integer 0 or 1
    Boolean(bool),
    Integer(i64),
    /// Bound as a double
    Number(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl BindValue {
    /// Short kind name used in log lines.
    pub fn type_name(&self) -> &'static str {
        match self {
            BindValue::Null => "null",
            BindValue::Boolean(_) => "boolean",
            BindValue::Integer(_) => "integer",
            BindValue::Number(_) => "number",
            BindValue::Text(_) => "text",
            BindValue::Blob(_) => "blob",
        }
    }
}

impl From<bool> for BindValue {
    fn from(value: bool) -> Self {
        BindValue::Boolean(value)
    }
}

impl From<i32> for BindValue {
    fn from(value: i32) -> Self {
        BindValue::Integer(i64::from(value))
    }
}

impl From<i64> for BindValue {
    fn from(value: i64) -> Self {
        BindValue::Integer(value)
    }
}

impl From<f64> for BindValue {
    fn from(value: f64) -> Self {
        BindValue::Number(value)
    }
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        BindValue::Text(value.to_string())
    }
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        BindValue::Text(value)
    }
}

impl From<&[u8]> for BindValue {
    fn from(value: &[u8]) -> Self {
        BindValue::Blob(value.to_vec())
    }
}

impl From<Vec<u8>> for BindValue {
    fn from(value: Vec<u8>) -> Self {
        BindValue::Blob(value)
    }
}

impl<T: Into<BindValue>> From<Option<T>> for BindValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(BindValue::Null, Into::into)
    }
}

/// Host values that can be marshalled into a [`BindValue`].
///
/// Fallible because dynamic host values may hold kinds (JSON arrays and
/// objects) that have no cell representation.
pub trait ToBindValue {
    fn to_bind_value(&self) -> Result<BindValue>;
}

impl<T: ToBindValue + ?Sized> ToBindValue for &T {
    fn to_bind_value(&self) -> Result<BindValue> {
        (**self).to_bind_value()
    }
}

impl ToBindValue for BindValue {
    fn to_bind_value(&self) -> Result<BindValue> {
        Ok(self.clone())
    }
}

macro_rules! to_bind_value_via_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToBindValue for $ty {
                fn to_bind_value(&self) -> Result<BindValue> {
                    Ok(BindValue::from(self.clone()))
                }
            }
        )*
    };
}

to_bind_value_via_from!(bool, i32, i64, f64, String, Vec<u8>);

impl ToBindValue for str {
    fn to_bind_value(&self) -> Result<BindValue> {
        Ok(BindValue::Text(self.to_string()))
    }
}

impl ToBindValue for [u8] {
    fn to_bind_value(&self) -> Result<BindValue> {
        Ok(BindValue::Blob(self.to_vec()))
    }
}

impl<T: ToBindValue> ToBindValue for Option<T> {
    fn to_bind_value(&self) -> Result<BindValue> {
        match self {
            Some(value) => value.to_bind_value(),
            None => Ok(BindValue::Null),
        }
    }
}

impl ToBindValue for serde_json::Value {
    fn to_bind_value(&self) -> Result<BindValue> {
        use serde_json::Value;

        match self {
            Value::Null => Ok(BindValue::Null),
            Value::Bool(value) => Ok(BindValue::Boolean(*value)),
            Value::Number(number) => number
                .as_f64()
                .map(BindValue::Number)
                .ok_or(QuarryError::UnbindableType { type_name: "number" }),
            Value::String(text) => Ok(BindValue::Text(text.clone())),
            Value::Array(_) => Err(QuarryError::UnbindableType { type_name: "array" }),
            Value::Object(_) => Err(QuarryError::UnbindableType { type_name: "object" }),
        }
    }
}

/// Parameter address: a 1-based position or a full parameter name such as
/// `":id"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKey {
    Index(usize),
    Name(String),
}

impl From<usize> for ParamKey {
    fn from(index: usize) -> Self {
        ParamKey::Index(index)
    }
}

impl From<&str> for ParamKey {
    fn from(name: &str) -> Self {
        ParamKey::Name(name.to_string())
    }
}

impl From<String> for ParamKey {
    fn from(name: String) -> Self {
        ParamKey::Name(name)
    }
}

impl From<&String> for ParamKey {
    fn from(name: &String) -> Self {
        ParamKey::Name(name.clone())
    }
}

/// A value copied out of the current row.
///
/// Serializes untagged, so JSON output shows plain numbers, strings and
/// `null`; blobs appear as byte arrays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl ColumnValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ColumnValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ColumnValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ColumnValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            ColumnValue::Blob(value) => Some(value),
            _ => None,
        }
    }

    /// The dynamic type this value was read as.
    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnValue::Null => ColumnType::Null,
            ColumnValue::Integer(_) => ColumnType::Integer,
            ColumnValue::Float(_) => ColumnType::Float,
            ColumnValue::Text(_) => ColumnType::Text,
            ColumnValue::Blob(_) => ColumnType::Blob,
        }
    }
}
