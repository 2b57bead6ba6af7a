//! Result rows and forward-only cursors

use std::collections::VecDeque;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::{Error, Result, Value};

/// Conversion from a column value into a Rust type
pub trait FromValue: Sized {
    /// SQL type name reported when the conversion fails
    const SQL_TYPE: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! integer_from_value {
    ($($ty:ty => $sql:literal),* $(,)?) => {
        $(
            impl FromValue for $ty {
                const SQL_TYPE: &'static str = $sql;

                fn from_value(value: &Value) -> Option<Self> {
                    value.as_i64().and_then(|v| <$ty>::try_from(v).ok())
                }
            }
        )*
    };
}

integer_from_value! {
    u8 => "TINYINT",
    i16 => "SMALLINT",
    i32 => "INT",
    i64 => "BIGINT",
}

// Stores without a boolean type hand back 0 and 1.
impl FromValue for bool {
    const SQL_TYPE: &'static str = "BIT";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            other => match other.as_i64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
        }
    }
}

impl FromValue for f64 {
    const SQL_TYPE: &'static str = "FLOAT";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::F64(f) => Some(*f),
            other => other.as_i64().map(|i| i as f64),
        }
    }
}

#[cfg(feature = "decimal-support")]
impl FromValue for rust_decimal::Decimal {
    const SQL_TYPE: &'static str = "DECIMAL";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Decimal(d) => Some(*d),
            Value::String(s) => s.parse().ok(),
            other => other.as_i64().map(rust_decimal::Decimal::from),
        }
    }
}

impl FromValue for String {
    const SQL_TYPE: &'static str = "NVARCHAR";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromValue for Vec<u8> {
    const SQL_TYPE: &'static str = "VARBINARY";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bytes(b) => Some(b.clone()),
            _ => None,
        }
    }
}

impl FromValue for Value {
    const SQL_TYPE: &'static str = "ANY";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

/// A single result row with named columns
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Create a row; rows of one result set share their column names
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Position of a column, matched exactly first and then ignoring ASCII case
    pub fn ordinal(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .or_else(|| {
                self.columns
                    .iter()
                    .position(|c| c.eq_ignore_ascii_case(column))
            })
    }

    /// The raw value of a column
    pub fn value(&self, column: &str) -> Result<&Value> {
        self.ordinal(column)
            .and_then(|idx| self.values.get(idx))
            .ok_or_else(|| Error::column_not_found(column))
    }

    /// Read a column that must not be NULL
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use sqlpipe_core::{Row, Value};
    ///
    /// let row = Row::new(Arc::from(vec!["Id".to_string()]), vec![Value::I32(1)]);
    /// let id: i64 = row.get("Id").unwrap();
    /// assert_eq!(id, 1);
    /// ```
    pub fn get<T: FromValue>(&self, column: &str) -> Result<T> {
        let value = self.value(column)?;
        T::from_value(value)
            .ok_or_else(|| Error::type_mismatch(column, T::SQL_TYPE, value.type_name()))
    }

    /// Read a column that may be NULL
    pub fn get_nullable<T: FromValue>(&self, column: &str) -> Result<Option<T>> {
        let value = self.value(column)?;
        if value.is_null() {
            return Ok(None);
        }
        T::from_value(value)
            .map(Some)
            .ok_or_else(|| Error::type_mismatch(column, T::SQL_TYPE, value.type_name()))
    }

    /// Deserialize the row into a struct whose fields are named like the columns
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        let object: serde_json::Map<String, serde_json::Value> = self
            .columns
            .iter()
            .zip(&self.values)
            .map(|(column, value)| (column.clone(), value.to_json()))
            .collect();
        Ok(serde_json::from_value(serde_json::Value::Object(object))?)
    }
}

/// Forward-only cursor over a result set
///
/// Starts before the first row; [`RowCursor::advance`] moves onto the next
/// row and reports whether there was one.
#[derive(Debug, Default)]
pub struct RowCursor {
    pending: VecDeque<Row>,
    current: Option<Row>,
}

impl RowCursor {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            pending: rows.into(),
            current: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Move to the next row
    pub fn advance(&mut self) -> bool {
        self.current = self.pending.pop_front();
        self.current.is_some()
    }

    /// The row the cursor is positioned on
    pub fn current(&self) -> Option<&Row> {
        self.current.as_ref()
    }

    /// Whether another row follows the current one
    pub fn has_next(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Rows not yet visited
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// The rows not yet visited, in order
    pub fn into_rows(self) -> Vec<Row> {
        self.pending.into()
    }
}

impl Iterator for RowCursor {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.current = None;
        self.pending.pop_front()
    }
}
