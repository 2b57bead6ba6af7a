//! Value types for SQL parameters and result columns

use serde::{Deserialize, Serialize};

/// A SQL value that can be bound as a parameter or read from a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Unsigned 8-bit integer
    U8(u8),
    /// 16-bit integer
    I16(i16),
    /// 32-bit integer
    I32(i32),
    /// 64-bit integer
    I64(i64),
    /// Double precision float
    F64(f64),
    /// Exact decimal value
    #[cfg(feature = "decimal-support")]
    Decimal(rust_decimal::Decimal),
    /// String value
    String(String),
    /// Bytes value
    Bytes(Vec<u8>),
}

/// Declared type of a parameter, used for output parameters that carry no value yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamType {
    Bool,
    U8,
    I16,
    I32,
    I64,
    F64,
    Decimal,
    String,
    Bytes,
}

impl ParamType {
    /// Get the SQL type name for this parameter type
    pub fn sql_name(&self) -> &'static str {
        match self {
            ParamType::Bool => "BIT",
            ParamType::U8 => "TINYINT",
            ParamType::I16 => "SMALLINT",
            ParamType::I32 => "INT",
            ParamType::I64 => "BIGINT",
            ParamType::F64 => "FLOAT",
            ParamType::Decimal => "DECIMAL",
            ParamType::String => "NVARCHAR",
            ParamType::Bytes => "VARBINARY",
        }
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the SQL type name for this value
    pub fn type_name(&self) -> &'static str {
        match self.param_type() {
            Some(ty) => ty.sql_name(),
            None => "NULL",
        }
    }

    /// The parameter type this value binds as, `None` for NULL
    pub fn param_type(&self) -> Option<ParamType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(ParamType::Bool),
            Value::U8(_) => Some(ParamType::U8),
            Value::I16(_) => Some(ParamType::I16),
            Value::I32(_) => Some(ParamType::I32),
            Value::I64(_) => Some(ParamType::I64),
            Value::F64(_) => Some(ParamType::F64),
            #[cfg(feature = "decimal-support")]
            Value::Decimal(_) => Some(ParamType::Decimal),
            Value::String(_) => Some(ParamType::String),
            Value::Bytes(_) => Some(ParamType::Bytes),
        }
    }

    /// Widen any integer variant to i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::U8(v) => Some(i64::from(*v)),
            Value::I16(v) => Some(i64::from(*v)),
            Value::I32(v) => Some(i64::from(*v)),
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Convert to a `serde_json::Value` for row deserialization
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::U8(i) => serde_json::Value::Number(serde_json::Number::from(*i)),
            Value::I16(i) => serde_json::Value::Number(serde_json::Number::from(*i)),
            Value::I32(i) => serde_json::Value::Number(serde_json::Number::from(*i)),
            Value::I64(i) => serde_json::Value::Number(serde_json::Number::from(*i)),
            Value::F64(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            #[cfg(feature = "decimal-support")]
            Value::Decimal(d) => serde_json::Value::String(d.to_string()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Bytes(b) => serde_json::Value::Array(
                b.iter()
                    .map(|byte| serde_json::Value::Number(serde_json::Number::from(*byte)))
                    .collect(),
            ),
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Value::Bool(val)
    }
}

impl From<u8> for Value {
    fn from(val: u8) -> Self {
        Value::U8(val)
    }
}

impl From<i16> for Value {
    fn from(val: i16) -> Self {
        Value::I16(val)
    }
}

impl From<i32> for Value {
    fn from(val: i32) -> Self {
        Value::I32(val)
    }
}

impl From<i64> for Value {
    fn from(val: i64) -> Self {
        Value::I64(val)
    }
}

// Single precision floats bind as doubles.
impl From<f32> for Value {
    fn from(val: f32) -> Self {
        Value::F64(f64::from(val))
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::F64(val)
    }
}

#[cfg(feature = "decimal-support")]
impl From<rust_decimal::Decimal> for Value {
    fn from(val: rust_decimal::Decimal) -> Self {
        Value::Decimal(val)
    }
}

impl From<String> for Value {
    fn from(val: String) -> Self {
        Value::String(val)
    }
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::String(val.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(val: Vec<u8>) -> Self {
        Value::Bytes(val)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}
