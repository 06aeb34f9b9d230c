//! Value model for proxied calls
//!
//! Every argument and return value crossing the dispatch point is carried as a
//! [`Value`]. Typed contract methods move in and out of this representation
//! through [`ContractValue`]; contract descriptors declare slots with
//! [`ValueType`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tagged union of values a contract operation can take or return
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// No value (unit return)
    Unit,

    /// Absent optional value
    Null,

    /// Boolean
    Bool(bool),

    /// Signed integer
    Int(i64),

    /// Unsigned integer
    #[serde(rename = "uint")]
    UInt(u64),

    /// Floating point number
    Float(f64),

    /// UTF-8 string
    Str(String),

    /// Raw bytes
    Bytes(Vec<u8>),

    /// Homogeneous list
    List(Vec<Value>),

    /// Structured JSON document
    Json(serde_json::Value),
}

impl Value {
    /// Short name of the variant, used in mismatch diagnostics
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Json(_) => "json",
        }
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Check for unit
    #[inline]
    #[must_use]
    pub fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }

    /// Render as a JSON document
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Self::Unit | Self::Null => Json::Null,
            Self::Bool(b) => Json::Bool(*b),
            Self::Int(i) => Json::from(*i),
            Self::UInt(u) => Json::from(*u),
            Self::Float(f) => Json::from(*f),
            Self::Str(s) => Json::String(s.clone()),
            Self::Bytes(b) => Json::Array(b.iter().map(|byte| Json::from(*byte)).collect()),
            Self::List(items) => Json::Array(items.iter().map(Self::to_json).collect()),
            Self::Json(j) => j.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => f.write_str("()"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Json(j) => write!(f, "{j}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Self::UInt(u)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

/// Declared type of a parameter or return slot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Unit return
    Unit,

    /// Boolean
    Bool,

    /// Signed integer
    Int,

    /// Unsigned integer
    #[serde(rename = "uint")]
    UInt,

    /// Floating point
    Float,

    /// String
    Str,

    /// Raw bytes
    Bytes,

    /// List of the inner type
    List(Box<ValueType>),

    /// Inner type or null
    Optional(Box<ValueType>),

    /// JSON document
    Json,

    /// Any value
    Any,
}

impl ValueType {
    /// Check whether a runtime value fits this type
    ///
    /// Integers are accepted across signedness when in range, and both
    /// integer kinds widen to `Float`.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Any, _)
            | (Self::Unit, Value::Unit)
            | (Self::Bool, Value::Bool(_))
            | (Self::Int, Value::Int(_))
            | (Self::UInt, Value::UInt(_))
            | (Self::Float, Value::Float(_) | Value::Int(_) | Value::UInt(_))
            | (Self::Str, Value::Str(_))
            | (Self::Bytes, Value::Bytes(_))
            | (Self::Json, Value::Json(_))
            | (Self::Optional(_), Value::Null) => true,
            (Self::Int, Value::UInt(u)) => i64::try_from(*u).is_ok(),
            (Self::UInt, Value::Int(i)) => *i >= 0,
            (Self::List(inner), Value::List(items)) => items.iter().all(|item| inner.accepts(item)),
            (Self::Optional(inner), other) => inner.accepts(other),
            _ => false,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => f.write_str("unit"),
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::UInt => f.write_str("uint"),
            Self::Float => f.write_str("float"),
            Self::Str => f.write_str("str"),
            Self::Bytes => f.write_str("bytes"),
            Self::List(inner) => write!(f, "list<{inner}>"),
            Self::Optional(inner) => write!(f, "optional<{inner}>"),
            Self::Json => f.write_str("json"),
            Self::Any => f.write_str("any"),
        }
    }
}

/// A value that does not fit the expected type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}, found {found}")]
pub struct ValueMismatch {
    /// Declared type
    pub expected: ValueType,

    /// Kind of the value actually supplied
    pub found: &'static str,
}

impl ValueMismatch {
    /// Create mismatch
    #[inline]
    #[must_use]
    pub fn new(expected: ValueType, found: &'static str) -> Self {
        Self { expected, found }
    }

    fn of<T: ContractValue>(value: &Value) -> Self {
        Self::new(T::value_type(), value.kind())
    }
}

/// Mapping between a Rust type and [`Value`]
///
/// Implemented for the owned types contract operations may declare as
/// parameters or returns.
pub trait ContractValue: Sized {
    /// Declared type used in contract descriptors
    fn value_type() -> ValueType;

    /// Convert into the dispatch representation
    fn into_value(self) -> Value;

    /// Convert back from the dispatch representation
    ///
    /// # Errors
    /// Returns [`ValueMismatch`] when the value does not fit `Self`.
    fn from_value(value: Value) -> Result<Self, ValueMismatch>;
}

impl ContractValue for () {
    fn value_type() -> ValueType {
        ValueType::Unit
    }

    fn into_value(self) -> Value {
        Value::Unit
    }

    /// A unit return discards whatever value the handler produced
    fn from_value(_value: Value) -> Result<Self, ValueMismatch> {
        Ok(())
    }
}

impl ContractValue for bool {
    fn value_type() -> ValueType {
        ValueType::Bool
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(ValueMismatch::of::<Self>(&other)),
        }
    }
}

macro_rules! signed_contract_value {
    ($($t:ty),*) => {
        $(
            impl ContractValue for $t {
                fn value_type() -> ValueType {
                    ValueType::Int
                }

                fn into_value(self) -> Value {
                    Value::Int(i64::from(self))
                }

                fn from_value(value: Value) -> Result<Self, ValueMismatch> {
                    let converted = match &value {
                        Value::Int(i) => <$t>::try_from(*i).ok(),
                        Value::UInt(u) => <$t>::try_from(*u).ok(),
                        _ => None,
                    };
                    converted.ok_or_else(|| ValueMismatch::of::<Self>(&value))
                }
            }
        )*
    };
}

macro_rules! unsigned_contract_value {
    ($($t:ty),*) => {
        $(
            impl ContractValue for $t {
                fn value_type() -> ValueType {
                    ValueType::UInt
                }

                fn into_value(self) -> Value {
                    Value::UInt(u64::from(self))
                }

                fn from_value(value: Value) -> Result<Self, ValueMismatch> {
                    let converted = match &value {
                        Value::UInt(u) => <$t>::try_from(*u).ok(),
                        Value::Int(i) => <$t>::try_from(*i).ok(),
                        _ => None,
                    };
                    converted.ok_or_else(|| ValueMismatch::of::<Self>(&value))
                }
            }
        )*
    };
}

signed_contract_value!(i8, i16, i32, i64);
unsigned_contract_value!(u8, u16, u32, u64);

impl ContractValue for isize {
    fn value_type() -> ValueType {
        ValueType::Int
    }

    #[allow(clippy::cast_possible_truncation)]
    fn into_value(self) -> Value {
        Value::Int(self as i64)
    }

    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        let converted = match &value {
            Value::Int(i) => isize::try_from(*i).ok(),
            Value::UInt(u) => isize::try_from(*u).ok(),
            _ => None,
        };
        converted.ok_or_else(|| ValueMismatch::of::<Self>(&value))
    }
}

impl ContractValue for usize {
    fn value_type() -> ValueType {
        ValueType::UInt
    }

    #[allow(clippy::cast_possible_truncation)]
    fn into_value(self) -> Value {
        Value::UInt(self as u64)
    }

    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        let converted = match &value {
            Value::UInt(u) => usize::try_from(*u).ok(),
            Value::Int(i) => usize::try_from(*i).ok(),
            _ => None,
        };
        converted.ok_or_else(|| ValueMismatch::of::<Self>(&value))
    }
}

impl ContractValue for f64 {
    fn value_type() -> ValueType {
        ValueType::Float
    }

    fn into_value(self) -> Value {
        Value::Float(self)
    }

    #[allow(clippy::cast_precision_loss)]
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Float(x) => Ok(x),
            Value::Int(i) => Ok(i as f64),
            Value::UInt(u) => Ok(u as f64),
            other => Err(ValueMismatch::of::<Self>(&other)),
        }
    }
}

impl ContractValue for f32 {
    fn value_type() -> ValueType {
        ValueType::Float
    }

    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }

    /// Finite values outside the `f32` range are rejected instead of
    /// saturating to infinity
    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        let wide = f64::from_value(value)?;
        let narrow = wide as f32;
        if wide.is_finite() && !narrow.is_finite() {
            return Err(ValueMismatch::new(ValueType::Float, "out-of-range float"));
        }
        Ok(narrow)
    }
}

impl ContractValue for String {
    fn value_type() -> ValueType {
        ValueType::Str
    }

    fn into_value(self) -> Value {
        Value::Str(self)
    }

    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(ValueMismatch::of::<Self>(&other)),
        }
    }
}

/// Byte payload
///
/// A plain `Vec<u8>` maps to a list of integers; this newtype maps to
/// [`Value::Bytes`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    /// Unwrap the payload
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl ContractValue for Bytes {
    fn value_type() -> ValueType {
        ValueType::Bytes
    }

    fn into_value(self) -> Value {
        Value::Bytes(self.0)
    }

    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Bytes(b) => Ok(Self(b)),
            other => Err(ValueMismatch::of::<Self>(&other)),
        }
    }
}

impl<T: ContractValue> ContractValue for Vec<T> {
    fn value_type() -> ValueType {
        ValueType::List(Box::new(T::value_type()))
    }

    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(ContractValue::into_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::List(items) => items
                .into_iter()
                .map(|item| {
                    let found = item.kind();
                    T::from_value(item).map_err(|_| ValueMismatch::new(Self::value_type(), found))
                })
                .collect(),
            other => Err(ValueMismatch::of::<Self>(&other)),
        }
    }
}

impl<T: ContractValue> ContractValue for Option<T> {
    fn value_type() -> ValueType {
        ValueType::Optional(Box::new(T::value_type()))
    }

    fn into_value(self) -> Value {
        self.map_or(Value::Null, ContractValue::into_value)
    }

    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl ContractValue for serde_json::Value {
    fn value_type() -> ValueType {
        ValueType::Json
    }

    fn into_value(self) -> Value {
        Value::Json(self)
    }

    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Json(j) => Ok(j),
            other => Err(ValueMismatch::of::<Self>(&other)),
        }
    }
}

impl ContractValue for Value {
    fn value_type() -> ValueType {
        ValueType::Any
    }

    fn into_value(self) -> Value {
        self
    }

    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        Ok(value)
    }
}
