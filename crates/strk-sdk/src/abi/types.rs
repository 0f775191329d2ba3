//! ABI type definitions

use indexmap::IndexMap;
use serde_json::Value;
use strk_primitives::{BigInt, BigUint, Felt};

use crate::error::EncodeError;

/// Resolved shape of an ABI type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// Single field element
    Scalar,
    /// Struct with members in declaration order
    NamedStruct {
        /// Struct name
        name: String,
        /// Members in the order they are laid out
        members: Vec<(String, TypeDescriptor)>,
    },
    /// Variable-length array, encoded with a length prefix
    Array {
        /// Element type
        element: Box<TypeDescriptor>,
    },
    /// Fixed-length tuple
    Tuple {
        /// Element types in order
        elements: Vec<TypeDescriptor>,
    },
}

impl TypeDescriptor {
    /// Array of `element`
    pub fn array(element: TypeDescriptor) -> Self {
        TypeDescriptor::Array {
            element: Box::new(element),
        }
    }

    /// Tuple of `elements`
    pub fn tuple(elements: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::Tuple { elements }
    }

    /// Struct named `name` with `members`
    pub fn named_struct(name: impl Into<String>, members: Vec<(&str, TypeDescriptor)>) -> Self {
        TypeDescriptor::NamedStruct {
            name: name.into(),
            members: members
                .into_iter()
                .map(|(n, t)| (n.to_string(), t))
                .collect(),
        }
    }

    /// Short human-readable shape name, used in error messages
    pub fn kind(&self) -> String {
        match self {
            TypeDescriptor::Scalar => "felt".to_string(),
            TypeDescriptor::NamedStruct { name, .. } => format!("struct {}", name),
            TypeDescriptor::Array { .. } => "array".to_string(),
            TypeDescriptor::Tuple { elements } => format!("tuple of {}", elements.len()),
        }
    }
}

/// Entry-point parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Resolved type
    pub ty: TypeDescriptor,
}

impl Parameter {
    /// Create a new parameter
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Caller-supplied argument value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalldataValue {
    /// Integer; must fit in a field element when encoded
    Scalar(BigInt),
    /// Ordered values, matched positionally against tuples and arrays
    Sequence(Vec<CalldataValue>),
    /// Named values, matched against struct members by name
    Keyed(IndexMap<String, CalldataValue>),
}

impl CalldataValue {
    /// Build a keyed value from `(name, value)` pairs, preserving their order
    pub fn keyed<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, CalldataValue)>,
    {
        CalldataValue::Keyed(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a sequence value
    pub fn sequence<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CalldataValue>,
    {
        CalldataValue::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Short shape name, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            CalldataValue::Scalar(_) => "scalar",
            CalldataValue::Sequence(_) => "sequence",
            CalldataValue::Keyed(_) => "keyed value",
        }
    }

    /// Convert a JSON value, tracking `path` for error messages
    fn from_json(value: &Value, path: &str) -> Result<Self, EncodeError> {
        let mismatch = |actual: String| EncodeError::TypeMismatch {
            path: path.to_string(),
            expected: "integer, integer string, array or object".to_string(),
            actual,
        };

        match value {
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    Ok(CalldataValue::Scalar(BigInt::from(v)))
                } else if let Some(v) = n.as_i64() {
                    Ok(CalldataValue::Scalar(BigInt::from(v)))
                } else {
                    Err(mismatch(format!("non-integer number {}", n)))
                }
            }
            Value::String(s) => parse_integer_string(s)
                .map(CalldataValue::Scalar)
                .ok_or_else(|| mismatch(format!("string {:?}", s))),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| Self::from_json(item, &format!("{}[{}]", path, i)))
                .collect::<Result<Vec<_>, _>>()
                .map(CalldataValue::Sequence),
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| {
                    Self::from_json(v, &format!("{}.{}", path, k)).map(|v| (k.clone(), v))
                })
                .collect::<Result<IndexMap<_, _>, _>>()
                .map(CalldataValue::Keyed),
            Value::Bool(b) => Err(mismatch(format!("boolean {}", b))),
            Value::Null => Err(mismatch("null".to_string())),
        }
    }
}

/// Parse `0x`-prefixed hex or (possibly negative) decimal
fn parse_integer_string(s: &str) -> Option<BigInt> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        BigUint::parse_bytes(hex.as_bytes(), 16).map(BigInt::from)
    } else {
        BigInt::parse_bytes(s.as_bytes(), 10)
    }
}

impl TryFrom<&Value> for CalldataValue {
    type Error = EncodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        CalldataValue::from_json(value, "$")
    }
}

impl From<Felt> for CalldataValue {
    fn from(value: Felt) -> Self {
        CalldataValue::Scalar(BigInt::from(value.to_biguint()))
    }
}

impl From<BigInt> for CalldataValue {
    fn from(value: BigInt) -> Self {
        CalldataValue::Scalar(value)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for CalldataValue {
                fn from(value: $t) -> Self {
                    CalldataValue::Scalar(BigInt::from(value))
                }
            }
        )*
    };
}

impl_from_int!(u8, u16, u32, u64, u128, i32, i64, i128);

impl<V: Into<CalldataValue>> From<Vec<V>> for CalldataValue {
    fn from(items: Vec<V>) -> Self {
        CalldataValue::sequence(items)
    }
}
