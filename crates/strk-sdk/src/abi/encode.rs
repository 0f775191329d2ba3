//! Calldata encoding
//!
//! Values are flattened depth-first into a single sequence of field
//! elements. Arrays are prefixed with their length; tuples and structs are
//! not. Struct members are always emitted in declaration order, so the
//! output never depends on the order of keys in the input.

use std::fmt;

use strk_primitives::{felt_from_bigint, BigInt, Felt, FeltError};

use super::types::{CalldataValue, Parameter, TypeDescriptor};
use crate::error::EncodeError;

/// Location inside the argument tree, rendered only when an error is built
#[derive(Clone, Copy)]
enum Path<'a> {
    Root,
    Field(&'a Path<'a>, &'a str),
    Index(&'a Path<'a>, usize),
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Path::Root => write!(f, "$"),
            Path::Field(parent, name) => write!(f, "{}.{}", parent, name),
            Path::Index(parent, i) => write!(f, "{}[{}]", parent, i),
        }
    }
}

fn mismatch(path: &Path<'_>, expected: impl Into<String>, actual: impl Into<String>) -> EncodeError {
    EncodeError::TypeMismatch {
        path: path.to_string(),
        expected: expected.into(),
        actual: actual.into(),
    }
}

/// Encode `value` as the ABI type `ty`
pub fn encode(ty: &TypeDescriptor, value: &CalldataValue) -> Result<Vec<Felt>, EncodeError> {
    let mut out = Vec::new();
    encode_typed(ty, value, &Path::Root, &mut out)?;
    Ok(out)
}

/// Encode `value` positionally, without a schema.
///
/// Scalars pass through, sequences are length-prefixed, and keyed values are
/// flattened in their insertion order.
pub fn encode_untyped(value: &CalldataValue) -> Result<Vec<Felt>, EncodeError> {
    let mut out = Vec::new();
    encode_positional(value, &Path::Root, &mut out)?;
    Ok(out)
}

/// Encode with a type when one is known, positionally otherwise
pub fn encode_calldata(
    ty: Option<&TypeDescriptor>,
    value: &CalldataValue,
) -> Result<Vec<Felt>, EncodeError> {
    match ty {
        Some(ty) => encode(ty, value),
        None => encode_untyped(value),
    }
}

/// Encode the full argument list of an entry point.
///
/// A `Sequence` supplies arguments by position, a `Keyed` value by name.
pub fn encode_arguments(
    params: &[Parameter],
    args: &CalldataValue,
) -> Result<Vec<Felt>, EncodeError> {
    let root = Path::Root;
    let mut out = Vec::new();

    match args {
        CalldataValue::Sequence(values) => {
            if values.len() != params.len() {
                return Err(EncodeError::ArityMismatch {
                    path: root.to_string(),
                    expected: params.len(),
                    actual: values.len(),
                });
            }
            for (param, value) in params.iter().zip(values) {
                encode_typed(&param.ty, value, &Path::Field(&root, &param.name), &mut out)?;
            }
        }
        CalldataValue::Keyed(values) => {
            for param in params {
                let value = values.get(&param.name).ok_or_else(|| EncodeError::MissingField {
                    path: root.to_string(),
                    field: param.name.clone(),
                })?;
                encode_typed(&param.ty, value, &Path::Field(&root, &param.name), &mut out)?;
            }
        }
        CalldataValue::Scalar(_) => {
            return Err(mismatch(&root, "argument list", args.kind()));
        }
    }

    Ok(out)
}

fn scalar_to_felt(value: &BigInt, path: &Path<'_>) -> Result<Felt, EncodeError> {
    felt_from_bigint(value).map_err(|e| {
        let actual = match e {
            FeltError::Negative(v) => format!("negative value {}", v),
            FeltError::OutOfRange(v) => format!("out-of-range value {}", v),
            other => other.to_string(),
        };
        mismatch(path, "felt", actual)
    })
}

fn length_prefix(len: usize) -> Felt {
    Felt::from(len as u64)
}

fn encode_typed(
    ty: &TypeDescriptor,
    value: &CalldataValue,
    path: &Path<'_>,
    out: &mut Vec<Felt>,
) -> Result<(), EncodeError> {
    match (ty, value) {
        (TypeDescriptor::Scalar, CalldataValue::Scalar(v)) => {
            out.push(scalar_to_felt(v, path)?);
        }
        (TypeDescriptor::Tuple { elements }, CalldataValue::Sequence(values)) => {
            if elements.len() != values.len() {
                return Err(EncodeError::ArityMismatch {
                    path: path.to_string(),
                    expected: elements.len(),
                    actual: values.len(),
                });
            }
            for (i, (element, value)) in elements.iter().zip(values).enumerate() {
                encode_typed(element, value, &Path::Index(path, i), out)?;
            }
        }
        (TypeDescriptor::Array { element }, CalldataValue::Sequence(values)) => {
            out.push(length_prefix(values.len()));
            for (i, value) in values.iter().enumerate() {
                encode_typed(element, value, &Path::Index(path, i), out)?;
            }
        }
        (TypeDescriptor::NamedStruct { members, .. }, CalldataValue::Keyed(values)) => {
            // Undeclared keys are never looked up, so they cannot reach the output
            for (member, member_ty) in members {
                let value = values.get(member).ok_or_else(|| EncodeError::MissingField {
                    path: path.to_string(),
                    field: member.clone(),
                })?;
                encode_typed(member_ty, value, &Path::Field(path, member), out)?;
            }
        }
        (ty, value) => return Err(mismatch(path, ty.kind(), value.kind())),
    }
    Ok(())
}

fn encode_positional(
    value: &CalldataValue,
    path: &Path<'_>,
    out: &mut Vec<Felt>,
) -> Result<(), EncodeError> {
    match value {
        CalldataValue::Scalar(v) => out.push(scalar_to_felt(v, path)?),
        CalldataValue::Sequence(values) => {
            out.push(length_prefix(values.len()));
            for (i, value) in values.iter().enumerate() {
                encode_positional(value, &Path::Index(path, i), out)?;
            }
        }
        CalldataValue::Keyed(values) => {
            for (key, value) in values {
                encode_positional(value, &Path::Field(path, key), out)?;
            }
        }
    }
    Ok(())
}
