//! ABI schema loading and type resolution

use std::collections::HashMap;

use serde::Deserialize;

use super::types::{Parameter, TypeDescriptor};
use crate::error::SchemaError;

/// Name under which the constructor is declared
pub const CONSTRUCTOR_NAME: &str = "constructor";

/// One entry of a compiled contract's JSON ABI
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AbiEntry {
    /// External or view function
    Function(FunctionAbiEntry),
    /// Constructor
    Constructor(FunctionAbiEntry),
    /// L1 message handler
    L1Handler(FunctionAbiEntry),
    /// Struct layout
    Struct(StructAbiEntry),
    /// Event declaration (not used for calldata)
    Event(EventAbiEntry),
}

/// Function-like ABI entry
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionAbiEntry {
    /// Entry-point name
    pub name: String,
    /// Declared inputs in order
    #[serde(default)]
    pub inputs: Vec<TypedParameter>,
    /// Declared outputs in order
    #[serde(default)]
    pub outputs: Vec<TypedParameter>,
}

/// Struct ABI entry
#[derive(Debug, Clone, Deserialize)]
pub struct StructAbiEntry {
    /// Struct name
    pub name: String,
    /// Size in field elements, as reported by the compiler
    #[serde(default)]
    pub size: usize,
    /// Members
    #[serde(default)]
    pub members: Vec<StructMember>,
}

/// Struct member
#[derive(Debug, Clone, Deserialize)]
pub struct StructMember {
    /// Member name
    pub name: String,
    /// Type string
    #[serde(rename = "type")]
    pub ty: String,
    /// Offset in field elements; determines member order
    #[serde(default)]
    pub offset: Option<usize>,
}

/// Event ABI entry
#[derive(Debug, Clone, Deserialize)]
pub struct EventAbiEntry {
    /// Event name
    pub name: String,
    /// Indexed values
    #[serde(default)]
    pub keys: Vec<TypedParameter>,
    /// Payload values
    #[serde(default)]
    pub data: Vec<TypedParameter>,
}

/// `{name, type}` pair
#[derive(Debug, Clone, Deserialize)]
pub struct TypedParameter {
    /// Parameter name
    pub name: String,
    /// Type string
    #[serde(rename = "type")]
    pub ty: String,
}

/// Parsed but unresolved type; struct references are still names
#[derive(Debug, Clone, PartialEq, Eq)]
enum AbiType {
    Felt,
    Pointer(Box<AbiType>),
    Tuple(Vec<AbiType>),
    Named(String),
}

/// Immutable contract interface: entry points and struct layouts
#[derive(Debug, Clone, Default)]
pub struct AbiSchema {
    entry_points: HashMap<String, Vec<(String, AbiType)>>,
    structs: HashMap<String, Vec<(String, AbiType)>>,
}

impl AbiSchema {
    /// Load from the JSON ABI document a compiler emits
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let entries: Vec<AbiEntry> =
            serde_json::from_str(json).map_err(|e| SchemaError::Malformed(e.to_string()))?;
        Self::from_entries(entries)
    }

    /// Load from an already-deserialized JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self, SchemaError> {
        let entries: Vec<AbiEntry> =
            serde_json::from_value(value).map_err(|e| SchemaError::Malformed(e.to_string()))?;
        Self::from_entries(entries)
    }

    /// Build from ABI entries
    pub fn from_entries(entries: Vec<AbiEntry>) -> Result<Self, SchemaError> {
        let mut schema = AbiSchema::default();

        for entry in entries {
            match entry {
                AbiEntry::Function(f) | AbiEntry::L1Handler(f) => {
                    schema.insert_entry_point(f.name, &f.inputs)?;
                }
                AbiEntry::Constructor(f) => {
                    schema.insert_entry_point(CONSTRUCTOR_NAME.to_string(), &f.inputs)?;
                }
                AbiEntry::Struct(s) => {
                    if schema.structs.contains_key(&s.name) {
                        return Err(SchemaError::Duplicate(s.name));
                    }
                    let mut members = s.members;
                    // Stable sort: members without offsets keep listing order
                    members.sort_by_key(|m| m.offset.unwrap_or(usize::MAX));
                    let members = members
                        .into_iter()
                        .map(|m| Ok((m.name, parse_type(&m.ty)?)))
                        .collect::<Result<Vec<_>, SchemaError>>()?;
                    schema.structs.insert(s.name, members);
                }
                AbiEntry::Event(_) => {}
            }
        }

        Ok(schema)
    }

    fn insert_entry_point(
        &mut self,
        name: String,
        inputs: &[TypedParameter],
    ) -> Result<(), SchemaError> {
        if self.entry_points.contains_key(&name) {
            return Err(SchemaError::Duplicate(name));
        }
        let parsed = inputs
            .iter()
            .map(|p| Ok((p.name.clone(), parse_type(&p.ty)?)))
            .collect::<Result<Vec<_>, SchemaError>>()?;
        self.entry_points.insert(name, collapse_array_lengths(parsed));
        Ok(())
    }

    /// Names of all declared entry points, sorted
    pub fn entry_points(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entry_points.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Ordered, fully resolved parameters of an entry point
    pub fn parameters_for(&self, entry_point: &str) -> Result<Vec<Parameter>, SchemaError> {
        let params = self
            .entry_points
            .get(entry_point)
            .ok_or_else(|| SchemaError::UnknownEntryPoint(entry_point.to_string()))?;

        params
            .iter()
            .map(|(name, ty)| Ok(Parameter::new(name.clone(), self.resolve(ty, &mut Vec::new())?)))
            .collect()
    }

    /// Constructor parameters, if the ABI declares a constructor
    pub fn constructor(&self) -> Result<Option<Vec<Parameter>>, SchemaError> {
        if !self.entry_points.contains_key(CONSTRUCTOR_NAME) {
            return Ok(None);
        }
        self.parameters_for(CONSTRUCTOR_NAME).map(Some)
    }

    /// Whether the constructor takes at least one argument
    pub fn has_constructor_arguments(&self) -> bool {
        self.entry_points
            .get(CONSTRUCTOR_NAME)
            .map(|params| !params.is_empty())
            .unwrap_or(false)
    }

    /// Resolve a struct and every struct it references
    pub fn resolve_struct(&self, name: &str) -> Result<TypeDescriptor, SchemaError> {
        self.resolve(&AbiType::Named(name.to_string()), &mut Vec::new())
    }

    /// Parse and resolve a type string against this schema's struct table
    pub fn resolve_type(&self, ty: &str) -> Result<TypeDescriptor, SchemaError> {
        self.resolve(&parse_type(ty)?, &mut Vec::new())
    }

    fn resolve(&self, ty: &AbiType, stack: &mut Vec<String>) -> Result<TypeDescriptor, SchemaError> {
        match ty {
            AbiType::Felt => Ok(TypeDescriptor::Scalar),
            AbiType::Pointer(inner) => Ok(TypeDescriptor::array(self.resolve(inner, stack)?)),
            AbiType::Tuple(items) => Ok(TypeDescriptor::tuple(
                items
                    .iter()
                    .map(|item| self.resolve(item, stack))
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            AbiType::Named(name) => {
                if stack.iter().any(|s| s == name) {
                    let mut cycle = stack.clone();
                    cycle.push(name.clone());
                    return Err(SchemaError::CyclicStruct(cycle));
                }
                let members = self
                    .structs
                    .get(name)
                    .ok_or_else(|| SchemaError::UnknownStruct(name.clone()))?;

                stack.push(name.clone());
                let resolved = members
                    .iter()
                    .map(|(member, ty)| Ok((member.clone(), self.resolve(ty, stack)?)))
                    .collect::<Result<Vec<_>, SchemaError>>();
                stack.pop();

                Ok(TypeDescriptor::NamedStruct {
                    name: name.clone(),
                    members: resolved?,
                })
            }
        }
    }
}

/// Fold `x_len: felt` followed by `x: T*` into a single array parameter
fn collapse_array_lengths(params: Vec<(String, AbiType)>) -> Vec<(String, AbiType)> {
    let mut out: Vec<(String, AbiType)> = Vec::with_capacity(params.len());
    for (name, ty) in params {
        if matches!(ty, AbiType::Pointer(_)) {
            let len_name = format!("{}_len", name);
            if matches!(out.last(), Some((prev, AbiType::Felt)) if *prev == len_name) {
                out.pop();
            }
        }
        out.push((name, ty));
    }
    out
}

fn invalid(ty: &str, reason: &str) -> SchemaError {
    SchemaError::InvalidType {
        ty: ty.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse a type string: `felt`, `T*`, `(T, U)`, `(a: T, b: U)` or a struct name
fn parse_type(s: &str) -> Result<AbiType, SchemaError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(invalid(s, "empty type"));
    }

    if let Some(inner) = s.strip_suffix('*') {
        return Ok(AbiType::Pointer(Box::new(parse_type(inner)?)));
    }

    if s.starts_with('(') {
        let inner = s
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| invalid(s, "unbalanced parentheses"))?;
        if inner.trim().is_empty() {
            return Ok(AbiType::Tuple(Vec::new()));
        }
        let items = split_top_level(inner).ok_or_else(|| invalid(s, "unbalanced parentheses"))?;
        return items
            .into_iter()
            .map(|item| parse_type(strip_member_name(item)))
            .collect::<Result<Vec<_>, _>>()
            .map(AbiType::Tuple);
    }

    match s {
        "felt" | "felt252" | "core::felt252" => Ok(AbiType::Felt),
        _ if s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == ':') =>
        {
            Ok(AbiType::Named(s.to_string()))
        }
        _ => Err(invalid(s, "unexpected character")),
    }
}

/// Split on commas that are not nested inside parentheses
fn split_top_level(s: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    parts.push(&s[start..]);
    Some(parts)
}

/// `a : felt` -> `felt`; path separators (`::`) are left alone
fn strip_member_name(item: &str) -> &str {
    let bytes = item.as_bytes();
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b':' if depth == 0 => {
                let prev_colon = i > 0 && bytes[i - 1] == b':';
                let next_colon = bytes.get(i + 1) == Some(&b':');
                if !prev_colon && !next_colon {
                    return &item[i + 1..];
                }
            }
            _ => {}
        }
    }
    item
}
