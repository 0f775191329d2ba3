//! Output formatting

use serde_json::{Map, Value};
use strk_primitives::{felt_to_hex, Felt};

/// Output builder for formatted CLI output
pub struct Output {
    json_mode: bool,
    fields: Map<String, Value>,
    message: Option<String>,
}

impl Output {
    /// Create a new output builder
    pub fn new(json_mode: bool) -> Self {
        Self {
            json_mode,
            fields: Map::new(),
            message: None,
        }
    }

    /// Add a string field to the output
    pub fn field(mut self, key: &str, value: &str) -> Self {
        self.fields.insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Add a u64 field to the output
    pub fn field_u64(mut self, key: &str, value: u64) -> Self {
        self.fields.insert(key.to_string(), Value::Number(value.into()));
        self
    }

    /// Add a field element, rendered as hex
    pub fn field_felt(self, key: &str, value: &Felt) -> Self {
        self.field(key, &felt_to_hex(value))
    }

    /// Add a list of field elements, rendered as hex
    pub fn field_felts(mut self, key: &str, values: &[Felt]) -> Self {
        let list = values
            .iter()
            .map(|v| Value::String(felt_to_hex(v)))
            .collect();
        self.fields.insert(key.to_string(), Value::Array(list));
        self
    }

    /// Add a JSON value field to the output
    pub fn field_value(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Set the human-readable message
    pub fn message(mut self, msg: &str) -> Self {
        self.message = Some(msg.to_string());
        self
    }

    /// Print the output
    pub fn print(self) {
        if self.json_mode {
            let json = Value::Object(self.fields);
            println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        } else if let Some(msg) = self.message {
            println!("{}", msg);
        }
    }
}

/// Space-separated hex rendering of a calldata list
pub fn felts_line(values: &[Felt]) -> String {
    values.iter().map(felt_to_hex).collect::<Vec<_>>().join(" ")
}
