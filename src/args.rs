//! Typed access to the untyped `arguments` object of a `tools/call` request.
//!
//! Every accessor checks the JSON type before use. A value of the wrong type
//! is treated exactly like an absent one; nothing is coerced.

use serde_json::{Map, Value};

use crate::error::ToolError;

#[derive(Debug, Clone, Default)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    /// Build from the `arguments` member of the call parameters. Anything
    /// other than a JSON object yields an empty bag.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Object(map)) => Self(map.clone()),
            _ => Self::default(),
        }
    }

    /// A string argument that must be present; `label` names it in the
    /// `"<label> required"` failure.
    pub fn required_str(&self, key: &str, label: &'static str) -> Result<String, ToolError> {
        self.optional_str(key).ok_or(ToolError::MissingParam(label))
    }

    pub fn str_or(&self, key: &str, default: &str) -> String {
        self.optional_str(key).unwrap_or_else(|| default.to_string())
    }

    pub fn optional_str(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(Value::as_str).map(String::from)
    }

    pub fn optional_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }
}
