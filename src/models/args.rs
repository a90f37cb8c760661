//! Argument value types with more than one accepted representation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A free-form configuration value: either a JSON object or a string the
/// caller has already serialized
///
/// Whichever form arrives is forwarded as-is. A string is never parsed and an
/// object is never stringified, since the upstream treats them differently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Structured(Map<String, Value>),
    Raw(String),
}

impl ConfigValue {
    /// Accept a JSON value if it is one of the two allowed forms
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(ConfigValue::Structured(map.clone())),
            Value::String(s) => Some(ConfigValue::Raw(s.clone())),
            _ => None,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            ConfigValue::Structured(map) => Value::Object(map),
            ConfigValue::Raw(s) => Value::String(s),
        }
    }
}
