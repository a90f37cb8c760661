//! Tool parameter schemas and argument validation.
//!
//! Each tool declares its parameters as a list of [`ParamSpec`]s. The same
//! declaration produces the JSON Schema advertised to clients and validates
//! incoming arguments before a handler runs.

use serde_json::{json, Map, Value};

use crate::models::ConfigValue;

/// Accepted JSON type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    /// Array of JSON objects
    ObjectArray,
    /// Either an object or a pre-serialized JSON string, see [`ConfigValue`]
    ObjectOrString,
    /// Record identifier: a non-empty string or an integer
    Identifier,
}

impl ParamKind {
    fn describe(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
            ParamKind::Object => "object",
            ParamKind::ObjectArray => "array of objects",
            ParamKind::ObjectOrString => "object or JSON string",
            ParamKind::Identifier => "non-empty string or integer",
        }
    }

    fn type_schema(&self) -> Value {
        match self {
            ParamKind::String => json!({"type": "string"}),
            ParamKind::Integer => json!({"type": "integer"}),
            ParamKind::Number => json!({"type": "number"}),
            ParamKind::Boolean => json!({"type": "boolean"}),
            ParamKind::Object => json!({"type": "object"}),
            ParamKind::ObjectArray => json!({"type": "array", "items": {"type": "object"}}),
            ParamKind::ObjectOrString => {
                json!({"anyOf": [{"type": "object"}, {"type": "string"}]})
            }
            ParamKind::Identifier => {
                json!({"anyOf": [{"type": "string", "minLength": 1}, {"type": "integer"}]})
            }
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamKind::String => value.is_string(),
            ParamKind::Integer => value.is_i64() || value.is_u64(),
            ParamKind::Number => value.is_number(),
            ParamKind::Boolean => value.is_boolean(),
            ParamKind::Object => value.is_object(),
            ParamKind::ObjectArray => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_object)),
            ParamKind::ObjectOrString => ConfigValue::from_value(value).is_some(),
            ParamKind::Identifier => match value {
                Value::String(s) => !s.is_empty(),
                _ => value.is_i64() || value.is_u64(),
            },
        }
    }
}

/// One declared tool parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub default: Option<Value>,
    pub description: &'static str,
}

impl ParamSpec {
    pub fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
            description,
        }
    }

    pub fn optional(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: None,
            description,
        }
    }

    /// Value used when the caller omits this parameter
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Argument validation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Arguments must be a JSON object")]
    NotAnObject,

    #[error("Missing required parameter '{0}'")]
    Missing(String),

    #[error("Parameter '{name}' must be of type {expected}")]
    WrongType {
        name: String,
        expected: &'static str,
    },
}

/// Parameter schema of one tool
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolSchema {
    params: Vec<ParamSpec>,
}

impl ToolSchema {
    pub fn new(params: Vec<ParamSpec>) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// JSON Schema advertised in the tool listing
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.params {
            let mut prop = param.kind.type_schema();
            if let Value::Object(ref mut obj) = prop {
                obj.insert("description".into(), Value::from(param.description));
                if let Some(ref default) = param.default {
                    obj.insert("default".into(), default.clone());
                }
            }
            properties.insert(param.name.to_string(), prop);
        }

        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Check arguments against the schema and fill in defaults
    ///
    /// Supplied arguments keep their order, defaults for omitted parameters
    /// are appended after them, and undeclared keys are dropped. A `null`
    /// value counts as omitted.
    pub fn validate(&self, args: Value) -> Result<Map<String, Value>, ValidationError> {
        let supplied = match args {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => return Err(ValidationError::NotAnObject),
        };

        let mut validated = Map::new();
        for (key, value) in supplied {
            let Some(param) = self.param(&key) else {
                tracing::debug!(param = %key, "Dropping undeclared parameter");
                continue;
            };
            if value.is_null() {
                continue;
            }
            if !param.kind.accepts(&value) {
                return Err(ValidationError::WrongType {
                    name: key,
                    expected: param.kind.describe(),
                });
            }
            validated.insert(key, value);
        }

        for param in &self.params {
            if validated.contains_key(param.name) {
                continue;
            }
            match (&param.default, param.required) {
                (Some(default), _) => {
                    validated.insert(param.name.to_string(), default.clone());
                }
                (None, true) => return Err(ValidationError::Missing(param.name.to_string())),
                (None, false) => {}
            }
        }

        Ok(validated)
    }
}
