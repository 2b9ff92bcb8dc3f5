//! Backend record model
//!
//! Patients, professionals, anamneses and catalog items all arrive as JSON
//! objects whose exact shape belongs to the backend. `Record` wraps one such
//! object and offers string-coercing field access.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON object returned by the clinic backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Identifier from `id` or `_id`, numeric or string.
    pub fn id(&self) -> Option<String> {
        self.field("id").or_else(|| self.field("_id"))
    }

    /// Field rendered as text.
    ///
    /// `name` may be a dotted path into nested objects (`paciente.nome`).
    /// Strings, numbers and booleans are returned; null, arrays, objects and
    /// missing fields yield `None`.
    pub fn field(&self, name: &str) -> Option<String> {
        let value = name
            .split('.')
            .try_fold(&self.0, |current, segment| current.get(segment))?;

        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Active flag from `ativo` (bool) or `status` ("ativo" / "inativo").
    pub fn is_active(&self) -> Option<bool> {
        match self.0.get("ativo") {
            Some(Value::Bool(active)) => return Some(*active),
            Some(Value::Number(n)) => return n.as_i64().map(|v| v != 0),
            _ => {}
        }

        match self.0.get("status").and_then(Value::as_str) {
            Some(status) => match status.trim().to_lowercase().as_str() {
                "ativo" | "active" => Some(true),
                "inativo" | "inactive" => Some(false),
                _ => None,
            },
            None => None,
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
