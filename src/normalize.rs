// Response normalizer: turns a decoded body into the shape the caller
// asked for, or into a `RemoteOperationError` when Apollo reports a
// failure inside an otherwise successful HTTP reply.

use crate::api::Payload;
use crate::endpoint::Shape;
use crate::error::{RemoteOperationError, TransportError};
use crate::Result;
use serde_json::{Map, Value};
use tracing::warn;

/// Outcome of a call as reported by the service itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Success(Payload),
    Failure { message: String },
}

/// Normalized result handed back to resource operations and the CLI.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Dict(Map<String, Value>),
    List(Vec<Value>),
    None,
    Lines(Vec<String>),
}

impl Output {
    pub fn into_list(self) -> Vec<Value> {
        match self {
            Output::Dict(map) => vec![Value::Object(map)],
            Output::List(items) => items,
            Output::None => Vec::new(),
            Output::Lines(lines) => lines.into_iter().map(Value::String).collect(),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Output::Dict(map) => Value::Object(map),
            Output::List(items) => Value::Array(items),
            Output::None => Value::Null,
            Output::Lines(lines) => Value::String(lines.join("\n")),
        }
    }
}

/// List entry predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Keep entries whose `field` renders as exactly `value`.
    FieldEquals { field: String, value: String },
}

impl Filter {
    pub fn field_equals(field: &str, value: &str) -> Self {
        Filter::FieldEquals {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn matches(&self, entry: &Value) -> bool {
        match self {
            Filter::FieldEquals { field, value } => match entry.get(field) {
                Some(Value::String(s)) => s == value,
                Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string() == *value,
                _ => false,
            },
        }
    }
}

/// Message of a service-reported failure, if `value` carries one.
fn error_message(value: &Value) -> Option<String> {
    match value.as_object()?.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        other => Some(other.to_string()),
    }
}

/// Split a payload into success or service-reported failure.
pub fn classify(payload: Payload) -> Reply {
    let message = match &payload {
        Payload::Json(value) => error_message(value),
        Payload::Text(text) if text.trim_start().starts_with('{') => serde_json::from_str(text)
            .ok()
            .and_then(|v: Value| error_message(&v)),
        _ => None,
    };
    match message {
        Some(message) => Reply::Failure { message },
        None => Reply::Success(payload),
    }
}

/// Coerce `payload` into `shape`. `filter` only applies to `Shape::List`.
pub fn normalize(
    endpoint: &str,
    payload: Payload,
    shape: Shape,
    filter: Option<&Filter>,
) -> Result<Output> {
    if shape == Shape::None {
        return Ok(Output::None);
    }
    let payload = match classify(payload) {
        Reply::Success(payload) => payload,
        Reply::Failure { message } => {
            warn!(endpoint, %message, "apollo reported an error");
            return Err(RemoteOperationError::new(endpoint, message).into());
        }
    };

    match shape {
        Shape::Dict => match json_of(endpoint, payload)? {
            None => Ok(Output::Dict(Map::new())),
            Some(Value::Object(mut map)) => {
                map.remove("username");
                map.remove("password");
                Ok(Output::Dict(map))
            }
            Some(other) => Err(wrong_shape(endpoint, "an object", &other)),
        },
        Shape::List => {
            let items = match json_of(endpoint, payload)? {
                None => Vec::new(),
                Some(Value::Array(items)) => items,
                Some(obj @ Value::Object(_)) => vec![obj],
                Some(other) => return Err(wrong_shape(endpoint, "an array", &other)),
            };
            Ok(Output::List(match filter {
                Some(filter) => items.into_iter().filter(|v| filter.matches(v)).collect(),
                None => items,
            }))
        }
        Shape::Lines => Ok(Output::Lines(lines_of(payload))),
        Shape::None => Ok(Output::None),
    }
}

fn json_of(endpoint: &str, payload: Payload) -> Result<Option<Value>> {
    match payload {
        Payload::Empty => Ok(None),
        Payload::Json(value) => Ok(Some(value)),
        Payload::Text(text) => serde_json::from_str(&text).map(Some).map_err(|e| {
            TransportError::MalformedBody(format!("{endpoint}: expected JSON, {e}")).into()
        }),
        Payload::Bytes(bytes) => Err(TransportError::MalformedBody(format!(
            "{endpoint}: expected JSON, got {} bytes of binary data",
            bytes.len()
        ))
        .into()),
    }
}

fn lines_of(payload: Payload) -> Vec<String> {
    let text = match payload {
        Payload::Empty => return Vec::new(),
        Payload::Text(text) => text,
        Payload::Bytes(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Payload::Json(Value::String(s)) => s,
        Payload::Json(other) => {
            serde_json::to_string_pretty(&other).unwrap_or_else(|_| other.to_string())
        }
    };
    text.lines().map(str::to_string).collect()
}

fn wrong_shape(endpoint: &str, expected: &str, got: &Value) -> crate::Error {
    let kind = match got {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    TransportError::MalformedBody(format!("{endpoint}: expected {expected}, got {kind}")).into()
}
