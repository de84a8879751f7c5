#![allow(dead_code)]

//! Structured-output coercion: raw model text → schema record.
//!
//! The outcome is never assumed to succeed. Callers branch on `Coercion`:
//! a full record, a record with required fields the model left out, or the
//! raw text with the reason it could not be read.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::schemas::{FieldKind, Nullability, Schema};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Coercion<T> {
    Complete { record: T },
    /// Required fields named in `missing` were absent or unusable and hold
    /// empty values in `record`.
    Partial { record: T, missing: Vec<String> },
    Failed { raw: String, reason: String },
}

impl<T> Coercion<T> {
    pub fn record(&self) -> Option<&T> {
        match self {
            Coercion::Complete { record } | Coercion::Partial { record, .. } => Some(record),
            Coercion::Failed { .. } => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Coercion::Complete { .. })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Coercion<U> {
        match self {
            Coercion::Complete { record } => Coercion::Complete { record: f(record) },
            Coercion::Partial { record, missing } => Coercion::Partial {
                record: f(record),
                missing,
            },
            Coercion::Failed { raw, reason } => Coercion::Failed { raw, reason },
        }
    }
}

/// Reads `raw` as a `S` record, coercing field values to their declared kinds.
pub fn coerce<S: Schema>(raw: &str) -> Coercion<S> {
    let failed = |reason: String| Coercion::Failed {
        raw: raw.to_string(),
        reason,
    };

    let mut object = match parse_reply(raw) {
        Ok(Value::Object(object)) => object,
        Ok(other) => return failed(format!("expected a JSON object, got {}", kind_name(&other))),
        Err(e) => return failed(format!("invalid JSON: {e}")),
    };

    let mut record = Map::new();
    let mut missing = Vec::new();

    for field in S::FIELDS {
        let value = take_field(&mut object, field.name).and_then(|v| coerce_value(field.kind, v));
        let value = match (value, field.nullability) {
            (Some(value), _) => value,
            (None, Nullability::Nullable) => Value::Null,
            (None, Nullability::Required) => {
                missing.push(field.name.to_string());
                empty_value(field.kind)
            }
        };
        record.insert(field.name.to_string(), value);
    }

    match serde_json::from_value::<S>(Value::Object(record)) {
        Ok(record) if missing.is_empty() => Coercion::Complete { record },
        Ok(record) => Coercion::Partial { record, missing },
        Err(e) => failed(format!("record does not match {}: {e}", S::TITLE)),
    }
}

/// Exact key first, then a case-insensitive match.
fn take_field(object: &mut Map<String, Value>, name: &str) -> Option<Value> {
    if let Some(value) = object.remove(name) {
        return Some(value);
    }
    let key = object
        .keys()
        .find(|k| k.eq_ignore_ascii_case(name))
        .cloned()?;
    object.remove(&key)
}

fn coerce_value(kind: FieldKind, value: Value) -> Option<Value> {
    match kind {
        FieldKind::Text => match value {
            Value::Array(items) => {
                let lines: Vec<String> = items.into_iter().filter_map(scalar_to_string).collect();
                Some(Value::String(lines.join("\n")))
            }
            other => scalar_to_string(other).map(Value::String),
        },
        FieldKind::TextList => match value {
            Value::Array(items) => Some(Value::Array(
                items
                    .into_iter()
                    .filter_map(scalar_to_string)
                    .map(Value::String)
                    .collect(),
            )),
            other => scalar_to_string(other).map(|s| Value::Array(vec![Value::String(s)])),
        },
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn empty_value(kind: FieldKind) -> Value {
    match kind {
        FieldKind::Text => Value::String(String::new()),
        FieldKind::TextList => Value::Array(Vec::new()),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Reads the reply as JSON. A bare JSON value is taken as is; otherwise the
/// first `{` that opens a complete object wins, which skips code fences and
/// prose (including prose with braces of its own) around the object.
fn parse_reply(raw: &str) -> Result<Value, serde_json::Error> {
    let text = raw.trim();
    let whole = match serde_json::from_str::<Value>(text) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };
    text.match_indices('{')
        .find_map(|(start, _)| first_object(&text[start..]))
        .ok_or(whole)
}

/// The object at the head of `text`, ignoring whatever follows it.
fn first_object(text: &str) -> Option<Value> {
    serde_json::Deserializer::from_str(text)
        .into_iter::<Value>()
        .next()
        .and_then(Result::ok)
        .filter(Value::is_object)
}
