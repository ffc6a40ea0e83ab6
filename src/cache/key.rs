//! Cache Key Module
//!
//! Builds canonical cache keys from an operation name and an argument bag.
//!
//! Key layout: `operation:name1:value1|name2:value2`, argument names sorted
//! lexicographically, values rendered as canonical JSON.

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::{CacheError, Result};

/// Separator placed between `name:value` pairs.
pub const PAIR_DELIMITER: char = '|';

// Largest integer an f64 holds exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

// == Build Key ==
/// Builds the cache key for `operation_name` called with `args`.
///
/// - Argument order does not matter; names are sorted before encoding.
/// - Top-level `null` arguments are dropped, so an explicit `null` and an
///   absent argument share a key.
/// - Nested objects are encoded with sorted keys; floats without a
///   fractional part are encoded as integers.
///
/// Returns `InvalidArgument` when `operation_name` is empty.
pub fn build_key(operation_name: &str, args: &Map<String, Value>) -> Result<String> {
    if operation_name.is_empty() {
        return Err(CacheError::invalid("operation name must not be empty"));
    }

    let mut pairs: Vec<(&String, &Value)> = args.iter().filter(|(_, v)| !v.is_null()).collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let mut key = String::with_capacity(operation_name.len() + 1 + pairs.len() * 16);
    key.push_str(operation_name);
    key.push(':');

    for (i, (name, value)) in pairs.into_iter().enumerate() {
        if i > 0 {
            key.push(PAIR_DELIMITER);
        }
        key.push_str(name);
        key.push(':');
        write_canonical(value, &mut key);
    }

    Ok(key)
}

// == Build Key From ==
/// Builds a key from any serializable argument struct.
///
/// The arguments must serialize to a JSON object (or to `null`, which is
/// treated as an empty bag).
pub fn build_key_from<T: Serialize + ?Sized>(operation_name: &str, args: &T) -> Result<String> {
    let value = serde_json::to_value(args)
        .map_err(|e| CacheError::invalid(format!("arguments are not serializable: {}", e)))?;

    match value {
        Value::Object(map) => build_key(operation_name, &map),
        Value::Null => build_key(operation_name, &Map::new()),
        other => Err(CacheError::invalid(format!(
            "arguments must serialize to an object, got {}",
            json_kind(&other)
        ))),
    }
}

// == Cache Key Builder ==
/// Fluent builder over [`build_key`] for call sites assembling arguments by hand.
#[derive(Debug, Clone)]
pub struct CacheKeyBuilder {
    operation: String,
    args: Map<String, Value>,
}

impl CacheKeyBuilder {
    /// Starts a key for the given operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            args: Map::new(),
        }
    }

    /// Adds (or replaces) an argument.
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    /// Adds an argument only when present.
    pub fn opt_arg<V: Into<Value>>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.arg(name, v),
            None => self,
        }
    }

    /// Produces the canonical key.
    pub fn build(&self) -> Result<String> {
        build_key(&self.operation, &self.args)
    }
}

// == Canonical Encoding ==
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => write_number(n, out),
        Value::String(_) => out.push_str(&value.to_string()),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut fields: Vec<(&String, &Value)> = map.iter().collect();
            fields.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (name, field)) in fields.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(name.clone()).to_string());
                out.push(':');
                write_canonical(field, out);
            }
            out.push('}');
        }
    }
}

fn write_number(n: &Number, out: &mut String) {
    match n.as_f64() {
        // 2025.0 and 2025 must collapse to the same key
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER => {
            out.push_str(&(f as i64).to_string())
        }
        _ => out.push_str(&n.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
