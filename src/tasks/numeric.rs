//! Numeric field coercion for task results.
//!
//! The backend serializes amounts either as JSON numbers or as strings. Before a task
//! result is decoded, every field listed in the task's numeric keys is rewritten into the
//! canonical decimal string form, so the typed models only ever see one representation.

use super::types::TaskError;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Rewrite every field named in `keys`, at any depth, into a canonical decimal string.
///
/// `null` values are left alone. A string that does not parse as a number is an error.
pub fn coerce_numeric_keys(value: &mut Value, keys: &[String]) -> Result<(), TaskError> {
    if keys.is_empty() {
        return Ok(());
    }

    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                let scalar = matches!(field, Value::Number(_) | Value::String(_));
                if scalar && keys.iter().any(|k| k == key) {
                    coerce_field(key, field)?;
                } else {
                    coerce_numeric_keys(field, keys)?;
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                coerce_numeric_keys(item, keys)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn coerce_field(key: &str, field: &mut Value) -> Result<(), TaskError> {
    let parsed = match field {
        Value::Number(number) => parse_decimal(key, &number.to_string())?,
        Value::String(text) => parse_decimal(key, text)?,
        _ => return Ok(()),
    };
    *field = Value::String(parsed.normalize().to_string());
    Ok(())
}

fn parse_decimal(key: &str, text: &str) -> Result<Decimal, TaskError> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| TaskError::Numeric {
            key: key.to_string(),
            value: text.to_string(),
        })
}
