//! Permissive accessors over nested JSON records.
//!
//! Missing or mistyped fields become `0`, `null` or an empty list.

use serde_json::Value;

/// Integer field, accepting numeric strings. Anything else is `None`.
pub fn int_field(record: &Value, key: &str) -> Option<i64> {
    match record.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn count_field(record: &Value, key: &str) -> i64 {
    int_field(record, key).unwrap_or(0)
}

/// Field passed through as-is, or `null`.
pub fn raw_field(record: &Value, key: &str) -> Value {
    record.get(key).cloned().unwrap_or(Value::Null)
}

pub fn str_field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

pub fn list_field<'a>(record: &'a Value, key: &str) -> &'a [Value] {
    record
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
