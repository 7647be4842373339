//! Raw medal standings document.
//!
//! The upstream shape is not contractually guaranteed, so the payload keeps
//! the parsed JSON as-is and only the top-level key is validated. Nested
//! lookups return `None` or empty slices instead of failing.

use serde_json::Value;

use crate::api::error::FetchError;

/// Top-level key that identifies a medal standings document.
pub const MEDAL_STANDINGS_KEY: &str = "medalStandings";

/// Validated medal standings document.
#[derive(Debug, Clone, PartialEq)]
pub struct MedalPayload {
    raw: Value,
}

/// Confirms the presence of the medal standings key.
///
/// Presence only: nested field types are not checked.
pub fn validate_payload(value: &Value) -> Result<(), FetchError> {
    let Some(object) = value.as_object() else {
        return Err(FetchError::InvalidResponse {
            reason: "response body is not a JSON object".to_string(),
        });
    };

    if !object.contains_key(MEDAL_STANDINGS_KEY) {
        return Err(FetchError::InvalidResponse {
            reason: format!("missing '{}' key", MEDAL_STANDINGS_KEY),
        });
    }

    Ok(())
}

impl MedalPayload {
    /// Wraps a parsed document after validating it.
    pub fn from_value(raw: Value) -> Result<Self, FetchError> {
        validate_payload(&raw)?;
        Ok(Self { raw })
    }

    /// Parses and validates a response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, FetchError> {
        let raw: Value = serde_json::from_slice(body).map_err(|e| FetchError::InvalidResponse {
            reason: format!("body is not valid JSON: {}", e),
        })?;
        Self::from_value(raw)
    }

    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    pub fn standings(&self) -> Option<&Value> {
        self.raw.get(MEDAL_STANDINGS_KEY)
    }

    /// `medalStandings.eventInfo`, if present.
    pub fn event_info(&self) -> Option<&Value> {
        self.standings()?.get("eventInfo")
    }

    /// `medalStandings.medalsTable`, or an empty slice.
    pub fn medals_table(&self) -> &[Value] {
        self.standings()
            .and_then(|s| s.get("medalsTable"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Country record whose `organisation` equals `code`.
    pub fn country(&self, code: &str) -> Option<&Value> {
        self.medals_table()
            .iter()
            .find(|country| country.get("organisation").and_then(Value::as_str) == Some(code))
    }

    /// Country codes in table order. Records without a string code are skipped.
    pub fn country_codes(&self) -> Vec<String> {
        self.medals_table()
            .iter()
            .filter_map(|country| country.get("organisation").and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }
}
