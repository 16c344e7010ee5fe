//! Request DTOs for the cache server API
//!
//! Defines incoming request bodies and their validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query string for `GET /get`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetQuery {
    #[serde(default)]
    pub key: String,
}

/// The `value` field of a creation request.
///
/// Only strings are accepted; anything else is carried as `Other` so the
/// validator can reject it explicitly.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RequestValue {
    Text(String),
    Other(Value),
}

impl Default for RequestValue {
    fn default() -> Self {
        RequestValue::Other(Value::Null)
    }
}

/// Request body for `POST /create`.
///
/// Missing fields fall back to empty defaults so that validation can report
/// every problem at once.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheCreationRequest {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: RequestValue,
    #[serde(default)]
    pub duration_in_seconds: i64,
}

/// A creation request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCreation {
    pub key: String,
    pub value: String,
    pub duration_in_seconds: u64,
}

// == Validation Errors ==
/// Field name to human-readable reason.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, reason: impl Into<String>) {
        self.0.insert(field, reason.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl CacheCreationRequest {
    // == Validate ==
    /// Checks every field independently.
    ///
    /// Returns the validated request, or all field errors together.
    pub fn validate(self) -> Result<ValidCreation, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.key.trim().is_empty() {
            errors.add("key", "Cache `key` cannot be empty");
        }

        let value = match self.value {
            RequestValue::Text(text) => text,
            RequestValue::Other(other) => {
                tracing::debug!("Rejecting non-string cache value: {}", other);
                errors.add("value", "Cache `value` must be a string");
                String::new()
            }
        };
        if errors.get("value").is_none() && value.trim().is_empty() {
            errors.add("value", "Cache `value` cannot be empty");
        }

        if self.duration_in_seconds < 1 {
            errors.add(
                "duration_in_seconds",
                "Value `duration_in_seconds` should be >= 1",
            );
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidCreation {
            key: self.key,
            value,
            duration_in_seconds: self.duration_in_seconds.unsigned_abs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> CacheCreationRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_creation_request_deserialize() {
        let req = parse(r#"{"key":"u","value":"Angga","duration_in_seconds":10}"#);
        assert_eq!(req.key, "u");
        assert_eq!(req.value, RequestValue::Text("Angga".to_string()));
        assert_eq!(req.duration_in_seconds, 10);
    }

    #[test]
    fn test_non_string_value_is_tagged_other() {
        let req = parse(r#"{"key":"u","value":42,"duration_in_seconds":10}"#);
        assert_eq!(req.value, RequestValue::Other(serde_json::json!(42)));
    }

    #[test]
    fn test_missing_fields_default() {
        let req = parse("{}");
        assert_eq!(req.key, "");
        assert_eq!(req.value, RequestValue::Other(Value::Null));
        assert_eq!(req.duration_in_seconds, 0);
    }

    #[test]
    fn test_validate_valid_request() {
        let valid = parse(r#"{"key":"u","value":"Angga","duration_in_seconds":10}"#)
            .validate()
            .unwrap();

        assert_eq!(
            valid,
            ValidCreation {
                key: "u".to_string(),
                value: "Angga".to_string(),
                duration_in_seconds: 10,
            }
        );
    }

    #[test]
    fn test_validate_reports_every_field() {
        let errors = parse(r#"{"key":"  ","value":"","duration_in_seconds":0}"#)
            .validate()
            .unwrap_err();

        assert_eq!(errors.len(), 3);
        assert!(errors.get("key").is_some());
        assert!(errors.get("value").is_some());
        assert!(errors.get("duration_in_seconds").is_some());
    }

    #[test]
    fn test_validate_rejects_whitespace_value() {
        let errors = parse(r#"{"key":"k","value":" \t ","duration_in_seconds":5}"#)
            .validate()
            .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("value"), Some("Cache `value` cannot be empty"));
    }

    #[test]
    fn test_validate_rejects_non_string_value() {
        let errors = parse(r#"{"key":"k","value":{"nested":true},"duration_in_seconds":5}"#)
            .validate()
            .unwrap_err();

        assert_eq!(errors.get("value"), Some("Cache `value` must be a string"));
    }

    #[test]
    fn test_validate_rejects_negative_duration() {
        let errors = parse(r#"{"key":"k","value":"v","duration_in_seconds":-1}"#)
            .validate()
            .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(errors.get("duration_in_seconds").is_some());
    }

    #[test]
    fn test_validation_errors_serialize_as_map() {
        let mut errors = ValidationErrors::default();
        errors.add("key", "Cache `key` cannot be empty");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"key": "Cache `key` cannot be empty"}));
    }
}
