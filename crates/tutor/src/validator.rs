//! Request validation: raw JSON fields in, `AskRequest` or rejection out.
//!
//! Runs before anything else touches the request, so a bad question never
//! reaches the provider.

use kasa_config::TutorConfig;
use kasa_core::ask::{Age, AskRequest};
use kasa_core::error::ValidationError;
use serde::Deserialize;
use serde_json::Value;

/// Subject used when the caller does not name one.
pub const DEFAULT_SUBJECT: &str = "general";

/// The `/ask` body before validation. Every field is an arbitrary JSON value
/// so wrong types are reported by the validator instead of the JSON layer.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawAsk {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub age: Option<Value>,
    #[serde(default)]
    pub subject: Option<Value>,
}

impl RawAsk {
    /// Convenience constructor for callers that already have typed input.
    pub fn new(message: impl Into<String>, age: Option<f64>, subject: Option<String>) -> Self {
        Self {
            message: Some(Value::String(message.into())),
            age: age.map(Value::from),
            subject: subject.map(Value::String),
        }
    }

    /// Read a parsed request body. Only a JSON object is a question; arrays
    /// and scalars are rejected rather than matched positionally.
    pub fn from_json(body: Value) -> Result<Self, ValidationError> {
        if !body.is_object() {
            return Err(ValidationError::InvalidInput(
                "Request body must be a JSON object".into(),
            ));
        }
        serde_json::from_value(body).map_err(|e| ValidationError::InvalidInput(e.to_string()))
    }
}

/// Validation limits, taken from `[tutor]` in the config.
#[derive(Debug, Clone)]
pub struct RequestValidator {
    default_age: Age,
    max_message_chars: usize,
}

impl RequestValidator {
    pub fn new(default_age: Age, max_message_chars: usize) -> Self {
        Self {
            default_age,
            max_message_chars,
        }
    }

    pub fn from_config(config: &TutorConfig) -> Self {
        let default_age = Age::new(config.default_age).unwrap_or_default();
        Self::new(default_age, config.max_message_chars)
    }

    pub fn validate(&self, raw: &RawAsk) -> Result<AskRequest, ValidationError> {
        let message = match &raw.message {
            Some(Value::String(text)) => text.trim(),
            Some(Value::Null) | None => {
                return Err(ValidationError::InvalidInput(
                    "Field \"message\" is required".into(),
                ));
            }
            Some(_) => {
                return Err(ValidationError::InvalidInput(
                    "Field \"message\" must be a string".into(),
                ));
            }
        };

        if message.is_empty() {
            return Err(ValidationError::InvalidInput(
                "Field \"message\" must not be empty".into(),
            ));
        }

        let actual_chars = message.chars().count();
        if actual_chars > self.max_message_chars {
            return Err(ValidationError::PayloadTooLarge {
                max_chars: self.max_message_chars,
                actual_chars,
            });
        }

        Ok(AskRequest {
            message: message.to_string(),
            age: self.coerce_age(raw.age.as_ref()),
            subject: coerce_subject(raw.subject.as_ref()),
        })
    }

    fn coerce_age(&self, value: Option<&Value>) -> Age {
        let years = match value {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        years
            .filter(|y| *y >= 0.0)
            .and_then(Age::new)
            .unwrap_or(self.default_age)
    }
}

fn coerce_subject(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => DEFAULT_SUBJECT.to_string(),
    }
}
