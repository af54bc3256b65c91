//! Rule-based validation of JSON request payloads.
//!
//! Rules address fields by dot path (`"user.profile.name"`). Each field
//! reports at most one error, the first failing check in this order:
//! required, type, length, pattern, custom predicate.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

mod chat;
mod sanitize;

pub use chat::{ChatValidation, MAX_CHAT_MESSAGE_LENGTH, validate_chat_message};
pub use sanitize::{MAX_SANITIZED_LENGTH, sanitize_string, sanitize_value};

/// Custom check; `Err` carries the message reported to the caller.
pub type CustomCheck = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// Expected JSON type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl FieldType {
    fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Object => value.is_object(),
            FieldType::Array => value.is_array(),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Object => "object",
            FieldType::Array => "array",
        }
    }
}

/// Machine-readable reason a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    Required,
    InvalidType,
    MinLength,
    MaxLength,
    PatternMismatch,
    Custom,
    SpamDetected,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub code: ValidationCode,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, code: ValidationCode, message: impl Into<String>) -> Self {
        Self { field: field.into(), code, message: message.into() }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self { is_valid: errors.is_empty(), errors }
    }
}

/// A single field rule, built with chained setters.
#[derive(Clone)]
pub struct ValidationRule {
    pub field: String,
    pub field_type: Option<FieldType>,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub custom: Option<CustomCheck>,
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("field", &self.field)
            .field("field_type", &self.field_type)
            .field("required", &self.required)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

impl ValidationRule {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            field_type: None,
            required: false,
            min_length: None,
            max_length: None,
            pattern: None,
            custom: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn of_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn custom<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.custom = Some(Arc::new(check));
        self
    }

    fn check(&self, value: Option<&Value>) -> Option<ValidationError> {
        let field = &self.field;
        let value = match value {
            Some(v) if !v.is_null() => v,
            _ if self.required => {
                return Some(ValidationError::new(field, ValidationCode::Required, format!("{field} is required")));
            }
            _ => return None,
        };

        if let Some(expected) = self.field_type
            && !expected.matches(value)
        {
            return Some(ValidationError::new(
                field,
                ValidationCode::InvalidType,
                format!("{field} must be a {}", expected.as_str()),
            ));
        }

        if let Some(text) = value.as_str() {
            let len = text.chars().count();
            if let Some(min) = self.min_length
                && len < min
            {
                return Some(ValidationError::new(
                    field,
                    ValidationCode::MinLength,
                    format!("{field} must be at least {min} characters"),
                ));
            }
            if let Some(max) = self.max_length
                && len > max
            {
                return Some(ValidationError::new(
                    field,
                    ValidationCode::MaxLength,
                    format!("{field} must be at most {max} characters"),
                ));
            }
            if let Some(pattern) = &self.pattern
                && !pattern.is_match(text)
            {
                return Some(ValidationError::new(
                    field,
                    ValidationCode::PatternMismatch,
                    format!("{field} has an invalid format"),
                ));
            }
        }

        if let Some(check) = &self.custom
            && let Err(message) = check(value)
        {
            return Some(ValidationError::new(field, ValidationCode::Custom, message));
        }

        None
    }
}

/// Follow a dot path through nested objects.
pub fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(data, |current, segment| current.get(segment))
}

/// Validate `data` against every rule.
pub fn validate(data: &Value, rules: &[ValidationRule]) -> ValidationReport {
    let errors = rules.iter().filter_map(|rule| rule.check(lookup(data, &rule.field))).collect();
    ValidationReport::from_errors(errors)
}
