//! Chat message validation with simple spam heuristics.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use super::{
    FieldType, ValidationCode, ValidationError, ValidationReport, ValidationRule, sanitize::sanitize_string, validate,
};

/// Longest accepted chat message, in characters.
pub const MAX_CHAT_MESSAGE_LENGTH: usize = 5000;

/// A run of this many identical characters counts as spam.
const MAX_CHAR_RUN: usize = 20;

const SPAM_PHRASES: &[&str] =
    &["click here", "buy now", "free money", "make money fast", "limited time offer", "act now", "winner winner"];

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)\S+").expect("URL pattern is a valid regex"));

/// Outcome of [`validate_chat_message`].
#[derive(Debug, Clone, Serialize)]
pub struct ChatValidation {
    #[serde(flatten)]
    pub report: ValidationReport,
    /// Sanitized message, present only when the payload is valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanitized: Option<String>,
}

/// Validate a `{ "message": ... }` chat payload.
///
/// Never fails: every problem, spam included, is reported as a
/// `ValidationError` on the `message` field.
pub fn validate_chat_message(payload: &Value) -> ChatValidation {
    let rules = [ValidationRule::new("message")
        .required()
        .of_type(FieldType::String)
        .max_length(MAX_CHAT_MESSAGE_LENGTH)
        .custom(|v| match v.as_str() {
            Some(text) if text.trim().is_empty() => Err("message must not be empty".to_string()),
            _ => Ok(()),
        })];

    let mut report = validate(payload, &rules);
    if !report.is_valid {
        return ChatValidation { report, sanitized: None };
    }

    let raw = payload.get("message").and_then(Value::as_str).unwrap_or_default();
    let spam = spam_findings(raw);
    if !spam.is_empty() {
        report.errors.extend(spam);
        report.is_valid = false;
        return ChatValidation { report, sanitized: None };
    }

    let sanitized = sanitize_string(raw);
    if sanitized.is_empty() {
        report.errors.push(ValidationError::new(
            "message",
            ValidationCode::MinLength,
            "message must contain text after sanitization",
        ));
        report.is_valid = false;
        return ChatValidation { report, sanitized: None };
    }

    ChatValidation { report, sanitized: Some(sanitized) }
}

fn spam_findings(text: &str) -> Vec<ValidationError> {
    let mut findings = Vec::new();

    if longest_char_run(text) >= MAX_CHAR_RUN {
        findings.push(ValidationError::new(
            "message",
            ValidationCode::SpamDetected,
            "message repeats a character too many times",
        ));
    }

    if URL_PATTERN.is_match(text) {
        findings.push(ValidationError::new(
            "message",
            ValidationCode::SpamDetected,
            "links are not allowed in messages",
        ));
    }

    let lowered = text.to_lowercase();
    if let Some(phrase) = SPAM_PHRASES.iter().find(|p| lowered.contains(**p)) {
        findings.push(ValidationError::new(
            "message",
            ValidationCode::SpamDetected,
            format!("message contains a blocked phrase: \"{phrase}\""),
        ));
    }

    findings
}

/// Longest run of one repeated character. Whitespace breaks a run.
fn longest_char_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous = None;
    for c in text.chars() {
        if c.is_whitespace() {
            current = 0;
            previous = None;
            continue;
        }
        if Some(c) == previous {
            current += 1;
        } else {
            current = 1;
            previous = Some(c);
        }
        longest = longest.max(current);
    }
    longest
}
