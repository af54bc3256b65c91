//! String sanitization for user input.

use serde_json::Value;

/// Longest sanitized string, in characters.
pub const MAX_SANITIZED_LENGTH: usize = 10_000;

/// Trim, strip `<` and `>`, collapse whitespace and truncate.
///
/// Only the angle brackets are removed; tag names stay in the text.
pub fn sanitize_string(input: &str) -> String {
    let without_brackets: String = input.trim().chars().filter(|c| *c != '<' && *c != '>').collect();
    let collapsed = without_brackets.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(MAX_SANITIZED_LENGTH).collect()
}

/// Sanitize a JSON value; anything but a string becomes `""`.
pub fn sanitize_value(input: &Value) -> String {
    input.as_str().map(sanitize_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strips_brackets_only() {
        assert_eq!(sanitize_string("<script>hi</script>  there"), "scripthi/script there");
    }

    #[test]
    fn test_trims_and_collapses() {
        assert_eq!(sanitize_string("  what \n\t is   um  "), "what is um");
    }

    #[test]
    fn test_truncates() {
        let long = "a".repeat(MAX_SANITIZED_LENGTH + 50);
        assert_eq!(sanitize_string(&long).chars().count(), MAX_SANITIZED_LENGTH);
    }

    #[test]
    fn test_non_string_values() {
        assert_eq!(sanitize_value(&json!(42)), "");
        assert_eq!(sanitize_value(&json!(null)), "");
        assert_eq!(sanitize_value(&json!({"a": 1})), "");
        assert_eq!(sanitize_value(&json!(" <b>ok</b> ")), "bok/b");
    }
}
