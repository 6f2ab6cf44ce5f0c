//! Extraction of the first balanced JSON object from free-form text.

use regex::{Captures, Regex};
use tracing::error;

use crate::repair::repair_json;

/// Extracts the first balanced `{...}` span from `text` and returns it as a
/// strictly valid JSON string, or `None` if no repairable object is present.
///
/// The scan walks brace depth from the first `{`; the candidate span ends
/// where depth returns to zero. Depth counting is deliberately unaware of
/// braces inside string literals, and only the first span is ever
/// considered; trailing content is ignored. An unbalanced span produces
/// `None`, not an error.
///
/// Residual `\n` escape sequences in the repaired text are collapsed to a
/// single space before returning: readability is preferred over exact
/// whitespace fidelity, so multi-line string values come back single-line.
#[must_use]
pub fn extract_first_json_object(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth: i64 = 0;
    for (offset, &byte) in bytes.iter().enumerate().skip(start) {
        match byte {
            b'{' => depth += 1,
            b'}' => depth -= 1,
            _ => {}
        }
        if depth == 0 {
            return validate_candidate(&text[start..=offset]);
        }
    }

    // Depth never returned to zero: no span is produced.
    None
}

/// Normalizes, repairs, and strictly validates one candidate span.
fn validate_candidate(candidate: &str) -> Option<String> {
    let repaired = repair_json(&normalize_span(candidate));

    match serde_json::from_str::<serde_json::Value>(&repaired) {
        Ok(_) => Some(repaired.replace("\\n", " ")),
        Err(err) => {
            error!(candidate = %candidate, error = %err, "malformed JSON candidate in model output");
            None
        }
    }
}

// Two textual fixups applied ahead of the repair pass: commas dangling
// before a closer, and a bare newline splitting a quoted value.
fn normalize_span(span: &str) -> String {
    let mut normalized = span.to_string();

    if let Ok(re) = Regex::new(r",\s*([}\]])") {
        normalized = re.replace_all(&normalized, "$1").into_owned();
    }

    if let Ok(re) = Regex::new(r#":\s*"([^"]*?)\n([^"]*?)""#) {
        normalized = re
            .replace_all(&normalized, |caps: &Captures| {
                format!(": \"{}\\n{}\"", &caps[1], &caps[2])
            })
            .into_owned();
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn value(text: &str) -> Value {
        serde_json::from_str(&extract_first_json_object(text).unwrap()).unwrap()
    }

    #[test]
    fn text_without_a_brace_yields_nothing() {
        assert_eq!(extract_first_json_object(""), None);
        assert_eq!(extract_first_json_object("plain prose, no object"), None);
    }

    #[test]
    fn unbalanced_span_yields_nothing() {
        assert_eq!(extract_first_json_object(r#"{"a": 1"#), None);
        assert_eq!(extract_first_json_object("text { still open"), None);
    }

    #[test]
    fn object_embedded_in_prose_is_extracted() {
        let text = r#"Here you go: {"a": {"b": 2}, "c": [1]} and that's it."#;
        assert_eq!(value(text), json!({"a": {"b": 2}, "c": [1]}));
    }

    #[test]
    fn only_the_first_object_is_considered() {
        assert_eq!(value(r#"{"first": 1} {"second": 2}"#), json!({"first": 1}));
    }

    #[test]
    fn already_valid_json_round_trips() {
        let text = r#"{"a": 1, "nested": {"b": [true, null]}}"#;
        assert_eq!(value(text), json!({"a": 1, "nested": {"b": [true, null]}}));
    }

    #[test]
    fn trailing_comma_is_removed() {
        assert_eq!(value(r#"{"a":1,}"#), json!({"a": 1}));
    }

    #[test]
    fn multiline_string_value_is_collapsed_to_one_line() {
        let text = "{\"a\": \"line1\nline2\"}";
        assert_eq!(value(text), json!({"a": "line1 line2"}));
    }

    #[test]
    fn fenced_output_with_trailing_comma_is_recovered() {
        let text = "Sure! ```json\n{\"response\": \"hi\", }\n```";
        assert_eq!(value(text), json!({"response": "hi"}));
    }
}
