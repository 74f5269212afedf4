use serde::Serialize;

use crate::config::OutputFormat;

/// Format a result as minified JSON.
pub fn format_json<T: Serialize>(result: &T) -> String {
    serde_json::to_string(result).unwrap_or_else(|e| format_error(&e))
}

/// Format a result according to the configured output format.
pub fn format_as<T: Serialize>(result: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_json(result),
        OutputFormat::Pretty => {
            serde_json::to_string_pretty(result).unwrap_or_else(|e| format_error(&e))
        }
        OutputFormat::Jsonl => match serde_json::to_value(result) {
            Ok(serde_json::Value::Array(items)) => items
                .iter()
                .map(format_json)
                .collect::<Vec<_>>()
                .join("\n"),
            Ok(other) => format_json(&other),
            Err(e) => format_error(&e),
        },
    }
}

/// Format an error as JSON.
pub fn format_error(err: &dyn std::fmt::Display) -> String {
    serde_json::json!({ "error": err.to_string() }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_is_minified() {
        assert_eq!(format_json(&json!({"a": [1, 2]})), "{\"a\":[1,2]}");
    }

    #[test]
    fn jsonl_puts_array_items_on_lines() {
        let out = format_as(&json!([{"a": 1}, {"b": 2}]), OutputFormat::Jsonl);
        assert_eq!(out, "{\"a\":1}\n{\"b\":2}");
    }

    #[test]
    fn jsonl_of_object_is_one_line() {
        let out = format_as(&json!({"a": 1}), OutputFormat::Jsonl);
        assert_eq!(out, "{\"a\":1}");
    }

    #[test]
    fn pretty_is_indented() {
        let out = format_as(&json!({"a": 1}), OutputFormat::Pretty);
        assert!(out.contains('\n'));
    }

    #[test]
    fn error_is_escaped_json() {
        let out = format_error(&"bad \"quote\"");
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["error"], "bad \"quote\"");
    }
}
