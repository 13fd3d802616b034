//! Helpers for turning loosely-typed remote payloads into domain values.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static PRICE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("price regex is valid"));

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}

/// Strips a surrounding markdown code fence (```json ... ```), if any.
#[must_use]
pub fn strip_markdown_json(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .map_or(trimmed, str::trim)
}

/// Reads a price from a number or from text such as `"$1,250.00"`.
#[must_use]
pub fn parse_price(value: &Value) -> Option<f64> {
    let price: Option<f64> = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let m = PRICE_REGEX.find(s)?;
            m.as_str().replace(',', "").parse().ok()
        },
        _ => None,
    };
    price.filter(|p| p.is_finite())
}

/// Reads a free-text field that may arrive as a string or a number.
#[must_use]
pub fn parse_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a boolean that may arrive as `true`, `"yes"` or `"true"`.
#[must_use]
pub fn parse_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "y"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_price_variants() {
        assert_eq!(parse_price(&json!(450)), Some(450.0));
        assert_eq!(parse_price(&json!(99.5)), Some(99.5));
        assert_eq!(parse_price(&json!("$1,250.00")), Some(1250.0));
        assert_eq!(parse_price(&json!("about 600 dollars")), Some(600.0));
        assert_eq!(parse_price(&json!("call for pricing")), None);
        assert_eq!(parse_price(&json!(null)), None);
    }

    #[test]
    fn test_strip_markdown_json() {
        assert_eq!(strip_markdown_json("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_markdown_json("```\n{}\n```"), "{}");
        assert_eq!(strip_markdown_json("  [2] "), "[2]");
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        assert_eq!(truncate("héllo", 2), "h");
        assert_eq!(truncate("abc", 10), "abc");
    }

    #[test]
    fn test_parse_flag_and_text() {
        assert!(parse_flag(Some(&json!(true))));
        assert!(parse_flag(Some(&json!("Yes"))));
        assert!(!parse_flag(Some(&json!("no"))));
        assert!(!parse_flag(None));
        assert_eq!(parse_text(Some(&json!(3))), Some("3".to_owned()));
        assert_eq!(parse_text(Some(&json!("  "))), None);
    }
}
