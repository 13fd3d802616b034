//! Environment variable parsing with warn-level logging for invalid values.

/// Parse an environment variable with a default fallback.
///
/// - If the variable is not set: returns `default` silently (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    parse_with_default(var, std::env::var(var).ok(), default)
}

/// Same as [`env_parse_with_default`] but takes the raw value explicitly,
/// so callers with their own variable source (tests, config maps) share
/// the warning behavior.
pub fn parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    raw: Option<String>,
    default: T,
) -> T {
    match raw {
        Some(v) => match v.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        None => default,
    }
}

/// Returns the trimmed value, or `None` when unset or blank.
pub fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_value() {
        let result: u32 = parse_with_default("X", Some("42".to_owned()), 10);
        assert_eq!(result, 42);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let result: u64 = parse_with_default("X", Some(" 5000 \n".to_owned()), 10);
        assert_eq!(result, 5000);
    }

    #[test]
    fn test_parse_invalid_value() {
        let result: u32 = parse_with_default("X", Some("banana".to_owned()), 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn test_parse_missing_value() {
        let result: u32 = parse_with_default("X", None, 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn test_parse_empty_value() {
        let result: u32 = parse_with_default("X", Some(String::new()), 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn test_env_parse_missing_var() {
        let result: u32 = env_parse_with_default("REPAIRDESK_TEST_MISSING_98273", 7);
        assert_eq!(result, 7);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  key ".to_owned())).as_deref(), Some("key"));
        assert_eq!(non_empty(Some("   ".to_owned())), None);
        assert_eq!(non_empty(None), None);
    }
}
