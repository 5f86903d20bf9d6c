//! Substring and case predicates.

use serde_json::Value;

use crate::check::TextMatch;
use crate::foundation::ValidationResult;
use crate::validators::with_text;

fn fold(text: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        text.to_string()
    } else {
        text.to_lowercase()
    }
}

fn substring(
    data: &Value,
    needle: &TextMatch,
    holds: fn(&str, &str) -> bool,
    describe: &str,
) -> ValidationResult {
    with_text(data, |s| {
        let haystack = fold(s, needle.case_sensitive);
        let wanted = fold(&needle.needle, needle.case_sensitive);
        ValidationResult::check(holds(&haystack, &wanted), || {
            format!("'{s}' must {describe} '{}'", needle.needle)
        })
    })
}

/// Text begins with the prefix.
#[must_use]
pub fn starts_with(data: &Value, prefix: &TextMatch) -> ValidationResult {
    substring(data, prefix, |s, p| s.starts_with(p), "start with")
}

/// Text ends with the suffix.
#[must_use]
pub fn ends_with(data: &Value, suffix: &TextMatch) -> ValidationResult {
    substring(data, suffix, |s, p| s.ends_with(p), "end with")
}

/// Text contains the substring.
#[must_use]
pub fn contains(data: &Value, needle: &TextMatch) -> ValidationResult {
    substring(data, needle, |s, p| s.contains(p), "contain")
}

/// Text does not contain the substring.
#[must_use]
pub fn not_contains(data: &Value, needle: &TextMatch) -> ValidationResult {
    substring(data, needle, |s, p| !s.contains(p), "not contain")
}

/// At least one cased letter and no uppercase letters.
#[must_use]
pub fn lowercase(data: &Value) -> ValidationResult {
    with_text(data, |s| {
        let cased = s.chars().any(|c| c.is_lowercase() || c.is_uppercase());
        ValidationResult::check(cased && !s.chars().any(char::is_uppercase), || {
            format!("'{s}' must be lowercase")
        })
    })
}

/// At least one cased letter and no lowercase letters.
#[must_use]
pub fn uppercase(data: &Value) -> ValidationResult {
    with_text(data, |s| {
        let cased = s.chars().any(|c| c.is_lowercase() || c.is_uppercase());
        ValidationResult::check(cased && !s.chars().any(char::is_lowercase), || {
            format!("'{s}' must be uppercase")
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn exact(needle: &str) -> TextMatch {
        TextMatch {
            needle: needle.to_string(),
            case_sensitive: true,
        }
    }

    fn folded(needle: &str) -> TextMatch {
        TextMatch {
            needle: needle.to_string(),
            case_sensitive: false,
        }
    }

    #[test]
    fn prefix_and_suffix() {
        assert!(starts_with(&json!("https://x"), &exact("https")).is_valid());
        assert!(!starts_with(&json!("HTTPS://x"), &exact("https")).is_valid());
        assert!(starts_with(&json!("HTTPS://x"), &folded("https")).is_valid());
        assert!(ends_with(&json!("report.pdf"), &exact(".pdf")).is_valid());
        assert!(!ends_with(&json!("report.PDF"), &exact(".pdf")).is_valid());
    }

    #[test]
    fn substrings() {
        assert!(contains(&json!("hello world"), &exact("lo w")).is_valid());
        assert!(not_contains(&json!("hello world"), &exact("bye")).is_valid());
        assert!(!not_contains(&json!("Hello"), &folded("hello")).is_valid());
        assert_eq!(
            contains(&json!("abc"), &exact("z")).message(),
            Some("'abc' must contain 'z'")
        );
    }

    #[test]
    fn case_predicates_need_a_cased_letter() {
        assert!(lowercase(&json!("abc-123")).is_valid());
        assert!(!lowercase(&json!("aBc")).is_valid());
        assert!(!lowercase(&json!("123")).is_valid());
        assert!(uppercase(&json!("ABC 9")).is_valid());
        assert!(!uppercase(&json!("ABc")).is_valid());
        assert!(!uppercase(&json!(7)).is_valid());
    }
}
