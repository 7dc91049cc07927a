//! Identifier helpers
//!
//! Property keys are arbitrary JSON strings; these turn them into field
//! identifiers and string literals for each target.

use std::collections::HashSet;

use super::config::{PYTHON_KEYWORDS, RUST_KEYWORDS};

/// Whether `name` can be written as a bare Python attribute
pub fn is_python_identifier(name: &str) -> bool {
    is_identifier(name) && !PYTHON_KEYWORDS.contains(&name)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|c| c == '_' || c.is_alphanumeric())
        }
        _ => false,
    }
}

/// Convert to snake_case, replacing anything outside `[A-Za-z0-9_]` with `_`
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;

    for c in s.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            result.push(c);
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        } else {
            result.push('_');
            prev_lower = false;
        }
    }

    result
}

/// Rust field identifier for a property key
pub fn rust_field_name(key: &str) -> String {
    let mut name = to_snake_case(key);
    if name.is_empty() || name == "_" {
        name = "field".to_string();
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }

    match name.as_str() {
        "crate" | "self" | "super" => format!("{}_", name),
        other if RUST_KEYWORDS.contains(&other) => format!("r#{}", other),
        _ => name,
    }
}

/// Rust field identifiers for `keys`, deduplicated in order.
///
/// `fooBar` and `foo_bar` both snake-case to `foo_bar`; later ones get a
/// numeric suffix.
pub fn rust_field_names<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.into_iter()
        .map(|key| {
            let base = rust_field_name(key);
            let mut candidate = base.clone();
            let mut n = 2;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{}_{}", base, n);
                n += 1;
            }
            candidate
        })
        .collect()
}

/// Bare field identifier as written, without a raw prefix
pub fn unraw(name: &str) -> &str {
    name.strip_prefix("r#").unwrap_or(name)
}

/// Double-quoted Python string literal
pub fn python_string_literal(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// Double-quoted Rust string literal
pub fn rust_string_literal(s: &str) -> String {
    format!("{:?}", s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("streetAddress"), "street_address");
        assert_eq!(to_snake_case("UserProfile"), "user_profile");
        assert_eq!(to_snake_case("zip-code"), "zip_code");
        assert_eq!(to_snake_case("line2Text"), "line2_text");
        // All-caps is treated as individual letters
        assert_eq!(to_snake_case("API"), "api");
    }

    #[test]
    fn test_rust_field_name() {
        assert_eq!(rust_field_name("type"), "r#type");
        assert_eq!(rust_field_name("self"), "self_");
        assert_eq!(rust_field_name("1st"), "_1st");
        assert_eq!(rust_field_name("$"), "field");
        assert_eq!(rust_field_name("city"), "city");
    }

    #[test]
    fn test_rust_field_names_dedupe() {
        let names = rust_field_names(["fooBar", "foo_bar", "foo-bar"]);
        assert_eq!(names, vec!["foo_bar", "foo_bar_2", "foo_bar_3"]);
    }

    #[test]
    fn test_python_identifier() {
        assert!(is_python_identifier("street_address"));
        assert!(is_python_identifier("_private"));
        assert!(!is_python_identifier("zip-code"));
        assert!(!is_python_identifier("2fa"));
        assert!(!is_python_identifier("class"));
        assert!(!is_python_identifier(""));
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(python_string_literal("a\"b"), r#""a\"b""#);
        assert_eq!(python_string_literal("zip-code"), "\"zip-code\"");
        assert_eq!(rust_string_literal("fullName"), "\"fullName\"");
        assert_eq!(rust_string_literal("tab\there"), r#""tab\there""#);
    }
}
