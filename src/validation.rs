//! Field and form validation
//!
//! Field validators are pure functions returning `Some(message)` when the value
//! is rejected. Forms implement [`FormValidator`] and collect the messages of all
//! their fields into a [`FieldErrors`] map.

use chrono::{Datelike, Utc};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use validator::ValidateEmail;

static ISBN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d{9}[\dX]|\d{13})$").expect("valid ISBN regex")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ()-]{6,20}$").expect("valid phone regex"));

/// Field name → error message, in field declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(IndexMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `error` for `field` if present. The first error for a field wins.
    pub fn check(&mut self, field: &str, error: Option<String>) {
        if let Some(message) = error {
            self.0.entry(field.to_string()).or_insert(message);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Typed form validation shared by every console form.
pub trait FormValidator {
    /// Names of the fields this form validates, in display order.
    const FIELDS: &'static [&'static str];

    /// Validate a single field; unknown fields are valid.
    fn validate_field(&self, field: &str) -> Option<String>;

    /// Run every field validator, plus any cross-field rule.
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for field in Self::FIELDS {
            errors.check(field, self.validate_field(field));
        }
        errors
    }
}

// ---------------------------------------------------------------------------
// Field validators
// ---------------------------------------------------------------------------

pub fn required(label: &str, value: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some(format!("{} is required", label))
    } else {
        None
    }
}

pub fn max_length(label: &str, value: &str, max: usize) -> Option<String> {
    if value.chars().count() > max {
        Some(format!("{} must be at most {} characters", label, max))
    } else {
        None
    }
}

pub fn min_length(label: &str, value: &str, min: usize) -> Option<String> {
    if value.chars().count() < min {
        Some(format!("{} must be at least {} characters", label, min))
    } else {
        None
    }
}

/// Required, bounded text.
pub fn required_text(label: &str, value: &str, max: usize) -> Option<String> {
    required(label, value).or_else(|| max_length(label, value.trim(), max))
}

/// Optional, bounded text.
pub fn optional_text(label: &str, value: Option<&str>, max: usize) -> Option<String> {
    value.and_then(|v| max_length(label, v.trim(), max))
}

pub fn email(label: &str, value: &str) -> Option<String> {
    if let Some(err) = required(label, value) {
        return Some(err);
    }
    if value.trim().validate_email() {
        None
    } else {
        Some(format!("{} is not a valid email address", label))
    }
}

pub fn optional_email(label: &str, value: Option<&str>) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => email(label, v),
        _ => None,
    }
}

pub fn optional_phone(label: &str, value: Option<&str>) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() && !PHONE_RE.is_match(v.trim()) => {
            Some(format!("{} is not a valid phone number", label))
        }
        _ => None,
    }
}

/// Drop hyphens and spaces from an ISBN so `978-2-07-040850-4` compares as
/// digits. Any other character is kept and fails the ISBN pattern.
pub fn normalize_isbn(isbn: &str) -> String {
    isbn.chars()
        .filter(|c| *c != '-' && *c != ' ')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub fn isbn(label: &str, value: &str) -> Option<String> {
    if let Some(err) = required(label, value) {
        return Some(err);
    }
    if ISBN_RE.is_match(&normalize_isbn(value)) {
        None
    } else {
        Some(format!("{} must be a 10 or 13 digit ISBN", label))
    }
}

pub fn range(label: &str, value: i64, min: i64, max: Option<i64>) -> Option<String> {
    if value < min {
        return Some(format!("{} must be at least {}", label, min));
    }
    match max {
        Some(max) if value > max => Some(format!("{} must be at most {}", label, max)),
        _ => None,
    }
}

pub fn non_negative(label: &str, value: Option<i32>) -> Option<String> {
    value.and_then(|v| range(label, v.into(), 0, None))
}

/// Publication or birth year, never later than the current year.
pub fn year(label: &str, value: Option<i32>, min: i32) -> Option<String> {
    let current = Utc::now().year();
    value.and_then(|v| range(label, v.into(), min.into(), Some(current.into())))
}

pub fn positive_id(label: &str, value: Option<i32>) -> Option<String> {
    match value {
        None => Some(format!("{} is required", label)),
        Some(v) if v <= 0 => Some(format!("{} is required", label)),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert!(required("Title", "").is_some());
        assert!(required("Title", "   ").is_some());
        assert_eq!(required("Title", "Dune"), None);
    }

    #[test]
    fn test_required_text_bounds() {
        assert!(required_text("Title", &"a".repeat(201), 200).is_some());
        assert_eq!(required_text("Title", &"a".repeat(200), 200), None);
    }

    #[test]
    fn test_email() {
        assert!(email("Email", "").is_some());
        assert!(email("Email", "not-an-email").is_some());
        assert_eq!(email("Email", "librarian@yeti.org"), None);
        assert_eq!(optional_email("Email", None), None);
        assert_eq!(optional_email("Email", Some("")), None);
    }

    #[test]
    fn test_isbn() {
        assert_eq!(isbn("ISBN", "978-2-07-040850-4"), None);
        assert_eq!(isbn("ISBN", "2 07 040850 X"), None);
        assert!(isbn("ISBN", "12345").is_some());
        assert!(isbn("ISBN", "").unwrap().contains("required"));
    }

    #[test]
    fn test_normalize_isbn() {
        assert_eq!(normalize_isbn("978-2-07-040850-4"), "9782070408504");
        assert_eq!(normalize_isbn("2 07 040850 x"), "207040850X");
        assert_eq!(normalize_isbn("isbn 2-07"), "ISBN207");
    }

    #[test]
    fn test_isbn_rejects_surrounding_text() {
        assert!(isbn("ISBN", "ISBN 978-0441172719 (paperback)").is_some());
        assert!(isbn("ISBN", "978abc0441172719zzz").is_some());
        assert!(isbn("ISBN", "97804411727x9").is_some());
        assert!(isbn("ISBN", "978.0.441.17271.9").is_some());
        assert_eq!(isbn("ISBN", "978-0-441-17271-9"), None);
        assert_eq!(isbn("ISBN", "0-14-143958-0"), None);
    }

    #[test]
    fn test_year_bounded_by_current_year() {
        let next = Utc::now().year() + 1;
        assert!(year("Year", Some(next), 1000).is_some());
        assert!(year("Year", Some(999), 1000).is_some());
        assert_eq!(year("Year", Some(1965), 1000), None);
        assert_eq!(year("Year", None, 1000), None);
    }

    #[test]
    fn test_non_negative() {
        assert!(non_negative("Pages", Some(-1)).is_some());
        assert_eq!(non_negative("Pages", Some(0)), None);
    }

    #[test]
    fn test_field_errors_keep_first_message() {
        let mut errors = FieldErrors::new();
        errors.check("title", Some("first".into()));
        errors.check("title", Some("second".into()));
        errors.check("isbn", None);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("title"), Some("first"));
    }
}
