//! Field-level form validation shared by the opportunity, apply, and lookup forms.
//!
//! Validation runs before any store call. Failures are collected per field so
//! a client can show each message next to the offending input.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub fields: Vec<FieldError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: &str) -> Self {
        let mut report = Self::new();
        report.push(field, message);
        report
    }

    pub fn push(&mut self, field: &str, message: &str) {
        self.fields.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    /// Requires at least `min` characters after trimming.
    pub fn min_chars(&mut self, field: &str, value: &str, min: usize, message: &str) {
        if value.trim().chars().count() < min {
            self.push(field, message);
        }
    }

    pub fn email(&mut self, field: &str, value: &str, message: &str) {
        if !is_valid_email(value.trim()) {
            self.push(field, message);
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.fields.is_empty()
    }

    pub fn finish(self) -> Result<(), ValidationReport> {
        if self.has_errors() {
            Err(self)
        } else {
            Ok(())
        }
    }
}

/// Structural email check: one `@`, a non-empty local part, and a dotted
/// domain whose last label is at least two letters.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));
    labels_ok && tld_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("jane@x.com"));
        assert!(is_valid_email("Jane.Doe+volunteer@example.org"));
        assert!(is_valid_email("a@sub.example.co"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("jane"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email("jane@localhost"));
        assert!(!is_valid_email("jane@x.c"));
        assert!(!is_valid_email("jane@@x.com"));
        assert!(!is_valid_email("jane doe@x.com"));
        assert!(!is_valid_email("jane..doe@x.com"));
        assert!(!is_valid_email("jane@-x.com"));
        assert!(!is_valid_email("jane@x..com"));
    }

    #[test]
    fn test_min_chars_counts_trimmed_characters() {
        let mut report = ValidationReport::new();
        report.min_chars("title", "  abcd  ", 5, "too short");
        report.min_chars("ngo", "ÉÉ", 2, "too short");
        assert_eq!(report.fields.len(), 1);
        assert_eq!(report.fields[0].field, "title");
    }

    #[test]
    fn test_finish_reports_every_field() {
        let mut report = ValidationReport::new();
        report.push("name", "Your name is required.");
        report.email("email", "nope", "A valid email is required.");
        let err = report.finish().unwrap_err();
        let fields: Vec<_> = err.fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email"]);
    }

    #[test]
    fn test_finish_ok_when_clean() {
        assert!(ValidationReport::new().finish().is_ok());
    }
}
