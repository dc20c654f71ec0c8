use serde::Deserialize;

use crate::validation::ValidationReport;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApplyForm {
    pub name: String,
    pub email: String,
}

/// A validated apply form with the email already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applicant {
    pub name: String,
    pub email: String,
}

/// Emails are matched case-insensitively, so they are stored and queried lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_apply(form: &ApplyForm) -> Result<Applicant, ValidationReport> {
    let mut report = ValidationReport::new();
    report.min_chars("name", &form.name, 2, "Your name is required.");
    report.email("email", &form.email, "A valid email is required.");
    report.finish()?;
    Ok(Applicant {
        name: form.name.trim().to_string(),
        email: normalize_email(&form.email),
    })
}

pub fn validate_lookup_email(email: &str) -> Result<String, ValidationReport> {
    let mut report = ValidationReport::new();
    report.email("email", email, "Please enter a valid email address.");
    report.finish()?;
    Ok(normalize_email(email))
}
