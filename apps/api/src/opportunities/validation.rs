use serde::Deserialize;

use crate::models::{Category, NewOpportunity};
use crate::opportunities::placeholder::placeholder_for;
use crate::validation::ValidationReport;

/// Raw posting form. Everything is a string so a bad category is reported
/// as a field error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpportunityForm {
    pub title: String,
    pub ngo: String,
    pub description: String,
    pub long_description: String,
    pub location: String,
    pub date: String,
    pub time_commitment: String,
    pub category: String,
}

/// Checks every field, then builds the record with its placeholder image.
pub fn validate_opportunity(form: OpportunityForm) -> Result<NewOpportunity, ValidationReport> {
    let mut report = ValidationReport::new();
    report.min_chars("title", &form.title, 5, "Title must be at least 5 characters long.");
    report.min_chars("ngo", &form.ngo, 2, "Organization name is required.");
    report.min_chars("description", &form.description, 10, "A short description is required.");
    report.min_chars(
        "longDescription",
        &form.long_description,
        50,
        "A detailed description of at least 50 characters is required.",
    );
    report.min_chars("location", &form.location, 2, "Location is required.");
    report.min_chars("date", &form.date, 1, "Date is required.");
    report.min_chars("timeCommitment", &form.time_commitment, 2, "Time commitment is required.");

    let category = Category::parse(form.category.trim());
    if category.is_none() {
        report.push("category", "Please select a category.");
    }

    report.finish()?;
    let category =
        category.ok_or_else(|| ValidationReport::single("category", "Please select a category."))?;

    let image = placeholder_for(category.as_str());
    Ok(NewOpportunity {
        title: form.title.trim().to_string(),
        ngo: form.ngo.trim().to_string(),
        description: form.description.trim().to_string(),
        long_description: form.long_description.trim().to_string(),
        location: form.location.trim().to_string(),
        date: form.date.trim().to_string(),
        time_commitment: form.time_commitment.trim().to_string(),
        category,
        image_url: image.image_url.to_string(),
        image_hint: image.image_hint.to_string(),
    })
}
