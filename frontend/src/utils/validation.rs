//! Client-side form rules. Failures are reported per field and never reach
//! the backend.

use chrono::NaiveDate;
use std::{borrow::Cow, collections::BTreeMap};
use validator::{Validate, ValidationError, ValidationErrors};

pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

/// First message per offending field, keyed by the payload field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
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

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, list) in errors.field_errors() {
            if let Some(first) = list.first() {
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                fields.insert(field.to_string(), message);
            }
        }
        fields
    }
}

/// Runs the derived rules and merges them with checks done while building the
/// payload (required selects, parsed dates).
pub fn validate_payload<T: Validate>(payload: T, mut pre: FieldErrors) -> Result<T, FieldErrors> {
    if let Err(errors) = payload.validate() {
        for (field, message) in FieldErrors::from(errors).0 {
            pre.insert(field, message);
        }
    }
    pre.into_result().map(|_| payload)
}

pub fn alphanumeric(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("alphanumeric").with_message(Cow::Borrowed(
            "Password must contain only letters and numbers",
        )))
    }
}

pub fn one_of_genders(value: &str) -> Result<(), ValidationError> {
    if GENDERS.contains(&value) {
        Ok(())
    } else if value.is_empty() {
        Err(ValidationError::new("required").with_message(Cow::Borrowed("Gender is required")))
    } else {
        Err(ValidationError::new("gender").with_message(Cow::Borrowed("Invalid gender")))
    }
}

pub fn require(
    errors: &mut FieldErrors,
    field: &str,
    value: &str,
    message: &str,
) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.insert(field, message);
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn require_date(errors: &mut FieldErrors, field: &str, value: &str, label: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.insert(field, format!("{} is required", label));
        return None;
    }
    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.insert(field, format!("{} must be a valid date", label));
            None
        }
    }
}

pub fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
