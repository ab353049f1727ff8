//! Whole-form checks that report every failing field at once.

use chrono::{DateTime, Utc};
use serde::Serialize;

use clubhub_core::DomainError;

use crate::ValidationGate;

/// A field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl From<FieldError> for DomainError {
    fn from(err: FieldError) -> Self {
        DomainError::validation(format!("{}: {}", err.field, err.message))
    }
}

/// Registration form for a new member account.
pub fn validate_new_user(
    gate: &ValidationGate,
    email: &str,
    student_id: &str,
    password: &str,
    full_name: &str,
) -> Result<(), Vec<FieldError>> {
    let limits = gate.limits();
    let mut errors = Vec::new();

    if !gate.is_valid_email(email) {
        errors.push(FieldError::new("email", "must be a valid email address"));
    }
    if !gate.is_valid_student_id(student_id) {
        errors.push(FieldError::new(
            "student_id",
            format!(
                "must be {} to {} digits",
                limits.min_student_id_digits, limits.max_student_id_digits
            ),
        ));
    }
    if !gate.is_valid_password(password) {
        errors.push(FieldError::new(
            "password",
            format!(
                "must be at least {} characters with upper and lower case letters, a digit and a symbol",
                limits.min_password_len
            ),
        ));
    }
    if !gate.is_valid_full_name(full_name) {
        errors.push(FieldError::new(
            "full_name",
            format!(
                "must be {} to {} letters, spaces, hyphens or apostrophes",
                limits.min_full_name_len, limits.max_full_name_len
            ),
        ));
    }

    finish(errors)
}

/// Creation form for a new event.
pub fn validate_new_event(
    gate: &ValidationGate,
    name: &str,
    description: &str,
    event_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), Vec<FieldError>> {
    let limits = gate.limits();
    let mut errors = Vec::new();

    if !gate.is_valid_event_name(name) {
        errors.push(FieldError::new(
            "name",
            format!(
                "must be {} to {} characters",
                limits.min_event_name_len, limits.max_event_name_len
            ),
        ));
    }
    if !gate.is_valid_description(description) {
        errors.push(FieldError::new(
            "description",
            format!(
                "must be {} to {} characters",
                limits.min_description_len, limits.max_description_len
            ),
        ));
    }
    if !gate.is_valid_event_date_at(event_date, now) {
        errors.push(FieldError::new(
            "event_date",
            format!(
                "must be at least {} minutes from now",
                limits.event_lead_minutes
            ),
        ));
    }

    finish(errors)
}

fn finish(errors: Vec<FieldError>) -> Result<(), Vec<FieldError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(fields = ?errors.iter().map(|e| e.field).collect::<Vec<_>>(), "form rejected");
        Err(errors)
    }
}
