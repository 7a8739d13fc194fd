//! Input validation helpers shared by the HTTP DTOs.

pub mod flexible;

use std::sync::LazyLock;

use regex::Regex;
use validator::{ValidationError, ValidationErrors};

use super::FieldError;

/// 24h clock time with two-digit hours, e.g. `09:30` or `21:05`.
static CLOCK_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("valid regex"));

pub fn is_clock_time(value: &str) -> bool {
    CLOCK_TIME.is_match(value)
}

/// `validator` hook for `HH:MM` fields.
pub fn validate_clock_time(value: &str) -> Result<(), ValidationError> {
    if is_clock_time(value) {
        Ok(())
    } else {
        Err(failure("clock_time", "must be a time in HH:MM format"))
    }
}

/// `validator` hook rejecting strings that are empty after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(failure("required", "is required"))
    } else {
        Ok(())
    }
}

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Flatten `validator` errors into the wire format, keyed by camelCase field name.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            let field = to_camel_case(&field.to_string());
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("is invalid ({})", e.code));
                FieldError::new(field.clone(), message)
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

pub fn to_camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
