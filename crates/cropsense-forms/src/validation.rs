//! Field validation
//!
//! Rules run per field with no cross-field checks:
//! 1. required and blank
//! 2. numeric `min` / `max`
//! 3. domain rule (pH range)
//!
//! A required-and-blank field stops at rule 1. Otherwise every rule runs and
//! the last one to fire sets the field's message.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::{FieldConstraint, FieldKind, FieldValue};

pub const REQUIRED_MESSAGE: &str = "This field is required";

/// Outcome of validating one submission attempt
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: BTreeMap<String, String>,
    first_invalid: Option<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// First failing field in declaration order.
    pub fn first_invalid(&self) -> Option<&str> {
        self.first_invalid.as_deref()
    }

    fn record(&mut self, field: &str, message: String) {
        if self.first_invalid.is_none() {
            self.first_invalid = Some(field.to_string());
        }
        self.errors.insert(field.to_string(), message);
    }
}

/// Validates `fields` against `constraints`.
///
/// A constraint without a matching value is checked as an empty string.
/// A repeated name is checked with its last value, the one [`form_body`]
/// sends. Values with no constraint are ignored.
///
/// [`form_body`]: crate::schema::form_body
pub fn validate(fields: &[FieldValue], constraints: &[FieldConstraint]) -> ValidationResult {
    let mut result = ValidationResult::default();

    for constraint in constraints {
        let raw = fields
            .iter()
            .rfind(|f| f.name == constraint.name)
            .map(|f| f.raw.as_str())
            .unwrap_or("");

        if let Some(message) = check_field(constraint, raw) {
            result.record(&constraint.name, message);
        }
    }

    result
}

/// Only the required rule; used on blur.
pub fn check_required(constraint: &FieldConstraint, raw: &str) -> Option<&'static str> {
    if constraint.required && raw.trim().is_empty() {
        Some(REQUIRED_MESSAGE)
    } else {
        None
    }
}

fn check_field(constraint: &FieldConstraint, raw: &str) -> Option<String> {
    if let Some(message) = check_required(constraint, raw) {
        return Some(message.to_string());
    }
    if raw.trim().is_empty() {
        return None;
    }

    let value = parse_number(raw);
    let mut message = None;

    if constraint.kind == FieldKind::Number {
        if let Some(min) = constraint.min {
            if value < min {
                message = Some(format!("Value must be at least {min}"));
            }
        }
        if let Some(max) = constraint.max {
            if value > max {
                message = Some(format!("Value must be at most {max}"));
            }
        }
    }

    if let Some(rule) = constraint.effective_domain_rule() {
        if let Some(violation) = rule.check(value) {
            message = Some(violation.to_string());
        }
    }

    message
}

/// Browser `parseFloat`: the longest numeric prefix after leading
/// whitespace. Only `Infinity` spells infinity. Input without a numeric
/// prefix becomes NaN so that no comparison fires.
fn parse_number(raw: &str) -> f64 {
    let s = raw.trim_start();
    let digits = |from: usize| s[from..].bytes().take_while(u8::is_ascii_digit).count();

    let mut end = usize::from(s.starts_with(['+', '-']));
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_digits = digits(end);
    end += int_digits;
    let mut frac_digits = 0;
    if s[end..].starts_with('.') {
        frac_digits = digits(end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return f64::NAN;
    }

    if s[end..].starts_with(['e', 'E']) {
        let sign = usize::from(s[end + 1..].starts_with(['+', '-']));
        let exp_digits = digits(end + 1 + sign);
        if exp_digits > 0 {
            end += 1 + sign + exp_digits;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}
