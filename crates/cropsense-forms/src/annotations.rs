//! Inline field error annotations
//!
//! Mirrors the error element shown under each input. Every field has at
//! most one annotation: highlighting always clears the previous one first.

use std::collections::HashMap;

use crate::schema::FieldConstraint;
use crate::validation::{check_required, ValidationResult};

#[derive(Clone, Debug, Default)]
pub struct FieldAnnotations {
    messages: HashMap<String, String>,
}

impl FieldAnnotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the field's annotation with `message`.
    pub fn highlight(&mut self, field: &str, message: impl Into<String>) {
        self.clear(field);
        self.messages.insert(field.to_string(), message.into());
    }

    /// Removes the field's annotation, returning it.
    pub fn clear(&mut self, field: &str) -> Option<String> {
        self.messages.remove(field)
    }

    pub fn message(&self, field: &str) -> Option<&str> {
        self.messages.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Syncs annotations for every constraint with a submit-time result.
    pub fn apply(&mut self, result: &ValidationResult, constraints: &[FieldConstraint]) {
        for constraint in constraints {
            match result.error(&constraint.name) {
                Some(message) => self.highlight(&constraint.name, message),
                None => {
                    self.clear(&constraint.name);
                }
            }
        }
    }

    /// Focus-loss re-validation. Only the required rule is checked here;
    /// numeric and domain rules wait for the next submit. Optional fields
    /// are left untouched.
    ///
    /// Returns the field's annotation after the check.
    pub fn on_blur(&mut self, constraint: &FieldConstraint, raw: &str) -> Option<&str> {
        if !constraint.required {
            return self.message(&constraint.name);
        }
        match check_required(constraint, raw) {
            Some(message) => self.highlight(&constraint.name, message),
            None => {
                self.clear(&constraint.name);
            }
        }
        self.message(&constraint.name)
    }

    /// First annotated field in declaration order.
    pub fn first_error<'a>(&self, constraints: &'a [FieldConstraint]) -> Option<&'a str> {
        constraints
            .iter()
            .map(|c| c.name.as_str())
            .find(|name| self.messages.contains_key(*name))
    }
}
