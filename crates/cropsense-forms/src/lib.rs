//! CropSense form handling
//!
//! Client-side form logic for the crop recommendation tool.
//!
//! ## Features
//! - Declarative field constraints and the built-in crop schema
//! - Field validation (required, numeric bounds, pH range)
//! - Inline error annotations with blur re-validation
//! - Single-slot notification channel with a timed lifecycle

use thiserror::Error;

pub mod annotations;
pub mod notification;
pub mod schema;
pub mod validation;

pub use annotations::FieldAnnotations;
pub use notification::{
    MemorySurface, Notification, NotificationCenter, NotificationKind, NotificationPhase,
    NotificationSurface, NotificationTiming,
};
pub use schema::{form_body, DomainRule, FieldConstraint, FieldKind, FieldValue, FormSchema};
pub use validation::{validate, ValidationResult};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormsError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid field spec `{0}`, expected name=value")]
    InvalidFieldSpec(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
}

pub type Result<T> = std::result::Result<T, FormsError>;
