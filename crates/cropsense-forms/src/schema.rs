//! Form schema value objects

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

use crate::{FormsError, Result};

/// Input kind of a field
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Number,
}

/// Domain-specific rule layered on top of the generic bounds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainRule {
    /// Soil pH, inclusive 0..=14
    PhRange,
}

impl DomainRule {
    /// Rule implied by a field's name, if any.
    pub fn for_field(name: &str) -> Option<Self> {
        match name {
            "ph" => Some(DomainRule::PhRange),
            _ => None,
        }
    }

    /// Returns the violation message for `value`, if the rule fails.
    ///
    /// NaN never violates a rule.
    pub fn check(&self, value: f64) -> Option<&'static str> {
        match self {
            DomainRule::PhRange => {
                if value < 0.0 || value > 14.0 {
                    Some("pH must be between 0 and 14")
                } else {
                    None
                }
            }
        }
    }
}

/// Declared constraint for a single form field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldConstraint {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_rule: Option<DomainRule>,
}

impl FieldConstraint {
    pub fn text(name: impl Into<String>) -> Self {
        Self::with_kind(name.into(), FieldKind::Text)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::with_kind(name.into(), FieldKind::Number)
    }

    fn with_kind(name: String, kind: FieldKind) -> Self {
        Self {
            domain_rule: DomainRule::for_field(&name),
            name,
            required: false,
            kind,
            min: None,
            max: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn range(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    pub fn domain_rule(mut self, rule: DomainRule) -> Self {
        self.domain_rule = Some(rule);
        self
    }

    /// The declared domain rule, or the one implied by the field name.
    pub fn effective_domain_rule(&self) -> Option<DomainRule> {
        self.domain_rule.or_else(|| DomainRule::for_field(&self.name))
    }
}

/// Raw field value captured at submit time
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub name: String,
    pub raw: String,
}

impl FieldValue {
    pub fn new(name: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw: raw.into(),
        }
    }
}

impl FromStr for FieldValue {
    type Err = FormsError;

    /// Parses `name=value`. The value may be empty; the name may not.
    fn from_str(spec: &str) -> Result<Self> {
        match spec.split_once('=') {
            Some((name, raw)) if !name.trim().is_empty() => Ok(Self::new(name.trim(), raw)),
            _ => Err(FormsError::InvalidFieldSpec(spec.to_string())),
        }
    }
}

/// JSON request body: an object of field name to raw value.
///
/// A repeated name keeps its last value.
pub fn form_body(fields: &[FieldValue]) -> serde_json::Value {
    let body = fields
        .iter()
        .map(|f| (f.name.clone(), serde_json::Value::String(f.raw.clone())))
        .collect::<serde_json::Map<_, _>>();
    serde_json::Value::Object(body)
}

/// Ordered set of field constraints for one form
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    fields: Vec<FieldConstraint>,
}

impl FormSchema {
    pub fn new(fields: Vec<FieldConstraint>) -> Result<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if field.name.trim().is_empty() {
                return Err(FormsError::InvalidSchema("field name cannot be empty".into()));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(FormsError::InvalidSchema(format!(
                    "duplicate field `{}`",
                    field.name
                )));
            }
        }
        Ok(Self { fields })
    }

    /// Loads a schema from a JSON document `{"fields": [...]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: FormSchema =
            serde_json::from_str(json).map_err(|e| FormsError::InvalidSchema(e.to_string()))?;
        Self::new(raw.fields)
    }

    /// The seven soil and climate inputs of the recommendation form.
    pub fn crop_recommendation() -> Self {
        Self {
            fields: vec![
                FieldConstraint::number("nitrogen").required().min(0.0),
                FieldConstraint::number("phosphorus").required().min(0.0),
                FieldConstraint::number("potassium").required().min(0.0),
                FieldConstraint::number("temperature").required(),
                FieldConstraint::number("humidity").required().range(0.0, 100.0),
                FieldConstraint::number("ph").required().range(0.0, 14.0),
                FieldConstraint::number("rainfall").required().min(0.0),
            ],
        }
    }

    pub fn fields(&self) -> &[FieldConstraint] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Result<&FieldConstraint> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| FormsError::UnknownField(name.to_string()))
    }
}
