//! Submission outcomes and the recommendation payload

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::transport::TransportError;

/// Error text for a failed or undecodable request
pub const NETWORK_ERROR: &str = "Network error";

/// Result of one submission; superseded by the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmissionOutcome {
    pub fn succeeded(payload: Value) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: None,
            error: Some(error.into()),
        }
    }

    /// Synthesized outcome for transport failures.
    pub fn network_error() -> Self {
        Self::failed(NETWORK_ERROR)
    }

    /// Interprets an API response body.
    ///
    /// The body must be an object with a boolean `success`. On success the
    /// payload is the body minus `success`; on failure the `error` string is
    /// kept.
    pub fn from_response(body: Value) -> Result<Self, TransportError> {
        let Value::Object(mut body) = body else {
            return Err(TransportError::Decode(
                "response body is not a JSON object".into(),
            ));
        };

        let success = match body.remove("success") {
            Some(Value::Bool(success)) => success,
            _ => {
                return Err(TransportError::Decode(
                    "response has no boolean `success` field".into(),
                ))
            }
        };

        if success {
            return Ok(Self::succeeded(Value::Object(body)));
        }

        let error = match body.remove("error") {
            Some(Value::String(message)) => message,
            Some(Value::Null) | None => "Unknown error".to_string(),
            Some(other) => other.to_string(),
        };
        Ok(Self::failed(error))
    }

    /// Typed view of a successful recommendation payload.
    pub fn recommendation(&self) -> Option<Recommendation> {
        let payload = self.payload.as_ref()?;
        serde_json::from_value(payload.clone()).ok()
    }
}

/// Payload returned by the recommendation endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommended_crop: String,
    #[serde(default)]
    pub crop_data: Option<CropData>,
    #[serde(default)]
    pub top_crops: Vec<CropScore>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph_range: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropScore {
    pub name: String,
    /// Percentage, 0..=100
    pub probability: f64,
}
