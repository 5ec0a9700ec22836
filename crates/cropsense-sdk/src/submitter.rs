//! Form submission pipeline
//!
//! validate → serialize → POST → interpret → notify.
//!
//! Within one attempt validation always finishes before the request starts
//! and the outcome notification always follows the response. In-flight
//! requests cannot be cancelled.

use std::sync::Arc;
use std::time::Duration;

use cropsense_forms::{
    form_body, validate, FieldAnnotations, FieldValue, FormSchema, FormsError, NotificationCenter,
    NotificationKind, ValidationResult,
};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::button::SubmitButton;
use crate::outcome::SubmissionOutcome;
use crate::transport::Transport;
use crate::{DEFAULT_BASE_URL, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};

pub const FIX_ERRORS_MESSAGE: &str = "Please fix the errors in the form";
pub const PROCESSING_MESSAGE: &str = "Processing your request...";
pub const SUCCESS_MESSAGE: &str = "Recommendation generated successfully!";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// How concurrent submissions are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitPolicy {
    /// Every valid attempt is sent; the notification slot shows the latest.
    #[default]
    Overlapping,
    /// A valid attempt made while another is in flight is dropped.
    Exclusive,
}

/// Configuration for the submitter and its HTTP transport
#[derive(Debug, Clone)]
pub struct SubmitterConfig {
    pub base_url: String,
    pub endpoint: String,
    pub timeout: Duration,
    pub policy: SubmitPolicy,
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            policy: SubmitPolicy::default(),
        }
    }
}

/// What happened to one submit attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitAttempt {
    /// Blocked by validation; nothing was sent.
    Rejected {
        validation: ValidationResult,
        /// Field to bring into view
        focus: Option<String>,
    },
    /// Dropped under [`SubmitPolicy::Exclusive`] while another request runs.
    InFlight,
    Submitted(SubmissionOutcome),
}

impl SubmitAttempt {
    pub fn outcome(&self) -> Option<&SubmissionOutcome> {
        match self {
            SubmitAttempt::Submitted(outcome) => Some(outcome),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct Submitter {
    config: SubmitterConfig,
    schema: FormSchema,
    transport: Arc<dyn Transport>,
    notifications: NotificationCenter,
    button: SubmitButton,
    annotations: Arc<Mutex<FieldAnnotations>>,
    in_flight: Arc<tokio::sync::Mutex<()>>,
}

impl Submitter {
    pub fn new(
        config: SubmitterConfig,
        schema: FormSchema,
        transport: Arc<dyn Transport>,
        notifications: NotificationCenter,
    ) -> Self {
        Self {
            config,
            schema,
            transport,
            notifications,
            button: SubmitButton::new(),
            annotations: Arc::new(Mutex::new(FieldAnnotations::new())),
            in_flight: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    pub fn config(&self) -> &SubmitterConfig {
        &self.config
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn button(&self) -> &SubmitButton {
        &self.button
    }

    /// Snapshot of the inline field errors.
    pub fn annotations(&self) -> FieldAnnotations {
        self.annotations.lock().clone()
    }

    /// Focus-loss handler for `field`. Returns the field's inline error.
    pub fn blur(&self, field: &str, raw: &str) -> Result<Option<String>, FormsError> {
        let constraint = self.schema.get(field)?;
        let mut annotations = self.annotations.lock();
        Ok(annotations.on_blur(constraint, raw).map(String::from))
    }

    /// Handles one submit attempt. Never fails; every error is turned into
    /// a notification and an outcome.
    pub async fn submit(&self, fields: &[FieldValue]) -> SubmitAttempt {
        let validation = validate(fields, self.schema.fields());
        let focus = {
            let mut annotations = self.annotations.lock();
            annotations.apply(&validation, self.schema.fields());
            annotations.first_error(self.schema.fields()).map(String::from)
        };

        if !validation.is_valid() {
            warn!(
                errors = validation.errors().len(),
                focus = focus.as_deref().unwrap_or(""),
                "submission blocked by validation"
            );
            self.notifications
                .notify(FIX_ERRORS_MESSAGE, NotificationKind::Error);
            return SubmitAttempt::Rejected { validation, focus };
        }

        let _guard = match self.config.policy {
            SubmitPolicy::Overlapping => None,
            SubmitPolicy::Exclusive => match Arc::clone(&self.in_flight).try_lock_owned() {
                Ok(guard) => Some(guard),
                Err(_) => {
                    debug!("submission dropped, another request is in flight");
                    return SubmitAttempt::InFlight;
                }
            },
        };

        let press = self.button.press();
        let outcome = self.send(fields).await;
        self.button.release(press);

        SubmitAttempt::Submitted(outcome)
    }

    async fn send(&self, fields: &[FieldValue]) -> SubmissionOutcome {
        self.notifications
            .notify(PROCESSING_MESSAGE, NotificationKind::Info);

        let body = form_body(fields);
        info!(endpoint = %self.config.endpoint, fields = fields.len(), "submitting form");

        let response = self
            .transport
            .post_json(&self.config.endpoint, &body)
            .await
            .and_then(SubmissionOutcome::from_response);

        match response {
            Ok(outcome) if outcome.success => {
                info!("submission succeeded");
                self.notifications
                    .notify(SUCCESS_MESSAGE, NotificationKind::Success);
                outcome
            }
            Ok(outcome) => {
                let error = outcome.error.as_deref().unwrap_or_default();
                warn!(error, "submission rejected by server");
                self.notifications
                    .notify(format!("Error: {}", error), NotificationKind::Error);
                outcome
            }
            Err(e) => {
                warn!(error = %e, "submission failed");
                self.notifications
                    .notify(NETWORK_ERROR_MESSAGE, NotificationKind::Error);
                SubmissionOutcome::network_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use async_trait::async_trait;
    use cropsense_forms::{FieldConstraint, MemorySurface};
    use serde_json::{json, Value};

    /// Records every request and replies with a canned result.
    struct ScriptedTransport {
        reply: std::result::Result<Value, TransportError>,
        requests: Mutex<Vec<(String, Value)>>,
    }

    impl ScriptedTransport {
        fn new(reply: std::result::Result<Value, TransportError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<(String, Value)> {
            self.requests.lock().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn post_json(
            &self,
            path: &str,
            body: &Value,
        ) -> std::result::Result<Value, TransportError> {
            self.requests.lock().push((path.to_string(), body.clone()));
            tokio::task::yield_now().await;
            self.reply.clone()
        }
    }

    fn ph_schema() -> FormSchema {
        FormSchema::new(vec![FieldConstraint::number("ph").required().range(0.0, 14.0)]).unwrap()
    }

    fn submitter(
        transport: Arc<ScriptedTransport>,
        policy: SubmitPolicy,
    ) -> (Submitter, Arc<MemorySurface>) {
        let surface = Arc::new(MemorySurface::new());
        let config = SubmitterConfig {
            policy,
            ..Default::default()
        };
        let submitter = Submitter::new(
            config,
            ph_schema(),
            transport,
            NotificationCenter::new(surface.clone()),
        );
        (submitter, surface)
    }

    fn last_message(surface: &MemorySurface) -> (String, NotificationKind) {
        let elements = surface.elements();
        assert_eq!(elements.len(), 1);
        (elements[0].message.clone(), elements[0].kind)
    }

    #[tokio::test]
    async fn test_valid_submission_posts_once() {
        let transport = ScriptedTransport::new(Ok(json!({"success": true, "yield": 42})));
        let (submitter, surface) = submitter(transport.clone(), SubmitPolicy::Overlapping);

        let attempt = submitter.submit(&[FieldValue::new("ph", "7")]).await;

        assert_eq!(
            attempt,
            SubmitAttempt::Submitted(SubmissionOutcome::succeeded(json!({"yield": 42})))
        );
        assert_eq!(
            transport.requests(),
            vec![("/api/predict".to_string(), json!({"ph": "7"}))]
        );
        assert_eq!(
            last_message(&surface),
            (SUCCESS_MESSAGE.to_string(), NotificationKind::Success)
        );
    }

    #[tokio::test]
    async fn test_invalid_submission_is_blocked() {
        let transport = ScriptedTransport::new(Ok(json!({"success": true})));
        let (submitter, surface) = submitter(transport.clone(), SubmitPolicy::Overlapping);

        let attempt = submitter.submit(&[FieldValue::new("ph", "")]).await;

        match attempt {
            SubmitAttempt::Rejected { validation, focus } => {
                assert_eq!(validation.error("ph"), Some("This field is required"));
                assert_eq!(focus.as_deref(), Some("ph"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert!(transport.requests().is_empty());
        assert_eq!(
            last_message(&surface),
            (FIX_ERRORS_MESSAGE.to_string(), NotificationKind::Error)
        );
        assert_eq!(
            submitter.annotations().message("ph"),
            Some("This field is required")
        );
    }

    #[tokio::test]
    async fn test_repeated_field_is_validated_as_sent() {
        let transport = ScriptedTransport::new(Ok(json!({"success": true})));
        let (submitter, _surface) = submitter(transport.clone(), SubmitPolicy::Overlapping);

        let attempt = submitter
            .submit(&[FieldValue::new("ph", "7"), FieldValue::new("ph", "99")])
            .await;
        assert!(matches!(attempt, SubmitAttempt::Rejected { .. }));
        assert!(transport.requests().is_empty());

        submitter
            .submit(&[FieldValue::new("ph", "99"), FieldValue::new("ph", "7")])
            .await;
        assert_eq!(
            transport.requests(),
            vec![("/api/predict".to_string(), json!({"ph": "7"}))]
        );
    }

    #[tokio::test]
    async fn test_network_failure_is_contained() {
        let transport =
            ScriptedTransport::new(Err(TransportError::Network("connection refused".into())));
        let (submitter, surface) = submitter(transport, SubmitPolicy::Overlapping);

        let attempt = submitter.submit(&[FieldValue::new("ph", "7")]).await;

        assert_eq!(
            attempt.outcome(),
            Some(&SubmissionOutcome::failed("Network error"))
        );
        assert_eq!(
            last_message(&surface),
            (NETWORK_ERROR_MESSAGE.to_string(), NotificationKind::Error)
        );
    }

    #[tokio::test]
    async fn test_malformed_response_counts_as_network_error() {
        let transport = ScriptedTransport::new(Ok(json!({"status": "ok"})));
        let (submitter, _surface) = submitter(transport, SubmitPolicy::Overlapping);

        let attempt = submitter.submit(&[FieldValue::new("ph", "7")]).await;
        assert_eq!(attempt.outcome(), Some(&SubmissionOutcome::network_error()));
    }

    #[tokio::test]
    async fn test_application_error_is_notified() {
        let transport =
            ScriptedTransport::new(Ok(json!({"success": false, "error": "model unavailable"})));
        let (submitter, surface) = submitter(transport, SubmitPolicy::Overlapping);

        let attempt = submitter.submit(&[FieldValue::new("ph", "7")]).await;

        assert_eq!(
            attempt.outcome(),
            Some(&SubmissionOutcome::failed("model unavailable"))
        );
        assert_eq!(
            last_message(&surface),
            ("Error: model unavailable".to_string(), NotificationKind::Error)
        );
    }

    #[tokio::test]
    async fn test_resubmit_clears_stale_annotations() {
        let transport = ScriptedTransport::new(Ok(json!({"success": true})));
        let (submitter, _surface) = submitter(transport, SubmitPolicy::Overlapping);

        submitter.submit(&[FieldValue::new("ph", "20")]).await;
        assert_eq!(
            submitter.annotations().message("ph"),
            Some("pH must be between 0 and 14")
        );

        submitter.submit(&[FieldValue::new("ph", "6")]).await;
        assert!(submitter.annotations().is_empty());
    }

    #[tokio::test]
    async fn test_blur_uses_schema() {
        let transport = ScriptedTransport::new(Ok(json!({"success": true})));
        let (submitter, _surface) = submitter(transport, SubmitPolicy::Overlapping);

        assert_eq!(
            submitter.blur("ph", "").unwrap().as_deref(),
            Some("This field is required")
        );
        assert_eq!(submitter.blur("ph", "99").unwrap(), None);
        assert!(matches!(
            submitter.blur("nitrogen", "1"),
            Err(FormsError::UnknownField(_))
        ));
    }

    #[tokio::test]
    async fn test_overlapping_submissions_both_send() {
        let transport = ScriptedTransport::new(Ok(json!({"success": true})));
        let (submitter, surface) = submitter(transport.clone(), SubmitPolicy::Overlapping);
        let fields = [FieldValue::new("ph", "7")];

        let (first, second) = tokio::join!(submitter.submit(&fields), submitter.submit(&fields));

        assert!(first.outcome().is_some());
        assert!(second.outcome().is_some());
        assert_eq!(transport.requests().len(), 2);
        assert_eq!(surface.len(), 1);
    }

    #[tokio::test]
    async fn test_exclusive_policy_drops_concurrent_attempt() {
        let transport = ScriptedTransport::new(Ok(json!({"success": true})));
        let (submitter, _surface) = submitter(transport.clone(), SubmitPolicy::Exclusive);
        let fields = [FieldValue::new("ph", "7")];

        let (first, second) = tokio::join!(submitter.submit(&fields), submitter.submit(&fields));

        assert!(first.outcome().is_some());
        assert_eq!(second, SubmitAttempt::InFlight);
        assert_eq!(transport.requests().len(), 1);

        let third = submitter.submit(&fields).await;
        assert!(third.outcome().is_some());
    }

    #[tokio::test]
    async fn test_button_returns_to_idle() {
        let transport = ScriptedTransport::new(Ok(json!({"success": true})));
        let (submitter, _surface) = submitter(transport, SubmitPolicy::Overlapping);

        submitter.submit(&[FieldValue::new("ph", "7")]).await;
        assert_eq!(submitter.button().state(), crate::ButtonState::Idle);
    }
}
