//! CropSense Rust SDK
//!
//! Validates a form, posts it to the recommendation API and reports the
//! result through the notification channel.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cropsense_forms::{FieldValue, FormSchema, MemorySurface, NotificationCenter};
//! use cropsense_sdk::{HttpTransport, SubmitAttempt, Submitter, SubmitterConfig};
//!
//! #[tokio::main]
//! async fn main() -> cropsense_sdk::Result<()> {
//!     let config = SubmitterConfig::default();
//!     let transport = HttpTransport::new(&config)?;
//!     let notifications = NotificationCenter::new(Arc::new(MemorySurface::new()));
//!     let submitter = Submitter::new(
//!         config,
//!         FormSchema::crop_recommendation(),
//!         Arc::new(transport),
//!         notifications,
//!     );
//!
//!     let fields = vec![FieldValue::new("ph", "6.5")];
//!     if let SubmitAttempt::Submitted(outcome) = submitter.submit(&fields).await {
//!         println!("success: {}", outcome.success);
//!     }
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use thiserror::Error;

pub mod button;
pub mod outcome;
pub mod submitter;
pub mod transport;

pub use button::{ButtonState, Press, SubmitButton};
pub use outcome::{CropData, CropScore, Recommendation, SubmissionOutcome};
pub use submitter::{SubmitAttempt, SubmitPolicy, Submitter, SubmitterConfig};
pub use transport::{HttpTransport, Transport, TransportError};

/// SDK version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Recommendation endpoint
pub const DEFAULT_ENDPOINT: &str = "/api/predict";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Result type alias for SDK setup operations
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Error Types
// =============================================================================

/// Errors raised while building a client. Submissions never return these.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
