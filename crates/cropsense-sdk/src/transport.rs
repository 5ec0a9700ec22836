//! HTTP transport
//!
//! The one suspension point of a submission is [`Transport::post_json`].

use async_trait::async_trait;
use reqwest::header;
use tracing::debug;
use url::Url;

use crate::submitter::SubmitterConfig;
use crate::{Error, Result, VERSION};

/// Failure to obtain a decodable response
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_decode() {
            TransportError::Decode(e.to_string())
        } else {
            TransportError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        TransportError::Decode(e.to_string())
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs `body` as JSON to `path` and returns the decoded response body.
    ///
    /// The status code is not inspected; the body decides success.
    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> std::result::Result<serde_json::Value, TransportError>;
}

/// `reqwest` backed transport
#[derive(Clone, Debug)]
pub struct HttpTransport {
    base_url: String,
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &SubmitterConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&format!("cropsense-rust/{}", VERSION))
                .map_err(|e| Error::Config(e.to_string()))?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, path: &str) -> std::result::Result<Url, TransportError> {
        Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> std::result::Result<serde_json::Value, TransportError> {
        let url = self.endpoint_url(path)?;
        debug!(%url, "POST");

        let response = self.http.post(url).json(body).send().await?;
        let status = response.status();
        let body_bytes = response.bytes().await?;
        debug!(status = status.as_u16(), bytes = body_bytes.len(), "response received");

        Ok(serde_json::from_slice(&body_bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_base_url() {
        let config = SubmitterConfig {
            base_url: "not a url".into(),
            ..Default::default()
        };
        assert!(matches!(HttpTransport::new(&config), Err(Error::Url(_))));
    }

    #[test]
    fn test_endpoint_url_joins_path() {
        let config = SubmitterConfig {
            base_url: "http://localhost:5000/".into(),
            ..Default::default()
        };
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:5000");
        assert_eq!(
            transport.endpoint_url("/api/predict").unwrap().as_str(),
            "http://localhost:5000/api/predict"
        );
    }
}
