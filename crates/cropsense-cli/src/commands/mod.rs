//! CLI Commands

pub mod config;
pub mod recommend;
pub mod schema;
pub mod validate;

use std::time::Duration;

use cropsense_forms::{FieldValue, FormSchema};
use cropsense_sdk::{SubmitPolicy, SubmitterConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

use crate::output::OutputFormat;
use crate::Cli;

/// Effective settings: command line first, then config file, then defaults.
pub struct Settings {
    pub api_url: String,
    pub format: OutputFormat,
    pub schema_path: Option<String>,
    pub timeout: Duration,
    pub exclusive: bool,
}

impl Settings {
    pub fn resolve(cli: &Cli, config: &crate::config::Config) -> Self {
        let format = match (cli.format, config.default_format.as_deref()) {
            (Some(format), _) => format,
            (None, Some(name)) => OutputFormat::parse(name).unwrap_or_else(|e| {
                tracing::warn!("{}", e);
                OutputFormat::default()
            }),
            (None, None) => OutputFormat::default(),
        };

        Self {
            api_url: cli
                .api_url
                .clone()
                .or_else(|| config.api_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            format,
            schema_path: cli.schema.clone().or_else(|| config.schema.clone()),
            timeout: config
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            exclusive: config.exclusive.unwrap_or(false),
        }
    }

    pub fn schema(&self) -> Result<FormSchema, String> {
        match &self.schema_path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| format!("Cannot read schema {}: {}", path, e))?;
                FormSchema::from_json(&content).map_err(|e| e.to_string())
            }
            None => Ok(FormSchema::crop_recommendation()),
        }
    }

    pub fn submitter_config(&self, timeout: Option<u64>, exclusive: bool) -> SubmitterConfig {
        SubmitterConfig {
            base_url: self.api_url.clone(),
            timeout: timeout.map(Duration::from_secs).unwrap_or(self.timeout),
            policy: if exclusive || self.exclusive {
                SubmitPolicy::Exclusive
            } else {
                SubmitPolicy::Overlapping
            },
            ..Default::default()
        }
    }
}

/// Parses repeated `name=value` arguments.
pub fn parse_fields(specs: &[String]) -> Result<Vec<FieldValue>, String> {
    specs
        .iter()
        .map(|spec| spec.parse::<FieldValue>().map_err(|e| e.to_string()))
        .collect()
}
