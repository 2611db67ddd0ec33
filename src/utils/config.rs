//! Client configuration: where the processing service lives and how patient to be with it.

use std::time::Duration;
use serde::{Deserialize, Serialize};
use reqwest::Url;
use crate::utils::{StudioError, StudioResult, MAX_FILE_SIZE};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";
pub const ENDPOINT_ENV: &str = "FILTER_STUDIO_ENDPOINT";
pub const TIMEOUT_ENV: &str = "FILTER_STUDIO_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Base URL of the processing service
    pub endpoint: String,
    /// Whole-request timeout for uploads and fetches
    pub request_timeout_secs: u64,
    /// Largest file the ingestion step accepts
    pub max_upload_bytes: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: 60,
            max_upload_bytes: MAX_FILE_SIZE,
        }
    }
}

impl ClientConfig {
    /// Applies `FILTER_STUDIO_*` overrides read through `lookup`.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn overlay_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
            self.endpoint = endpoint.trim().to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.request_timeout_secs = secs,
                _ => tracing::warn!("Ignoring invalid {}: {:?}", TIMEOUT_ENV, raw),
            }
        }

        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parses and checks the endpoint: it must be an absolute http(s) URL.
    pub fn endpoint_url(&self) -> StudioResult<Url> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| StudioError::config(format!("Invalid endpoint '{}': {}", self.endpoint, e)))?;

        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(StudioError::config(format!(
                "Endpoint must be an http(s) URL: {}",
                self.endpoint
            )));
        }

        Ok(url)
    }
}
