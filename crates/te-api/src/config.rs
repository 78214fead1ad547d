// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::ApiError;
use crate::retry::{RetryPolicy, DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS};
use crate::DEFAULT_API_URL;
use reqwest::Url;
use std::env;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport settings for [`crate::ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme and host of the API, e.g. `https://api.thousandeyes.com`
    pub base_url: String,
    /// Timeout applied to each individual request
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ApiError> {
        // TE_API_URL is mostly used to point the examples at a local mock
        let base_url = env::var("TE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout = env::var("TE_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        let max_attempts = env::var("TE_RETRY_MAX_ATTEMPTS")
            .ok()
            .and_then(|val| val.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_ATTEMPTS);
        let backoff = env::var("TE_RETRY_BACKOFF_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_BACKOFF);

        let config = Self {
            base_url,
            timeout,
            retry: RetryPolicy::new(max_attempts, backoff),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.base_url.trim().is_empty() {
            return Err(ApiError::InvalidConfig(
                "TE_API_URL cannot be empty".to_string(),
            ));
        }
        Url::parse(&self.base_url).map_err(|e| {
            ApiError::InvalidConfig(format!("invalid base url '{}': {e}", self.base_url))
        })?;
        if self.retry.max_attempts == 0 {
            return Err(ApiError::InvalidConfig(
                "retry policy needs at least one attempt".to_string(),
            ));
        }
        Ok(())
    }
}
