// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Errors returned by [`crate::ApiClient`].
///
/// Throttling is not an error: a request that is still rate limited after the
/// last allowed attempt resolves to `Ok(None)`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-success status other than 429.
    #[error("API HTTP error: {status} {reason}")]
    Http { status: u16, reason: String },

    /// Connection, DNS, TLS or timeout failure below the HTTP layer.
    #[error("API URL error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request URL could not be built.
    #[error("invalid API url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The response body was not valid JSON.
    #[error("failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The client's cancellation token fired before a response arrived.
    #[error("request cancelled")]
    Cancelled,

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
