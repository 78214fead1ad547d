// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use te_api::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Every attempt for a page was throttled; the records gathered so far are
    /// discarded.
    #[error("API kept rate limiting the trace request, no result after all retries")]
    RateLimited,

    #[error("test is of type '{0}', a DNS trace test is required")]
    NotDnsTrace(String),

    #[error("test domain '{0}' is not configured for A records, a DNS trace test for A record is required")]
    NotARecordTest(String),

    #[error("trace response does not describe the test under dns.test")]
    MissingTestMetadata,

    #[error("unexpected trace response shape: {0}")]
    UnexpectedShape(#[source] serde_json::Error),

    #[error("invalid trace date '{0}'")]
    InvalidDate(String),

    #[error("invalid trace window: {0}")]
    InvalidWindow(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
