// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use te_api::ApiError;
use te_dns_trace::TraceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExampleError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Trace(#[from] TraceError),

    /// The client gave up on a throttled request.
    #[error("no result from {0}, API still rate limited after all retries")]
    NoResult(String),

    #[error("test is of type '{actual}', a {expected} test is required")]
    UnexpectedTestType { expected: String, actual: String },

    #[error("unexpected response from {endpoint}: {reason}")]
    UnexpectedShape { endpoint: String, reason: String },

    #[error("{0}")]
    NoResults(String),

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("interrupted")]
    Interrupted,
}
