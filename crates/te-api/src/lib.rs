// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Client for the ThousandEyes REST API.
//!
//! Every request is authenticated with HTTP Basic auth (account email and API
//! token) and asks for JSON output. The API throttles callers with `429 Too
//! Many Requests`; the client absorbs those responses according to its
//! [`RetryPolicy`] and only hands back a result once the server answers with
//! something other than a throttle.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod client;
pub mod config;
pub mod error;
pub mod retry;

pub use client::{ApiClient, Credentials};
pub use config::ClientConfig;
pub use error::ApiError;
pub use retry::RetryPolicy;

/// Production API base URL.
pub const DEFAULT_API_URL: &str = "https://api.thousandeyes.com";
