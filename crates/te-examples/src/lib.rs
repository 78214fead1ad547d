// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Worked examples on top of [`te_api`]: agent listings, test creation, DNS
//! availability, DNS trace CSV export and re-enabling stale tests.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod agents;
pub mod cli;
pub mod dns_server;
pub mod error;
pub mod interrupt;
pub mod logging;
mod response;
pub mod trace_report;

pub use error::ExampleError;
