// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! DNS trace mapping report.
//!
//! Pulls every trace round of a DNS trace test inside a time window, groups
//! the reported mappings per agent into fixed-length time periods and writes
//! the result as CSV: one row per agent, one column per period, each cell
//! listing the distinct mappings (`;` separated) the agent saw in that period.
//! Tracking those cells over time shows whether geo load balancing hands out
//! different answers from different locations.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod bucket;
pub mod csv_export;
pub mod error;
pub mod pager;
pub mod record;
pub mod window;

pub use bucket::{bucket_traces, period_index, PeriodMappings, TraceBuckets, ERROR_MARKER};
pub use csv_export::{render_csv, write_csv_file};
pub use error::TraceError;
pub use pager::{load_traces, load_traces_limited, validate_test, TracePager};
pub use record::{DnsTest, TraceRecord};
pub use window::TraceWindow;
