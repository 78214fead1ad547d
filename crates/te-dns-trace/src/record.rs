// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::TraceError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Format of every `date` field returned by the API; always UTC.
pub const API_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One DNS trace round reported by one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceRecord {
    pub date: String,
    pub agent_name: String,
    /// Final answer of the trace, e.g. `www.example.com IN A 192.0.2.10`.
    /// Failed rounds may omit it.
    #[serde(default)]
    pub mappings: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl TraceRecord {
    /// Seconds since the Unix epoch of the round's `date`.
    pub fn epoch(&self) -> Result<i64, TraceError> {
        parse_api_date(&self.date)
    }

    pub fn is_error(&self) -> bool {
        self.error_details.is_some()
    }
}

/// Test metadata carried in `dns.test` of a results response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsTest {
    #[serde(rename = "type")]
    pub test_type: String,
    /// Domain under test followed by the record type, e.g. `example.com A`.
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub test_id: Option<u64>,
    #[serde(default)]
    pub test_name: Option<String>,
}

/// One page of `/dns/trace/<id>` results.
#[derive(Debug, Deserialize)]
pub(crate) struct TracePage {
    pub(crate) dns: TraceSection,
    #[serde(default)]
    pub(crate) pages: Pages,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TraceSection {
    #[serde(default)]
    pub(crate) test: Option<DnsTest>,
    #[serde(default)]
    pub(crate) trace: Vec<TraceRecord>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Pages {
    /// Absolute URL of the following page; missing on the last page.
    #[serde(default)]
    pub(crate) next: Option<String>,
}

pub fn parse_api_date(date: &str) -> Result<i64, TraceError> {
    NaiveDateTime::parse_from_str(date, API_DATE_FORMAT)
        .map(|dt| dt.and_utc().timestamp())
        .map_err(|_| TraceError::InvalidDate(date.to_string()))
}
