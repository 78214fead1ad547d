// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::ExampleError;
use crate::response::get_json;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use te_api::ApiClient;

const DNS_SERVER_TEST_TYPE: &str = "dns-server";

/// Share of DNS servers that resolved in the latest round.
///
/// A round still in progress yields partial data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Availability {
    pub successful: usize,
    pub total: usize,
}

impl Availability {
    /// Percentage in `0.0..=100.0`. Construction guarantees `total > 0`.
    pub fn percent(&self) -> f64 {
        100.0 * self.successful as f64 / self.total as f64
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.percent())
    }
}

#[derive(Debug, Deserialize)]
struct ServerResponse {
    dns: ServerSection,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    test: TestKind,
    #[serde(default)]
    server: Vec<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct TestKind {
    #[serde(rename = "type")]
    test_type: String,
}

pub fn endpoint(test_id: &str) -> String {
    format!("/dns/server/{test_id}.json")
}

pub async fn dns_server_availability(
    client: &ApiClient,
    test_id: &str,
) -> Result<Availability, ExampleError> {
    let endpoint = endpoint(test_id);
    let response: ServerResponse = get_json(client, &endpoint, &[]).await?;
    if response.dns.test.test_type != DNS_SERVER_TEST_TYPE {
        return Err(ExampleError::UnexpectedTestType {
            expected: DNS_SERVER_TEST_TYPE.to_string(),
            actual: response.dns.test.test_type,
        });
    }
    availability(&response.dns.server)
        .ok_or_else(|| ExampleError::NoResults(format!("no DNS server results for test {test_id}")))
}

/// A server counts as available when its result carries a `resolutionTime`.
fn availability(servers: &[Map<String, Value>]) -> Option<Availability> {
    if servers.is_empty() {
        return None;
    }
    let successful = servers
        .iter()
        .filter(|server| server.contains_key("resolutionTime"))
        .count();
    Some(Availability {
        successful,
        total: servers.len(),
    })
}
