// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::ExampleError;
use crate::response::get_json;
use serde::Deserialize;
use te_api::ApiClient;

pub const AGENTS_ENDPOINT: &str = "/agents";

const CLOUD_AGENT: &str = "Cloud";
const ENTERPRISE_AGENT: &str = "Enterprise";
const ONLINE: &str = "Online";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub agent_id: u64,
    #[serde(default)]
    pub agent_name: String,
    pub agent_type: String,
    #[serde(default)]
    pub agent_state: Option<String>,
    #[serde(default)]
    pub ip_addresses: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct AgentList {
    agents: Vec<Agent>,
}

pub async fn list_agents(client: &ApiClient) -> Result<Vec<Agent>, ExampleError> {
    let list: AgentList = get_json(client, AGENTS_ENDPOINT, &[]).await?;
    Ok(list.agents)
}

/// Every IP address of every Cloud agent, in listing order.
pub fn cloud_agent_ips(agents: &[Agent]) -> Vec<String> {
    agents
        .iter()
        .filter(|agent| agent.agent_type == CLOUD_AGENT)
        .filter_map(|agent| agent.ip_addresses.as_ref())
        .flatten()
        .cloned()
        .collect()
}

/// IDs of Enterprise agents that are currently online.
pub fn online_enterprise_agent_ids(agents: &[Agent]) -> Vec<u64> {
    agents
        .iter()
        .filter(|agent| {
            agent.agent_type == ENTERPRISE_AGENT && agent.agent_state.as_deref() == Some(ONLINE)
        })
        .map(|agent| agent.agent_id)
        .collect()
}
