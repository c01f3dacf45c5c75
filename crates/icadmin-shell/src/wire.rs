//! Result lines printed by generated scripts, and the JSON payloads they carry.

use std::collections::BTreeMap;

use anyhow::Context;
use icadmin_core::types::{MemberState, MemberStatus, TopologyView};
use serde::Deserialize;

use crate::script::{ERR_MARKER, OK_MARKER};

/// What a script reported.
#[derive(Debug, PartialEq)]
pub(crate) enum ScriptResult {
    Ok(serde_json::Value),
    Err(String),
}

/// Find the result line in the shell's stdout. The last marker line wins.
pub(crate) fn parse_result(stdout: &str) -> anyhow::Result<Option<ScriptResult>> {
    let Some(line) = stdout
        .lines()
        .rev()
        .map(str::trim_end)
        .find(|l| l.starts_with(OK_MARKER.trim_end()) || l.starts_with(ERR_MARKER.trim_end()))
    else {
        return Ok(None);
    };

    if let Some(payload) = line.strip_prefix(OK_MARKER.trim_end()) {
        let value = serde_json::from_str(payload.trim()).context("invalid result payload")?;
        return Ok(Some(ScriptResult::Ok(value)));
    }
    let payload = line
        .strip_prefix(ERR_MARKER.trim_end())
        .unwrap_or_default()
        .trim();
    // Fall back to the raw text if the message is not a JSON string.
    let message = serde_json::from_str::<String>(payload).unwrap_or_else(|_| payload.to_string());
    Ok(Some(ScriptResult::Err(message)))
}

/// `Cluster.status()` output.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusPayload {
    #[serde(default)]
    cluster_name: String,
    default_replica_set: ReplicaSetStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplicaSetStatus {
    #[serde(default)]
    status: String,
    #[serde(default)]
    status_text: String,
    #[serde(default)]
    primary: String,
    #[serde(default)]
    topology: BTreeMap<String, TopologyEntry>,
}

#[derive(Debug, Deserialize)]
struct TopologyEntry {
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    mode: String,
    #[serde(default)]
    status: String,
}

impl From<StatusPayload> for TopologyView {
    fn from(p: StatusPayload) -> Self {
        let members = p
            .default_replica_set
            .topology
            .into_iter()
            .map(|(key, entry)| MemberStatus {
                address: entry.address.unwrap_or(key),
                mode: entry.mode,
                status: MemberState::from(entry.status.as_str()),
            })
            .collect();
        TopologyView {
            cluster_name: p.cluster_name,
            status: p.default_replica_set.status,
            status_text: p.default_replica_set.status_text,
            primary: p.default_replica_set.primary,
            members,
        }
    }
}
