use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{IcError, Result};

/// User name and password for an administrative session. The password is zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: &str, password: &str) -> Self {
        Self {
            user: user.to_string(),
            password: password.to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// A database instance reachable at `host:port`, with the account used to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceEndpoint {
    pub host: String,
    pub port: u16,
    pub credentials: Credentials,
}

impl InstanceEndpoint {
    pub fn new(user: &str, password: &str, host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
            credentials: Credentials::new(user, password),
        }
    }

    /// Session URI without the password: `user@host:port`
    pub fn uri(&self) -> String {
        format!("{}@{}:{}", self.credentials.user, self.host, self.port)
    }

    /// `host:port`, the form the cluster uses to address members.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn password(&self) -> &str {
        &self.credentials.password
    }

    /// Parse a `user@host:port` session URI.
    pub fn from_uri(uri: &str, password: &str) -> Result<Self> {
        let invalid = || IcError::validation(format!("'{uri}' is not a user@host:port URI."));
        let (user, address) = uri.split_once('@').ok_or_else(invalid)?;
        let (host, port) = address.rsplit_once(':').ok_or_else(invalid)?;
        if user.is_empty() || host.is_empty() {
            return Err(invalid());
        }
        let port = port.parse::<u16>().map_err(|_| invalid())?;
        Ok(Self::new(user, password, host, port))
    }
}

impl fmt::Display for InstanceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri())
    }
}

/// Reference to a provisioned cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterHandle {
    pub name: String,
    /// Session the handle was obtained through (`user@host:port`).
    pub session_uri: String,
    pub resolved_at: String,
}

impl ClusterHandle {
    pub fn new(name: &str, session_uri: &str) -> Self {
        Self {
            name: name.to_string(),
            session_uri: session_uri.to_string(),
            resolved_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl fmt::Display for ClusterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (via {})", self.name, self.session_uri)
    }
}

/// Group membership state reported for a cluster member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberState {
    Online,
    Recovering,
    Offline,
    Unreachable,
    Error,
    Missing,
    Other(String),
}

impl MemberState {
    pub fn is_online(&self) -> bool {
        matches!(self, MemberState::Online)
    }
}

impl fmt::Display for MemberState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberState::Online => write!(f, "ONLINE"),
            MemberState::Recovering => write!(f, "RECOVERING"),
            MemberState::Offline => write!(f, "OFFLINE"),
            MemberState::Unreachable => write!(f, "UNREACHABLE"),
            MemberState::Error => write!(f, "ERROR"),
            MemberState::Missing => write!(f, "(MISSING)"),
            MemberState::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for MemberState {
    fn from(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "ONLINE" => MemberState::Online,
            "RECOVERING" => MemberState::Recovering,
            "OFFLINE" => MemberState::Offline,
            "UNREACHABLE" => MemberState::Unreachable,
            "ERROR" => MemberState::Error,
            "(MISSING)" | "MISSING" => MemberState::Missing,
            _ => MemberState::Other(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberStatus {
    pub address: String,
    /// `R/W` or `R/O`.
    pub mode: String,
    pub status: MemberState,
}

/// Point-in-time snapshot of a cluster's topology, as returned by a status call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyView {
    pub cluster_name: String,
    /// Status code, e.g. `OK`, `OK_NO_TOLERANCE`.
    pub status: String,
    pub status_text: String,
    /// Address of the primary member.
    pub primary: String,
    pub members: Vec<MemberStatus>,
}

impl TopologyView {
    pub fn primary_member(&self) -> Option<&MemberStatus> {
        self.members.iter().find(|m| m.address == self.primary)
    }

    pub fn primary_online(&self) -> bool {
        self.primary_member()
            .is_some_and(|m| m.status.is_online())
    }

    pub fn all_online(&self) -> bool {
        !self.members.is_empty() && self.members.iter().all(|m| m.status.is_online())
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// Result of a describe call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDescription {
    #[serde(default)]
    pub cluster_name: String,
    pub default_replica_set: ReplicaSetDescription,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaSetDescription {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub instances: Vec<DescribedInstance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescribedInstance {
    /// `host:port`
    pub host: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl ClusterDescription {
    /// Ports of all described instances, taken from the text after the last `:` of each host.
    /// Hosts without a parseable port are skipped.
    pub fn instance_ports(&self) -> Vec<u16> {
        self.default_replica_set
            .instances
            .iter()
            .filter_map(|i| {
                let port = i.host.rsplit_once(':').map(|(_, p)| p).unwrap_or(&i.host);
                match port.parse::<u16>() {
                    Ok(p) => Some(p),
                    Err(_) => {
                        tracing::warn!(host = %i.host, "Skipping instance without a usable port");
                        None
                    }
                }
            })
            .collect()
    }
}
