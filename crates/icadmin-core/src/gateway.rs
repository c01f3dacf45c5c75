use async_trait::async_trait;
use std::fmt;

use crate::types::{ClusterDescription, ClusterHandle, InstanceEndpoint, TopologyView};

/// Deploy or stop a sandbox instance on a local port.
#[derive(Clone)]
pub struct SandboxRequest {
    pub port: u16,
    pub password: String,
}

/// Open an administrative session.
#[derive(Debug, Clone)]
pub struct ConnectRequest {
    pub endpoint: InstanceEndpoint,
}

#[derive(Clone)]
pub struct RebootRequest {
    pub cluster_name: String,
    pub password: String,
    pub rejoin_instances: Vec<String>,
    pub remove_instances: Vec<String>,
}

/// Persist group-replication settings on an instance, optionally creating a cluster admin account.
#[derive(Debug, Clone)]
pub struct ConfigureInstanceRequest {
    pub target: InstanceEndpoint,
    pub mycnf_path: Option<String>,
    pub cluster_admin: Option<ClusterAdmin>,
}

#[derive(Clone)]
pub struct ClusterAdmin {
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AddInstanceRequest {
    pub target: InstanceEndpoint,
}

impl fmt::Debug for SandboxRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SandboxRequest")
            .field("port", &self.port)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Debug for RebootRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RebootRequest")
            .field("cluster_name", &self.cluster_name)
            .field("password", &"[REDACTED]")
            .field("rejoin_instances", &self.rejoin_instances)
            .field("remove_instances", &self.remove_instances)
            .finish()
    }
}

impl fmt::Debug for ClusterAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterAdmin")
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// The cluster-administration API wrapped by the workflows.
///
/// Sessions are stateful: `create_cluster`, `get_cluster` and
/// `reboot_cluster_from_complete_outage` run against the session opened by the
/// last successful `connect`.
#[async_trait]
pub trait AdminGateway: Send + Sync {
    async fn deploy_sandbox_instance(&self, req: &SandboxRequest) -> anyhow::Result<()>;

    async fn stop_sandbox_instance(&self, req: &SandboxRequest) -> anyhow::Result<()>;

    async fn delete_sandbox_instance(&self, port: u16) -> anyhow::Result<()>;

    async fn start_sandbox_instance(&self, port: u16) -> anyhow::Result<()>;

    async fn connect(&self, req: &ConnectRequest) -> anyhow::Result<()>;

    /// Whether a session from a previous `connect` is available.
    fn is_session_open(&self) -> bool;

    async fn create_cluster(&self, name: &str) -> anyhow::Result<ClusterHandle>;

    /// The cluster the current session's instance belongs to.
    async fn get_cluster(&self) -> anyhow::Result<ClusterHandle>;

    async fn reboot_cluster_from_complete_outage(
        &self,
        req: &RebootRequest,
    ) -> anyhow::Result<ClusterHandle>;

    async fn configure_local_instance(&self, req: &ConfigureInstanceRequest) -> anyhow::Result<()>;

    async fn cluster_status(&self, cluster: &ClusterHandle) -> anyhow::Result<TopologyView>;

    async fn describe_cluster(&self, cluster: &ClusterHandle) -> anyhow::Result<ClusterDescription>;

    async fn add_instance(
        &self,
        cluster: &ClusterHandle,
        req: &AddInstanceRequest,
    ) -> anyhow::Result<()>;
}
