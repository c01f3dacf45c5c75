//! Multi-step provisioning procedures over an [`AdminGateway`].
//!
//! Cluster-level calls fail fast; per-instance calls inside batch loops
//! (stop, delete, start, join) are recorded in the returned report and the
//! loop continues. Nothing is rolled back.

mod production;
mod sandbox;

pub use production::{AddInstanceParams, PrepareInstanceParams, ProductionClusterParams};
pub use sandbox::{BatchReport, DeployReport, RestartReport, StartReport};

use crate::config::{IcAdminConfig, SandboxSettings};
use crate::context::ClusterContext;
use crate::error::{IcError, Result};
use crate::gateway::{AdminGateway, ConnectRequest};
use crate::poller::{ConvergencePoller, PollOutcome};
use crate::types::{ClusterHandle, InstanceEndpoint, TopologyView};

/// Runs workflows against one gateway and owns the active cluster reference.
pub struct Provisioner<G: AdminGateway> {
    gateway: G,
    context: ClusterContext,
    sandbox: SandboxSettings,
    poller: ConvergencePoller,
}

impl<G: AdminGateway> Provisioner<G> {
    pub fn new(gateway: G, context: ClusterContext) -> Self {
        Self {
            gateway,
            context,
            sandbox: SandboxSettings::default(),
            poller: ConvergencePoller::default(),
        }
    }

    pub fn from_config(gateway: G, context: ClusterContext, config: &IcAdminConfig) -> Self {
        Self::new(gateway, context)
            .with_sandbox(config.sandbox.clone())
            .with_poller(ConvergencePoller::from_settings(&config.convergence))
    }

    pub fn with_sandbox(mut self, sandbox: SandboxSettings) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn with_poller(mut self, poller: ConvergencePoller) -> Self {
        self.poller = poller;
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn context(&self) -> &ClusterContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ClusterContext {
        &mut self.context
    }

    pub fn sandbox(&self) -> &SandboxSettings {
        &self.sandbox
    }

    /// Ports a sandbox cluster of `instance_count` instances will use.
    pub fn sandbox_ports(&self, instance_count: u16) -> Vec<u16> {
        self.sandbox.ports(instance_count)
    }

    /// Open a session, e.g. so [`Provisioner::status`] can resolve the cluster through it.
    pub async fn open_session(&self, endpoint: &InstanceEndpoint) -> Result<()> {
        self.gateway
            .connect(&ConnectRequest {
                endpoint: endpoint.clone(),
            })
            .await
            .map_err(|e| IcError::Session {
                uri: endpoint.uri(),
                message: e.to_string(),
            })
    }

    /// Status snapshot of the active cluster.
    pub async fn status(&mut self) -> Result<TopologyView> {
        let cluster = self.context.active(&self.gateway).await?;
        self.fetch_status(&cluster).await
    }

    async fn fetch_status(&self, cluster: &ClusterHandle) -> Result<TopologyView> {
        self.gateway
            .cluster_status(cluster)
            .await
            .map_err(|e| IcError::cluster_op("The cluster status could not be retrieved", e))
    }

    async fn wait_for(
        &self,
        cluster: &ClusterHandle,
        converged: fn(&TopologyView) -> bool,
    ) -> Result<PollOutcome> {
        self.poller
            .poll(|| self.fetch_status(cluster), converged)
            .await
    }
}
