use anyhow::Context;

use super::Provisioner;
use crate::error::{IcError, InstanceAction, Result};
use crate::gateway::{
    AddInstanceRequest, AdminGateway, ConfigureInstanceRequest, ConnectRequest, RebootRequest,
    SandboxRequest,
};
use crate::poller::{all_online, primary_online};
use crate::types::{ClusterHandle, InstanceEndpoint, TopologyView};
use crate::validate::{self, MIN_PASSWORD_LEN};

/// Outcome of a sandbox deployment.
#[derive(Debug)]
pub struct DeployReport {
    pub cluster: ClusterHandle,
    /// Ports of the deployed instances, seed first.
    pub ports: Vec<u16>,
    /// Whether the seed reported ONLINE before instances were added.
    pub seed_online: bool,
    /// Whether every member reported ONLINE after the joins.
    pub all_online: bool,
    /// Instances whose configuration was persisted; empty unless `all_online`.
    pub reconfigured: Vec<u16>,
    /// Joins that failed. Always [`IcError::InstanceOperation`].
    pub join_failures: Vec<IcError>,
    pub last_view: TopologyView,
}

/// Outcome of a loop over sandbox ports.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Ports visited, in visiting order.
    pub visited: Vec<u16>,
    /// Always [`IcError::InstanceOperation`].
    pub failures: Vec<IcError>,
}

impl BatchReport {
    fn record(&mut self, action: InstanceAction, port: u16, cause: anyhow::Error) {
        tracing::warn!(port, %action, "Sandbox instance operation failed: {cause}");
        self.failures.push(IcError::instance_op(action, port, cause));
    }
}

#[derive(Debug)]
pub struct StartReport {
    pub cluster: ClusterHandle,
    /// Non-seed instances, started after the reboot.
    pub batch: BatchReport,
}

#[derive(Debug)]
pub struct RestartReport {
    pub stopped: BatchReport,
    pub started: StartReport,
}

impl<G: AdminGateway> Provisioner<G> {
    /// Deploy `instance_count` sandbox instances, create a cluster on the first
    /// and join the rest to it. The new cluster becomes the active one.
    pub async fn deploy_sandbox_cluster(
        &mut self,
        instance_count: Option<i64>,
        root_password: &str,
    ) -> Result<DeployReport> {
        self.sandbox.check()?;
        let count = validate::require_in_range(
            instance_count,
            1,
            i64::from(self.sandbox.slots),
            "instanceCount",
        )?;
        validate::require_password(root_password, MIN_PASSWORD_LEN, "rootPassword")?;
        let count = u16::try_from(count).map_err(|e| IcError::validation(e.to_string()))?;

        let ports = self.sandbox.ports(count);
        tracing::info!(instances = count, ?ports, "Setting up sandbox cluster");

        let report = self
            .provision_sandbox(ports, root_password)
            .await
            .map_err(|e| IcError::Provisioning(format!("{e:#}")))?;

        self.context.set_active(report.cluster.clone());
        Ok(report)
    }

    async fn provision_sandbox(
        &self,
        ports: Vec<u16>,
        password: &str,
    ) -> anyhow::Result<DeployReport> {
        for &port in &ports {
            self.gateway
                .deploy_sandbox_instance(&SandboxRequest {
                    port,
                    password: password.to_string(),
                })
                .await
                .with_context(|| format!("deploying sandbox instance {port}"))?;
        }
        tracing::info!("Sandbox instances deployed");

        let seed = self.sandbox_endpoint(ports[0], password);
        self.gateway
            .connect(&ConnectRequest {
                endpoint: seed.clone(),
            })
            .await
            .with_context(|| format!("connecting to {}", seed.uri()))?;

        let cluster = self
            .gateway
            .create_cluster(&self.sandbox.cluster_name)
            .await
            .with_context(|| format!("creating cluster '{}'", self.sandbox.cluster_name))?;
        tracing::info!(cluster = %cluster, "Cluster created, waiting for seed instance");

        let seed_wait = self.wait_for(&cluster, primary_online).await?;
        if seed_wait.converged {
            tracing::info!("Seed instance reached ONLINE status");
        } else {
            tracing::warn!(
                attempts = seed_wait.attempts,
                "Seed instance has not reached ONLINE status yet"
            );
        }

        let mut joins = BatchReport::default();
        for &port in &ports[1..] {
            joins.visited.push(port);
            let target = self.sandbox_endpoint(port, password);
            if let Err(e) = self
                .gateway
                .add_instance(&cluster, &AddInstanceRequest { target })
                .await
            {
                joins.record(InstanceAction::Join, port, e);
            }
        }

        let members_wait = self.wait_for(&cluster, all_online).await?;
        let mut reconfigured = Vec::new();
        if members_wait.converged {
            tracing::info!("All instances reached ONLINE status, persisting configuration");
            for &port in &ports {
                self.gateway
                    .configure_local_instance(&ConfigureInstanceRequest {
                        target: self.sandbox_endpoint(port, password),
                        mycnf_path: None,
                        cluster_admin: None,
                    })
                    .await
                    .with_context(|| format!("configuring sandbox instance {port}"))?;
                reconfigured.push(port);
            }
        } else {
            tracing::warn!(
                attempts = members_wait.attempts,
                "Some instances have not reached ONLINE status yet"
            );
        }

        Ok(DeployReport {
            cluster,
            ports,
            seed_online: seed_wait.converged,
            all_online: members_wait.converged,
            reconfigured,
            join_failures: joins.failures,
            last_view: members_wait.view,
        })
    }

    /// Stop and delete every possible sandbox instance. Forgets the active cluster first.
    pub async fn delete_sandbox_instances(&mut self, root_password: &str) -> Result<BatchReport> {
        validate::require_password(root_password, MIN_PASSWORD_LEN, "rootPassword")?;
        self.context.clear_active();

        let mut report = BatchReport::default();
        for port in self.sandbox.all_ports() {
            tracing::info!(port, "Removing sandbox instance");
            report.visited.push(port);
            if let Err(e) = self
                .gateway
                .stop_sandbox_instance(&SandboxRequest {
                    port,
                    password: root_password.to_string(),
                })
                .await
            {
                report.record(InstanceAction::Stop, port, e);
            }
            if let Err(e) = self.gateway.delete_sandbox_instance(port).await {
                report.record(InstanceAction::Delete, port, e);
            }
        }
        Ok(report)
    }

    /// Stop every possible sandbox instance, last-provisioned first.
    pub async fn stop_sandbox_instances(&mut self, root_password: &str) -> Result<BatchReport> {
        validate::require_password(root_password, MIN_PASSWORD_LEN, "rootPassword")?;

        let mut report = BatchReport::default();
        for port in self.sandbox.all_ports().into_iter().rev() {
            tracing::info!(port, "Shutting down sandbox instance");
            report.visited.push(port);
            if let Err(e) = self
                .gateway
                .stop_sandbox_instance(&SandboxRequest {
                    port,
                    password: root_password.to_string(),
                })
                .await
            {
                report.record(InstanceAction::Stop, port, e);
            }
        }

        // Let the shutdowns settle before anything restarts them.
        tokio::time::sleep(self.poller.interval()).await;
        Ok(report)
    }

    /// Start the seed instance, reboot the cluster from it, then start the remaining members.
    pub async fn start_sandbox_cluster(&mut self, root_password: &str) -> Result<StartReport> {
        validate::require_password(root_password, MIN_PASSWORD_LEN, "rootPassword")?;
        let seed_port = self.sandbox.seed_port();

        let cluster = self
            .reboot_sandbox(seed_port, root_password)
            .await
            .map_err(|e| IcError::Reboot(format!("{e:#}")))?;
        self.context.set_active(cluster.clone());
        tracing::info!(cluster = %cluster, "Cluster rebooted from seed instance");

        let description = self.gateway.describe_cluster(&cluster).await.map_err(|e| {
            IcError::cluster_op("Failed to get the sandbox cluster instances", e)
        })?;

        let mut batch = BatchReport::default();
        for port in description
            .instance_ports()
            .into_iter()
            .filter(|&p| p != seed_port)
        {
            tracing::info!(port, "Starting sandbox instance");
            batch.visited.push(port);
            if let Err(e) = self.gateway.start_sandbox_instance(port).await {
                batch.record(InstanceAction::Start, port, e);
            }
        }

        Ok(StartReport { cluster, batch })
    }

    async fn reboot_sandbox(&self, seed_port: u16, password: &str) -> anyhow::Result<ClusterHandle> {
        self.gateway
            .start_sandbox_instance(seed_port)
            .await
            .with_context(|| format!("starting seed instance {seed_port}"))?;

        let seed = self.sandbox_endpoint(seed_port, password);
        self.gateway
            .connect(&ConnectRequest {
                endpoint: seed.clone(),
            })
            .await
            .with_context(|| format!("connecting to {}", seed.uri()))?;

        self.gateway
            .reboot_cluster_from_complete_outage(&RebootRequest {
                cluster_name: self.sandbox.cluster_name.clone(),
                password: password.to_string(),
                rejoin_instances: vec![],
                remove_instances: vec![],
            })
            .await
            .with_context(|| format!("rebooting cluster '{}'", self.sandbox.cluster_name))
    }

    /// Stop all sandbox instances, then start the cluster again.
    pub async fn restart_sandbox_cluster(&mut self, root_password: &str) -> Result<RestartReport> {
        let stopped = self.stop_sandbox_instances(root_password).await?;
        let started = self.start_sandbox_cluster(root_password).await?;
        Ok(RestartReport { stopped, started })
    }

    fn sandbox_endpoint(&self, port: u16, password: &str) -> InstanceEndpoint {
        InstanceEndpoint::new(&self.sandbox.user, password, &self.sandbox.host, port)
    }
}
