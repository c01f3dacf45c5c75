use std::process::Stdio;
use std::sync::Mutex;

use anyhow::{Context, bail};
use async_trait::async_trait;
use icadmin_core::config::ShellSettings;
use icadmin_core::gateway::{
    AddInstanceRequest, AdminGateway, ConfigureInstanceRequest, ConnectRequest, RebootRequest,
    SandboxRequest,
};
use icadmin_core::types::{ClusterDescription, ClusterHandle, InstanceEndpoint, TopologyView};
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::script;
use crate::wire::{self, ScriptResult, StatusPayload};

/// [`AdminGateway`] backed by the MySQL Shell binary.
///
/// Every call runs one `mysqlsh` process. The session opened by
/// [`AdminGateway::connect`] is remembered and replayed by later calls.
pub struct MysqlShellGateway {
    binary: String,
    extra_args: Vec<String>,
    session: Mutex<Option<InstanceEndpoint>>,
}

impl MysqlShellGateway {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            extra_args: Vec::new(),
            session: Mutex::new(None),
        }
    }

    pub fn from_settings(settings: &ShellSettings) -> Self {
        Self {
            binary: settings.binary.clone(),
            extra_args: settings.extra_args.clone(),
            session: Mutex::new(None),
        }
    }

    fn current_session(&self) -> anyhow::Result<InstanceEndpoint> {
        let session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("session lock"))?;
        session
            .clone()
            .context("no open session, connect to an instance first")
    }

    /// Run `expr` in a fresh shell and return its JSON value.
    async fn run(
        &self,
        op: &str,
        session: Option<&InstanceEndpoint>,
        expr: String,
    ) -> anyhow::Result<serde_json::Value> {
        let script = script::render(session, &expr);
        let session_uri = session.map_or_else(|| "-".to_string(), InstanceEndpoint::uri);
        tracing::debug!(op, binary = %self.binary, session = %session_uri, "Running mysqlsh");

        let mut child = Command::new(&self.binary)
            .args(["--no-wizard", "--js"])
            .args(&self.extra_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to start '{}'", self.binary))?;

        // A shell that exits before reading its script closes the pipe. Its
        // stderr and exit status are reported below instead.
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(script.as_bytes()).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e).context("failed to write script to mysqlsh");
                }
                tracing::debug!(op, "mysqlsh closed stdin before reading the script");
            }
        }

        let output = child
            .wait_with_output()
            .await
            .context("failed to wait for mysqlsh")?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        match wire::parse_result(&stdout)? {
            Some(ScriptResult::Ok(value)) => Ok(value),
            Some(ScriptResult::Err(message)) => bail!(message),
            None => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                bail!(
                    "mysqlsh exited with {} without a result: {}",
                    output.status,
                    stderr.trim()
                )
            }
        }
    }

    async fn run_as<T: DeserializeOwned>(
        &self,
        op: &str,
        session: Option<&InstanceEndpoint>,
        expr: String,
    ) -> anyhow::Result<T> {
        let value = self.run(op, session, expr).await?;
        serde_json::from_value(value).with_context(|| format!("unexpected {op} result"))
    }

    async fn run_in_session(&self, op: &str, expr: String) -> anyhow::Result<serde_json::Value> {
        let session = self.current_session()?;
        self.run(op, Some(&session), expr).await
    }

    async fn cluster_from(&self, op: &str, expr: String) -> anyhow::Result<ClusterHandle> {
        let session = self.current_session()?;
        let name: String = self.run_as(op, Some(&session), expr).await?;
        Ok(ClusterHandle::new(&name, &session.uri()))
    }
}

#[async_trait]
impl AdminGateway for MysqlShellGateway {
    async fn deploy_sandbox_instance(&self, req: &SandboxRequest) -> anyhow::Result<()> {
        self.run(
            "deploySandboxInstance",
            None,
            script::deploy_sandbox(req.port, &req.password),
        )
        .await?;
        Ok(())
    }

    async fn stop_sandbox_instance(&self, req: &SandboxRequest) -> anyhow::Result<()> {
        self.run(
            "stopSandboxInstance",
            None,
            script::stop_sandbox(req.port, &req.password),
        )
        .await?;
        Ok(())
    }

    async fn delete_sandbox_instance(&self, port: u16) -> anyhow::Result<()> {
        self.run("deleteSandboxInstance", None, script::delete_sandbox(port))
            .await?;
        Ok(())
    }

    async fn start_sandbox_instance(&self, port: u16) -> anyhow::Result<()> {
        self.run("startSandboxInstance", None, script::start_sandbox(port))
            .await?;
        Ok(())
    }

    async fn connect(&self, req: &ConnectRequest) -> anyhow::Result<()> {
        self.run("connect", Some(&req.endpoint), script::session_probe())
            .await?;
        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("session lock"))?;
        *session = Some(req.endpoint.clone());
        Ok(())
    }

    fn is_session_open(&self) -> bool {
        self.session.lock().map(|s| s.is_some()).unwrap_or(false)
    }

    async fn create_cluster(&self, name: &str) -> anyhow::Result<ClusterHandle> {
        self.cluster_from("createCluster", script::create_cluster(name))
            .await
    }

    async fn get_cluster(&self) -> anyhow::Result<ClusterHandle> {
        self.cluster_from("getCluster", script::get_cluster()).await
    }

    async fn reboot_cluster_from_complete_outage(
        &self,
        req: &RebootRequest,
    ) -> anyhow::Result<ClusterHandle> {
        self.cluster_from(
            "rebootClusterFromCompleteOutage",
            script::reboot_cluster(req),
        )
        .await
    }

    async fn configure_local_instance(&self, req: &ConfigureInstanceRequest) -> anyhow::Result<()> {
        self.run(
            "configureLocalInstance",
            None,
            script::configure_local_instance(req),
        )
        .await?;
        Ok(())
    }

    async fn cluster_status(&self, cluster: &ClusterHandle) -> anyhow::Result<TopologyView> {
        let value = self
            .run_in_session("status", script::cluster_status(&cluster.name))
            .await?;
        let payload: StatusPayload =
            serde_json::from_value(value).context("unexpected status result")?;
        Ok(payload.into())
    }

    async fn describe_cluster(&self, cluster: &ClusterHandle) -> anyhow::Result<ClusterDescription> {
        let value = self
            .run_in_session("describe", script::describe_cluster(&cluster.name))
            .await?;
        serde_json::from_value(value).context("unexpected describe result")
    }

    async fn add_instance(
        &self,
        cluster: &ClusterHandle,
        req: &AddInstanceRequest,
    ) -> anyhow::Result<()> {
        self.run_in_session("addInstance", script::add_instance(&cluster.name, &req.target))
            .await?;
        Ok(())
    }
}
