//! Recording in-memory gateway for workflow tests.
#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use icadmin_core::gateway::{
    AddInstanceRequest, AdminGateway, ConfigureInstanceRequest, ConnectRequest, RebootRequest,
    SandboxRequest,
};
use icadmin_core::poller::ConvergencePoller;
use icadmin_core::types::{
    ClusterDescription, ClusterHandle, DescribedInstance, MemberState, MemberStatus,
    ReplicaSetDescription, TopologyView,
};
use icadmin_core::{ClusterContext, Provisioner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Deploy,
    Stop,
    Delete,
    Start,
    Connect,
    CreateCluster,
    GetCluster,
    Reboot,
    Configure,
    Status,
    Describe,
    AddInstance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Deploy(u16),
    Stop(u16),
    Delete(u16),
    Start(u16),
    Connect(String),
    CreateCluster(String),
    GetCluster,
    Reboot(String),
    Configure {
        uri: String,
        mycnf_path: Option<String>,
        cluster_admin: Option<String>,
    },
    Status,
    Describe,
    AddInstance(String),
}

impl Call {
    fn op(&self) -> Op {
        match self {
            Call::Deploy(_) => Op::Deploy,
            Call::Stop(_) => Op::Stop,
            Call::Delete(_) => Op::Delete,
            Call::Start(_) => Op::Start,
            Call::Connect(_) => Op::Connect,
            Call::CreateCluster(_) => Op::CreateCluster,
            Call::GetCluster => Op::GetCluster,
            Call::Reboot(_) => Op::Reboot,
            Call::Configure { .. } => Op::Configure,
            Call::Status => Op::Status,
            Call::Describe => Op::Describe,
            Call::AddInstance(_) => Op::AddInstance,
        }
    }

    fn port(&self) -> Option<u16> {
        match self {
            Call::Deploy(p) | Call::Stop(p) | Call::Delete(p) | Call::Start(p) => Some(*p),
            Call::AddInstance(uri) | Call::Configure { uri, .. } => {
                uri.rsplit_once(':').and_then(|(_, p)| p.parse().ok())
            }
            _ => None,
        }
    }
}

#[derive(Default)]
struct StubState {
    calls: Vec<Call>,
    session: Option<String>,
    members: Vec<String>,
    status_fetches: u32,
}

pub struct StubGateway {
    state: Mutex<StubState>,
    failures: Vec<(Op, Option<u16>)>,
    /// Status fetches that still report members as RECOVERING; `None` never converges.
    online_after: Option<u32>,
    describe_hosts: Option<Vec<String>>,
    cluster_name: String,
}

impl StubGateway {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StubState::default()),
            failures: vec![],
            online_after: Some(0),
            describe_hosts: None,
            cluster_name: "existingCluster".to_string(),
        }
    }

    pub fn failing(mut self, op: Op) -> Self {
        self.failures.push((op, None));
        self
    }

    pub fn failing_port(mut self, op: Op, port: u16) -> Self {
        self.failures.push((op, Some(port)));
        self
    }

    /// Members report ONLINE from the `n`-th status fetch on.
    pub fn online_after(mut self, n: u32) -> Self {
        self.online_after = Some(n.saturating_sub(1));
        self
    }

    pub fn never_online(mut self) -> Self {
        self.online_after = None;
        self
    }

    pub fn with_session(self, uri: &str) -> Self {
        self.state.lock().unwrap().session = Some(uri.to_string());
        self
    }

    pub fn with_describe_hosts(mut self, hosts: &[&str]) -> Self {
        self.describe_hosts = Some(hosts.iter().map(|h| h.to_string()).collect());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_of(&self, op: Op) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.op() == op).collect()
    }

    fn record(&self, call: Call) -> anyhow::Result<()> {
        let failing = self
            .failures
            .iter()
            .any(|(op, port)| *op == call.op() && (port.is_none() || *port == call.port()));
        self.state.lock().unwrap().calls.push(call.clone());
        if failing {
            anyhow::bail!("stub failure on {call:?}");
        }
        Ok(())
    }

    fn session_uri(&self) -> String {
        self.state
            .lock()
            .unwrap()
            .session
            .clone()
            .unwrap_or_default()
    }

    fn seed_address(&self) -> String {
        let uri = self.session_uri();
        uri.split_once('@')
            .map(|(_, addr)| addr.to_string())
            .unwrap_or(uri)
    }
}

#[async_trait]
impl AdminGateway for StubGateway {
    async fn deploy_sandbox_instance(&self, req: &SandboxRequest) -> anyhow::Result<()> {
        self.record(Call::Deploy(req.port))
    }

    async fn stop_sandbox_instance(&self, req: &SandboxRequest) -> anyhow::Result<()> {
        self.record(Call::Stop(req.port))
    }

    async fn delete_sandbox_instance(&self, port: u16) -> anyhow::Result<()> {
        self.record(Call::Delete(port))
    }

    async fn start_sandbox_instance(&self, port: u16) -> anyhow::Result<()> {
        self.record(Call::Start(port))
    }

    async fn connect(&self, req: &ConnectRequest) -> anyhow::Result<()> {
        self.record(Call::Connect(req.endpoint.uri()))?;
        self.state.lock().unwrap().session = Some(req.endpoint.uri());
        Ok(())
    }

    fn is_session_open(&self) -> bool {
        self.state.lock().unwrap().session.is_some()
    }

    async fn create_cluster(&self, name: &str) -> anyhow::Result<ClusterHandle> {
        self.record(Call::CreateCluster(name.to_string()))?;
        let seed = self.seed_address();
        self.state.lock().unwrap().members = vec![seed];
        Ok(ClusterHandle::new(name, &self.session_uri()))
    }

    async fn get_cluster(&self) -> anyhow::Result<ClusterHandle> {
        self.record(Call::GetCluster)?;
        Ok(ClusterHandle::new(&self.cluster_name, &self.session_uri()))
    }

    async fn reboot_cluster_from_complete_outage(
        &self,
        req: &RebootRequest,
    ) -> anyhow::Result<ClusterHandle> {
        self.record(Call::Reboot(req.cluster_name.clone()))?;
        Ok(ClusterHandle::new(&req.cluster_name, &self.session_uri()))
    }

    async fn configure_local_instance(&self, req: &ConfigureInstanceRequest) -> anyhow::Result<()> {
        self.record(Call::Configure {
            uri: req.target.uri(),
            mycnf_path: req.mycnf_path.clone(),
            cluster_admin: req.cluster_admin.as_ref().map(|a| a.user.clone()),
        })
    }

    async fn cluster_status(&self, cluster: &ClusterHandle) -> anyhow::Result<TopologyView> {
        self.record(Call::Status)?;
        let mut state = self.state.lock().unwrap();
        state.status_fetches += 1;
        let online = self
            .online_after
            .is_some_and(|n| state.status_fetches > n);
        let status = if online {
            MemberState::Online
        } else {
            MemberState::Recovering
        };
        let members: Vec<MemberStatus> = state
            .members
            .iter()
            .enumerate()
            .map(|(i, address)| MemberStatus {
                address: address.clone(),
                mode: if i == 0 { "R/W" } else { "R/O" }.to_string(),
                status: status.clone(),
            })
            .collect();
        Ok(TopologyView {
            cluster_name: cluster.name.clone(),
            status: "OK".to_string(),
            status_text: "Cluster is ONLINE".to_string(),
            primary: state.members.first().cloned().unwrap_or_default(),
            members,
        })
    }

    async fn describe_cluster(&self, cluster: &ClusterHandle) -> anyhow::Result<ClusterDescription> {
        self.record(Call::Describe)?;
        let hosts = match &self.describe_hosts {
            Some(hosts) => hosts.clone(),
            None => self.state.lock().unwrap().members.clone(),
        };
        Ok(ClusterDescription {
            cluster_name: cluster.name.clone(),
            default_replica_set: ReplicaSetDescription {
                name: "default".to_string(),
                instances: hosts
                    .into_iter()
                    .map(|host| DescribedInstance { host, label: None })
                    .collect(),
            },
        })
    }

    async fn add_instance(
        &self,
        _cluster: &ClusterHandle,
        req: &AddInstanceRequest,
    ) -> anyhow::Result<()> {
        self.record(Call::AddInstance(req.target.uri()))?;
        self.state
            .lock()
            .unwrap()
            .members
            .push(req.target.address());
        Ok(())
    }
}

pub fn provisioner(gateway: StubGateway) -> Provisioner<StubGateway> {
    Provisioner::new(gateway, ClusterContext::new())
        .with_poller(ConvergencePoller::new(10, Duration::ZERO))
}
