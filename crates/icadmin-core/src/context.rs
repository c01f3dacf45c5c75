use crate::config::state::ClusterState;
use crate::error::{IcError, Result};
use crate::gateway::AdminGateway;
use crate::types::ClusterHandle;

/// Holds the active cluster handle shared by consecutive workflow steps.
#[derive(Debug, Clone, Default)]
pub struct ClusterContext {
    active: Option<ClusterHandle>,
}

impl ClusterContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: ClusterState) -> Self {
        Self {
            active: state.cluster,
        }
    }

    pub fn to_state(&self) -> ClusterState {
        ClusterState {
            cluster: self.active.clone(),
        }
    }

    pub fn set_active(&mut self, handle: ClusterHandle) {
        tracing::debug!(cluster = %handle, "Active cluster set");
        self.active = Some(handle);
    }

    pub fn clear_active(&mut self) {
        if let Some(old) = self.active.take() {
            tracing::debug!(cluster = %old, "Active cluster cleared");
        }
    }

    /// The stored handle, without consulting the gateway.
    pub fn peek(&self) -> Option<&ClusterHandle> {
        self.active.as_ref()
    }

    /// The active cluster. Falls back to the cluster of the gateway's open
    /// session, caching what it finds.
    pub async fn active<G: AdminGateway + ?Sized>(&mut self, gateway: &G) -> Result<ClusterHandle> {
        if let Some(handle) = &self.active {
            return Ok(handle.clone());
        }
        if !gateway.is_session_open() {
            return Err(IcError::NoActiveCluster);
        }
        let handle = gateway
            .get_cluster()
            .await
            .map_err(|e| IcError::cluster_op("The InnoDB cluster could not be retrieved", e))?;
        self.set_active(handle.clone());
        Ok(handle)
    }
}
