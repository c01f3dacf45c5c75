//! Provisioning and inspection workflows for InnoDB clusters, on local
//! sandbox instances or production hosts, driven through an [`gateway::AdminGateway`].

pub mod config;
pub mod context;
pub mod error;
pub mod gateway;
pub mod poller;
pub mod status;
pub mod types;
pub mod validate;
pub mod workflows;

pub use context::ClusterContext;
pub use error::{IcError, Result};
pub use workflows::Provisioner;
