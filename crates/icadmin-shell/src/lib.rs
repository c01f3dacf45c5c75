//! MySQL Shell implementation of the icadmin [`AdminGateway`](icadmin_core::gateway::AdminGateway).

pub mod gateway;
mod script;
mod wire;

pub use gateway::MysqlShellGateway;
