use thiserror::Error;

#[derive(Debug, Error)]
pub enum IcError {
    // Input
    #[error("ERROR: {0}")]
    Validation(String),

    // Session
    #[error("ERROR: Failed to establish a session to '{uri}'. Message: {message}")]
    Session { uri: String, message: String },

    // Cluster
    #[error("ERROR: {context}. Message: {message}")]
    ClusterOperation { context: String, message: String },

    #[error("ERROR: No cluster defined yet. Connect to an instance that is part of a cluster, or create one with deploySandboxCluster or createProductionCluster")]
    NoActiveCluster,

    // Instance (recorded in batch reports, never aborts a batch)
    #[error("Cannot {action} sandbox instance {port}. Message: {message}")]
    InstanceOperation {
        action: InstanceAction,
        port: u16,
        message: String,
    },

    // Sandbox workflows
    #[error("Failed to create the InnoDB cluster. Message: {0}")]
    Provisioning(String),

    #[error("ERROR: Cannot reboot the cluster. Message: {0}")]
    Reboot(String),

    // IO
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Config
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file not found at {0}: run `icadmin init` first")]
    ConfigNotFound(String),

    #[error("TOML deserialization error: {0}")]
    TomlDe(String),

    #[error("TOML serialization error: {0}")]
    TomlSer(String),
}

/// Lifecycle action attempted on a single sandbox instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceAction {
    Stop,
    Delete,
    Start,
    Join,
}

impl std::fmt::Display for InstanceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceAction::Stop => write!(f, "stop"),
            InstanceAction::Delete => write!(f, "delete"),
            InstanceAction::Start => write!(f, "start"),
            InstanceAction::Join => write!(f, "join"),
        }
    }
}

impl IcError {
    pub fn validation(msg: impl Into<String>) -> Self {
        IcError::Validation(msg.into())
    }

    pub fn cluster_op(context: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        IcError::ClusterOperation {
            context: context.into(),
            message: cause.to_string(),
        }
    }

    pub fn instance_op(action: InstanceAction, port: u16, cause: impl std::fmt::Display) -> Self {
        IcError::InstanceOperation {
            action,
            port,
            message: cause.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, IcError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, IcError>;
