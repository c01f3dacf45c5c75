pub mod state;

use crate::error::{IcError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level icadmin configuration stored as TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IcAdminConfig {
    #[serde(default)]
    pub shell: ShellSettings,
    #[serde(default)]
    pub sandbox: SandboxSettings,
    #[serde(default)]
    pub convergence: ConvergenceSettings,
}

/// How the admin shell binary is launched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellSettings {
    /// Path to (or name of) the `mysqlsh` binary.
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Extra arguments passed before the generated script.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            extra_args: vec![],
        }
    }
}

fn default_binary() -> String {
    "mysqlsh".to_string()
}

/// Most sandbox instances a deployment may ask for.
pub const MAX_SANDBOX_SLOTS: u16 = 9;

/// Lowest port a sandbox instance may listen on.
pub const MIN_SANDBOX_PORT: u16 = 1024;

/// Layout of the local sandbox cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxSettings {
    /// Port of the seed instance; instance `i` listens on `base_port + port_step * i`.
    #[serde(default = "default_base_port")]
    pub base_port: u16,
    #[serde(default = "default_port_step")]
    pub port_step: u16,
    /// Number of sandbox ports teardown and stop always visit.
    #[serde(default = "default_slots")]
    pub slots: u16,
    #[serde(default = "default_cluster_name")]
    pub cluster_name: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_user")]
    pub user: String,
}

impl Default for SandboxSettings {
    fn default() -> Self {
        Self {
            base_port: default_base_port(),
            port_step: default_port_step(),
            slots: default_slots(),
            cluster_name: default_cluster_name(),
            host: default_host(),
            user: default_user(),
        }
    }
}

impl SandboxSettings {
    /// Port of the sandbox instance at `index` (0-based), if it fits in a u16.
    pub fn port(&self, index: u16) -> Option<u16> {
        self.port_step
            .checked_mul(index)
            .and_then(|offset| self.base_port.checked_add(offset))
    }

    pub fn seed_port(&self) -> u16 {
        self.base_port
    }

    /// Ports of the first `count` instances, in provisioning order. Stops at
    /// the first port past `u16::MAX`.
    pub fn ports(&self, count: u16) -> Vec<u16> {
        (0..count).map_while(|i| self.port(i)).collect()
    }

    /// Every port a sandbox instance may occupy, in provisioning order.
    pub fn all_ports(&self) -> Vec<u16> {
        self.ports(self.slots)
    }

    /// Reject layouts whose slots fall outside 1..=9, below port 1024 or past `u16::MAX`.
    pub fn check(&self) -> Result<()> {
        if !(1..=MAX_SANDBOX_SLOTS).contains(&self.slots) {
            return Err(IcError::Config(format!(
                "sandbox.slots must be between 1 and {MAX_SANDBOX_SLOTS}, got {}",
                self.slots
            )));
        }
        if self.port_step == 0 {
            return Err(IcError::Config(
                "sandbox.port_step must be positive".to_string(),
            ));
        }
        if self.base_port < MIN_SANDBOX_PORT {
            return Err(IcError::Config(format!(
                "sandbox.base_port must be at least {MIN_SANDBOX_PORT}, got {}",
                self.base_port
            )));
        }
        if self.port(self.slots - 1).is_none() {
            let last = u32::from(self.base_port)
                + u32::from(self.port_step) * u32::from(self.slots - 1);
            return Err(IcError::Config(format!(
                "sandbox ports overflow: last port would be {last}"
            )));
        }
        Ok(())
    }
}

fn default_base_port() -> u16 {
    3310
}

fn default_port_step() -> u16 {
    10
}

fn default_slots() -> u16 {
    9
}

fn default_cluster_name() -> String {
    "sandboxCluster".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_user() -> String {
    "root".to_string()
}

/// Bounds of the wait for members to report ONLINE.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergenceSettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for ConvergenceSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_secs: default_interval_secs(),
        }
    }
}

impl ConvergenceSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

fn default_max_attempts() -> u32 {
    10
}

fn default_interval_secs() -> u64 {
    1
}

impl IcAdminConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(IcError::ConfigNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| IcError::TomlDe(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Load config if the file exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| IcError::TomlSer(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    fn check(&self) -> Result<()> {
        self.sandbox.check()
    }

    /// Resolve the config file path: `<base_dir>/icadmin.toml`
    pub fn default_path(base_dir: &Path) -> PathBuf {
        base_dir.join("icadmin.toml")
    }

    /// Resolve the default icadmin home directory: `~/.icadmin`
    pub fn default_base_dir() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|h| h.join(".icadmin"))
            .ok_or_else(|| IcError::Config("Cannot determine home directory".to_string()))
    }
}
