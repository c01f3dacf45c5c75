pub mod add;
pub mod config;
pub mod create;
pub mod delete;
pub mod deploy;
pub mod init;
pub mod prepare;
pub mod restart;
pub mod start;
pub mod status;
pub mod stop;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

use icadmin_core::config::IcAdminConfig;
use icadmin_core::config::state::ClusterState;
use icadmin_core::workflows::BatchReport;
use icadmin_core::{ClusterContext, IcError, Provisioner};
use icadmin_shell::MysqlShellGateway;

pub type ShellProvisioner = Provisioner<MysqlShellGateway>;

/// Config from `<base_dir>/icadmin.toml`, or defaults when there is none.
pub fn load_config(base_dir: &Path) -> Result<IcAdminConfig> {
    Ok(IcAdminConfig::load_or_default(&IcAdminConfig::default_path(
        base_dir,
    ))?)
}

/// A provisioner driving `mysqlsh`, with the active cluster of the last invocation.
pub fn open_provisioner(base_dir: &Path) -> Result<ShellProvisioner> {
    let config = load_config(base_dir)?;
    let state = ClusterState::load(&ClusterState::default_path(base_dir))?;
    tracing::debug!(
        base_dir = %base_dir.display(),
        binary = %config.shell.binary,
        active = ?state.cluster.as_ref().map(|c| c.name.as_str()),
        "Opening provisioner"
    );
    let gateway = MysqlShellGateway::from_settings(&config.shell);
    Ok(Provisioner::from_config(
        gateway,
        ClusterContext::from_state(state),
        &config,
    ))
}

/// Persist the active cluster for the next invocation.
pub fn save_state(base_dir: &Path, provisioner: &ShellProvisioner) -> Result<()> {
    provisioner
        .context()
        .to_state()
        .save(&ClusterState::default_path(base_dir))?;
    Ok(())
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

pub fn banner(title: &str) {
    println!();
    println!("{title}");
    println!("{}", "=".repeat(title.len()));
}

pub fn print_failures(failures: &[IcError]) {
    for failure in failures {
        println!("INFO: {failure}");
    }
}

pub fn print_batch(report: &BatchReport) {
    print_failures(&report.failures);
    if report.failures.is_empty() {
        println!("All {} instances handled without errors.", report.visited.len());
    }
}

pub fn join_ports(ports: &[u16]) -> String {
    ports
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
