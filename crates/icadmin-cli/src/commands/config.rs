use anyhow::Result;
use std::path::Path;

use icadmin_core::config::IcAdminConfig;
use icadmin_core::config::state::ClusterState;

pub fn run(base_dir: &Path) -> Result<()> {
    let config_path = IcAdminConfig::default_path(base_dir);
    let config = super::load_config(base_dir)?;

    if config_path.exists() {
        println!("Config: {}", config_path.display());
    } else {
        println!("Config: {} (not found, using defaults)", config_path.display());
    }
    println!();
    println!("  Shell binary:     {}", config.shell.binary);
    if !config.shell.extra_args.is_empty() {
        println!("  Shell arguments:  {}", config.shell.extra_args.join(" "));
    }
    println!(
        "  Sandbox ports:    {}",
        super::join_ports(&config.sandbox.all_ports())
    );
    println!("  Sandbox cluster:  {}", config.sandbox.cluster_name);
    println!(
        "  Sandbox account:  {}@{}",
        config.sandbox.user, config.sandbox.host
    );
    println!(
        "  Convergence:      {} attempts, {}s apart",
        config.convergence.max_attempts, config.convergence.interval_secs
    );
    println!();

    let state = ClusterState::load(&ClusterState::default_path(base_dir))?;
    match state.cluster {
        Some(cluster) => println!("  Active cluster:   {cluster}"),
        None => println!("  No active cluster."),
    }

    Ok(())
}
