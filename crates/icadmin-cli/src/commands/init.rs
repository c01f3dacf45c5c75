use anyhow::Result;
use std::path::Path;

use icadmin_core::config::IcAdminConfig;

pub fn run(base_dir: &Path) -> Result<()> {
    println!("Initializing icadmin in {}", base_dir.display());

    std::fs::create_dir_all(base_dir)?;

    let config_path = IcAdminConfig::default_path(base_dir);
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
    } else {
        IcAdminConfig::default().save(&config_path)?;
        println!("Created config: {}", config_path.display());
    }

    println!("\nicadmin initialized. Next steps:");
    println!("  1. Point [shell] binary at your mysqlsh in {}", config_path.display());
    println!("  2. Run `icadmin deploySandboxCluster` to try a sandbox cluster");

    Ok(())
}
