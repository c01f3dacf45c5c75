use anyhow::Result;
use std::path::Path;

use crate::prompt;

pub async fn run(base_dir: &Path, root_password: Option<String>) -> Result<()> {
    let mut provisioner = super::open_provisioner(base_dir)?;

    super::banner("MySQL Sandbox Instances Shutdown");

    let root_password = prompt::password(
        root_password,
        "\nPlease enter the password for the root account: ",
    )?;

    let pb = super::spinner("Shutting down sandbox instances...");
    let report = provisioner.stop_sandbox_instances(&root_password).await;
    pb.finish_and_clear();
    let report = report?;

    super::print_batch(&report);
    println!("\nSUCCESS: Sandbox instances have been shut down.");
    Ok(())
}
