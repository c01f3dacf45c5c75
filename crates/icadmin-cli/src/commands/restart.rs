use anyhow::Result;
use std::path::Path;

use crate::prompt;

pub async fn run(base_dir: &Path, root_password: Option<String>) -> Result<()> {
    let mut provisioner = super::open_provisioner(base_dir)?;

    super::banner("MySQL Sandbox Cluster Restart");

    let root_password = prompt::password(
        root_password,
        "\nPlease enter the password for the root account: ",
    )?;

    let pb = super::spinner("Restarting the sandbox cluster...");
    let result = provisioner.restart_sandbox_cluster(&root_password).await;
    pb.finish_and_clear();
    super::save_state(base_dir, &provisioner)?;
    let report = result?;

    println!(
        "Stopped {} sandbox instance slots.",
        report.stopped.visited.len()
    );
    super::print_failures(&report.stopped.failures);
    super::start::print_started(&report.started);
    Ok(())
}
