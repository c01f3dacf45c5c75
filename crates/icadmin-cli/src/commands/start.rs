use anyhow::Result;
use std::path::Path;

use icadmin_core::workflows::StartReport;

use crate::prompt;

pub async fn run(base_dir: &Path, root_password: Option<String>) -> Result<()> {
    let mut provisioner = super::open_provisioner(base_dir)?;

    super::banner("MySQL Sandbox Cluster Start");

    let root_password = prompt::password(
        root_password,
        "\nPlease enter the password for the root account: ",
    )?;

    let pb = super::spinner("Starting the sandbox cluster...");
    let result = provisioner.start_sandbox_cluster(&root_password).await;
    pb.finish_and_clear();
    super::save_state(base_dir, &provisioner)?;

    print_started(&result?);
    Ok(())
}

pub fn print_started(report: &StartReport) {
    println!("Cluster '{}' rebooted from its seed instance.", report.cluster.name);
    if !report.batch.visited.is_empty() {
        println!("Started instances on ports {}.", super::join_ports(&report.batch.visited));
    }
    super::print_failures(&report.batch.failures);
    println!(
        "\nSUCCESS: InnoDB cluster successfully restarted. \
         Run `icadmin status` to get status information about the cluster."
    );
}
