use anyhow::Result;
use std::path::Path;

use crate::prompt;

pub async fn run(base_dir: &Path, root_password: Option<String>) -> Result<()> {
    let mut provisioner = super::open_provisioner(base_dir)?;

    super::banner("MySQL InnoDB Sandbox Instance Deletion");
    println!("Stopping and removing all possible sandbox instances...");

    let root_password = prompt::password(
        root_password,
        "\nPlease enter the password for the root account: ",
    )?;

    let pb = super::spinner("Removing sandbox instances...");
    let result = provisioner.delete_sandbox_instances(&root_password).await;
    pb.finish_and_clear();
    super::save_state(base_dir, &provisioner)?;
    let report = result?;

    super::print_batch(&report);
    println!("\nSUCCESS: Sandbox instances have been deleted.");
    Ok(())
}
