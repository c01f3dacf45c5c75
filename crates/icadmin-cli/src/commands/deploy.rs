use anyhow::Result;
use std::path::Path;

use crate::prompt;

pub async fn run(
    base_dir: &Path,
    instance_count: Option<String>,
    root_password: Option<String>,
) -> Result<()> {
    let mut provisioner = super::open_provisioner(base_dir)?;
    let slots = provisioner.sandbox().slots;

    super::banner("MySQL InnoDB Cluster Sandbox Setup");

    let count = prompt::number(
        instance_count,
        &format!(
            "\nPlease enter the number of instances for this sandbox cluster.\n\
             Choose a number between 1 and {slots}, with 3 being the default: "
        ),
        3,
        "instanceCount",
    )?;
    let root_password = prompt::password(
        root_password,
        "\nPlease enter the password that will be set for the root account.\n\
         The password has to consist of 4 characters or more: ",
    )?;

    if let Ok(n) = u16::try_from(count) {
        if (1..=slots).contains(&n) {
            let ports = provisioner.sandbox_ports(n);
            println!(
                "\nSetting up a MySQL InnoDB cluster with {n} MySQL Server sandbox instance{}.",
                if n > 1 { "s" } else { "" }
            );
            println!(
                "The instances will be running on port{} {}.\n",
                if n > 1 { "s" } else { "" },
                super::join_ports(&ports)
            );
        }
    }

    let pb = super::spinner("Deploying sandbox cluster...");
    let result = provisioner
        .deploy_sandbox_cluster(Some(count), &root_password)
        .await;
    pb.finish_and_clear();
    super::save_state(base_dir, &provisioner)?;
    let report = result?;

    println!("Sandbox instances deployed on ports {}.", super::join_ports(&report.ports));
    if report.seed_online {
        println!("Seed instance reached ONLINE status.");
    } else {
        println!("Seed instance has not reached ONLINE status yet.");
    }
    super::print_failures(&report.join_failures);
    if report.all_online {
        println!("All instances reached ONLINE status.");
        println!("Instances re-configured: {}.", super::join_ports(&report.reconfigured));
    } else {
        println!(
            "Some instances have not reached ONLINE status yet. \
             Please allow more time for them to catch up to the seed instance."
        );
    }

    println!(
        "\nSUCCESS: InnoDB cluster '{}' deployed successfully. \
         Run `icadmin status` to get status information about the cluster.",
        report.cluster.name
    );
    Ok(())
}
