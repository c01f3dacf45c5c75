use anyhow::Result;
use std::path::Path;

use icadmin_core::workflows::ProductionClusterParams;

use crate::prompt;

pub struct Args {
    pub cluster_name: Option<String>,
    pub cluster_admin: Option<String>,
    pub cluster_admin_password: Option<String>,
    pub seed_instance_host: Option<String>,
    pub seed_instance_port: Option<String>,
}

pub async fn run(base_dir: &Path, args: Args) -> Result<()> {
    let mut provisioner = super::open_provisioner(base_dir)?;

    super::banner("MySQL InnoDB Cluster Setup");
    println!("Setting up a MySQL InnoDB cluster on this machine ...");

    let params = ProductionClusterParams {
        cluster_name: prompt::text(
            args.cluster_name,
            "\nPlease enter a name for the InnoDB cluster (Default: devCluster): ",
            Some("devCluster"),
        )?,
        cluster_admin: prompt::text(
            args.cluster_admin,
            "\nPlease enter a name for the InnoDB cluster administrator (Default: dba): ",
            Some("dba"),
        )?,
        cluster_admin_password: prompt::password(
            args.cluster_admin_password,
            "Please enter a password for the InnoDB cluster administrator: ",
        )?,
        hostname: prompt::text(
            args.seed_instance_host,
            "\nPlease enter the domain name or IP address of this machine.\n\
             Note that the address has to be an external address (not 127.0.0.1 or localhost): ",
            None,
        )?,
        port: prompt::number(
            args.seed_instance_port,
            "\nPlease enter the TCP port the MySQL instance is running on (Default: 3306): ",
            3306,
            "seedInstancePort",
        )?,
    };

    let pb = super::spinner("Creating the InnoDB cluster...");
    let result = provisioner.create_production_cluster(&params).await;
    pb.finish_and_clear();
    super::save_state(base_dir, &provisioner)?;
    let cluster = result?;

    println!(
        "\nSUCCESS: InnoDB cluster '{}' deployed successfully. \
         Run `icadmin status` to get status information about the cluster.",
        cluster.name
    );
    Ok(())
}
