use anyhow::Result;
use std::path::Path;

use icadmin_core::workflows::AddInstanceParams;

use crate::prompt;

pub struct Args {
    pub cluster_admin: Option<String>,
    pub cluster_admin_password: Option<String>,
    pub cluster_instance_host: Option<String>,
    pub cluster_instance_port: Option<String>,
    pub local_root_password: Option<String>,
    pub local_instance_host: Option<String>,
    pub local_instance_port: Option<String>,
}

pub async fn run(base_dir: &Path, args: Args) -> Result<()> {
    let mut provisioner = super::open_provisioner(base_dir)?;

    super::banner("Add Local Instance to MySQL InnoDB Cluster");

    let params = AddInstanceParams {
        cluster_admin: prompt::text(
            args.cluster_admin,
            "\nPlease enter the name of the InnoDB cluster administrator (Default: dba): ",
            Some("dba"),
        )?,
        cluster_admin_password: prompt::password(
            args.cluster_admin_password,
            "Please enter the password of the InnoDB cluster administrator: ",
        )?,
        cluster_host: prompt::text(
            args.cluster_instance_host,
            "\nPlease enter the domain name or IP address of a cluster instance: ",
            None,
        )?,
        cluster_port: prompt::number(
            args.cluster_instance_port,
            "Please enter the TCP port of the cluster instance (Default: 3306): ",
            3306,
            "clusterInstancePort",
        )?,
        local_root_password: prompt::password(
            args.local_root_password,
            "\nPlease enter the password for the root account of the local instance: ",
        )?,
        local_host: prompt::text(
            args.local_instance_host,
            "\nPlease enter the domain name or IP address of this machine.\n\
             Note that the address has to be an external address (not 127.0.0.1 or localhost): ",
            None,
        )?,
        local_port: prompt::number(
            args.local_instance_port,
            "Please enter the TCP port the local instance is running on (Default: 3306): ",
            3306,
            "localInstancePort",
        )?,
    };

    println!(
        "\nAdding the instance '{}:{}'\nto the InnoDB cluster running on '{}:{}'",
        params.local_host, params.local_port, params.cluster_host, params.cluster_port
    );

    let pb = super::spinner("Adding the instance to the cluster...");
    let result = provisioner.add_local_instance_to_cluster(&params).await;
    pb.finish_and_clear();
    super::save_state(base_dir, &provisioner)?;
    let cluster = result?;

    println!(
        "\nSUCCESS: Instance successfully added to the InnoDB cluster '{}'.",
        cluster.name
    );
    Ok(())
}
