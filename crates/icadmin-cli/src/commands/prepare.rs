use anyhow::Result;
use std::path::Path;

use icadmin_core::workflows::PrepareInstanceParams;

use crate::prompt;

pub struct Args {
    pub cluster_admin: Option<String>,
    pub cluster_admin_password: Option<String>,
    pub local_instance_port: Option<String>,
    pub root_password: Option<String>,
    pub cnf_path: Option<String>,
}

pub async fn run(base_dir: &Path, args: Args) -> Result<()> {
    let mut provisioner = super::open_provisioner(base_dir)?;

    super::banner("MySQL InnoDB Cluster Instance Preparation");
    println!("Preparing an instance for InnoDB cluster usage ...");

    let params = PrepareInstanceParams {
        cluster_admin: prompt::text(
            args.cluster_admin,
            "\nPlease enter a name for the InnoDB cluster administrator (Default: dba): ",
            Some("dba"),
        )?,
        cluster_admin_password: prompt::new_password(
            args.cluster_admin_password,
            "Please enter a password for the InnoDB cluster administrator (At least 4 characters): ",
            "Please repeat the password for the InnoDB cluster administrator: ",
        )?,
        port: prompt::number(
            args.local_instance_port,
            "\nPlease enter the TCP port the MySQL instance is running on (Default: 3306): ",
            3306,
            "localInstancePort",
        )?,
        root_password: prompt::password(
            args.root_password,
            "\nPlease enter the password for the root account of the local instance: ",
        )?,
        cnf_path: prompt::text(
            args.cnf_path,
            "\nPlease enter the path of the MySQL option file (my.cnf)\n\
             or leave empty to let the shell locate it: ",
            Some(""),
        )?,
    };

    let pb = super::spinner("Configuring the local instance...");
    let result = provisioner.prepare_local_instance(&params).await;
    pb.finish_and_clear();
    result?;

    println!(
        "\nSUCCESS: The instance configuration has been prepared for InnoDB cluster usage.\n\
         NOTE: The instance now needs to be restarted to adopt the updated configuration."
    );
    Ok(())
}
