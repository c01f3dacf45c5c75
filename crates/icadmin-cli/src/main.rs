mod commands;
mod prompt;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "icadmin")]
#[command(about = "InnoDB cluster provisioning for sandbox and production instances")]
#[command(version)]
struct Cli {
    /// Path to the icadmin config directory (default: ~/.icadmin)
    #[arg(long, global = true, env = "ICADMIN_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration file
    Init,

    /// Show current configuration
    Config,

    /// Deploy sandbox instances and set up a sandbox cluster on them
    #[command(name = "deploySandboxCluster")]
    DeploySandboxCluster {
        /// Number of instances, 1 to 9
        #[arg(allow_negative_numbers = true)]
        instance_count: Option<String>,
        /// Password set for the root account of every instance
        root_password: Option<String>,
    },

    /// Stop and delete all sandbox instances
    #[command(name = "deleteSandboxInstances")]
    DeleteSandboxInstances { root_password: Option<String> },

    /// Stop all sandbox instances
    #[command(name = "stopSandboxInstances")]
    StopSandboxInstances { root_password: Option<String> },

    /// Start the sandbox instances and reboot the sandbox cluster
    #[command(name = "startSandboxCluster")]
    StartSandboxCluster { root_password: Option<String> },

    /// Stop and start the sandbox cluster
    #[command(name = "restartSandboxCluster")]
    RestartSandboxCluster { root_password: Option<String> },

    /// Prepare a local instance for cluster usage
    #[command(name = "prepareLocalInstance")]
    PrepareLocalInstance {
        cluster_admin: Option<String>,
        cluster_admin_password: Option<String>,
        #[arg(allow_negative_numbers = true)]
        local_instance_port: Option<String>,
        root_password: Option<String>,
        /// Option file to update; empty to let the shell locate it
        cnf_path: Option<String>,
    },

    /// Create a cluster seeded on a prepared production instance
    #[command(name = "createProductionCluster")]
    CreateProductionCluster {
        cluster_name: Option<String>,
        cluster_admin: Option<String>,
        cluster_admin_password: Option<String>,
        seed_instance_host: Option<String>,
        #[arg(allow_negative_numbers = true)]
        seed_instance_port: Option<String>,
    },

    /// Add a prepared local instance to an existing cluster
    #[command(name = "addLocalInstanceToCluster")]
    AddLocalInstanceToCluster {
        cluster_admin: Option<String>,
        cluster_admin_password: Option<String>,
        cluster_instance_host: Option<String>,
        #[arg(allow_negative_numbers = true)]
        cluster_instance_port: Option<String>,
        local_root_password: Option<String>,
        local_instance_host: Option<String>,
        #[arg(allow_negative_numbers = true)]
        local_instance_port: Option<String>,
    },

    /// Print the status of the active cluster
    Status {
        /// Password for the session used to query the cluster
        root_password: Option<String>,
        /// Session URI (user@host:port); defaults to the one the active cluster was resolved through
        #[arg(long)]
        uri: Option<String>,
    },

    #[command(external_subcommand)]
    External(Vec<String>),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("icadmin=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let base_dir = match cli.config_dir {
        Some(ref dir) => dir.clone(),
        None => icadmin_core::config::IcAdminConfig::default_base_dir()?,
    };

    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Init => commands::init::run(&base_dir),
        Commands::Config => commands::config::run(&base_dir),
        Commands::DeploySandboxCluster {
            instance_count,
            root_password,
        } => rt.block_on(commands::deploy::run(&base_dir, instance_count, root_password)),
        Commands::DeleteSandboxInstances { root_password } => {
            rt.block_on(commands::delete::run(&base_dir, root_password))
        }
        Commands::StopSandboxInstances { root_password } => {
            rt.block_on(commands::stop::run(&base_dir, root_password))
        }
        Commands::StartSandboxCluster { root_password } => {
            rt.block_on(commands::start::run(&base_dir, root_password))
        }
        Commands::RestartSandboxCluster { root_password } => {
            rt.block_on(commands::restart::run(&base_dir, root_password))
        }
        Commands::PrepareLocalInstance {
            cluster_admin,
            cluster_admin_password,
            local_instance_port,
            root_password,
            cnf_path,
        } => rt.block_on(commands::prepare::run(
            &base_dir,
            commands::prepare::Args {
                cluster_admin,
                cluster_admin_password,
                local_instance_port,
                root_password,
                cnf_path,
            },
        )),
        Commands::CreateProductionCluster {
            cluster_name,
            cluster_admin,
            cluster_admin_password,
            seed_instance_host,
            seed_instance_port,
        } => rt.block_on(commands::create::run(
            &base_dir,
            commands::create::Args {
                cluster_name,
                cluster_admin,
                cluster_admin_password,
                seed_instance_host,
                seed_instance_port,
            },
        )),
        Commands::AddLocalInstanceToCluster {
            cluster_admin,
            cluster_admin_password,
            cluster_instance_host,
            cluster_instance_port,
            local_root_password,
            local_instance_host,
            local_instance_port,
        } => rt.block_on(commands::add::run(
            &base_dir,
            commands::add::Args {
                cluster_admin,
                cluster_admin_password,
                cluster_instance_host,
                cluster_instance_port,
                local_root_password,
                local_instance_host,
                local_instance_port,
            },
        )),
        Commands::Status { root_password, uri } => {
            rt.block_on(commands::status::run(&base_dir, root_password, uri))
        }
        // Unknown command names are ignored.
        Commands::External(_) => Ok(()),
    }
}
