use super::Provisioner;
use crate::error::{IcError, Result};
use crate::gateway::{AddInstanceRequest, AdminGateway, ClusterAdmin, ConfigureInstanceRequest};
use crate::types::{ClusterHandle, InstanceEndpoint};
use crate::validate::{self, MIN_PASSWORD_LEN};

const LOCAL_HOST: &str = "localhost";
const ROOT_USER: &str = "root";

/// Arguments of [`Provisioner::prepare_local_instance`].
#[derive(Clone)]
pub struct PrepareInstanceParams {
    pub cluster_admin: String,
    pub cluster_admin_password: String,
    pub port: i64,
    pub root_password: String,
    /// Empty to let the admin API locate the option file.
    pub cnf_path: String,
}

/// Arguments of [`Provisioner::create_production_cluster`].
#[derive(Clone)]
pub struct ProductionClusterParams {
    pub cluster_name: String,
    pub cluster_admin: String,
    pub cluster_admin_password: String,
    /// External address of the seed host, not `localhost`.
    pub hostname: String,
    pub port: i64,
}

/// Arguments of [`Provisioner::add_local_instance_to_cluster`].
#[derive(Clone)]
pub struct AddInstanceParams {
    pub cluster_admin: String,
    pub cluster_admin_password: String,
    pub cluster_host: String,
    pub cluster_port: i64,
    pub local_root_password: String,
    pub local_host: String,
    pub local_port: i64,
}

impl<G: AdminGateway> Provisioner<G> {
    /// Persist the settings a local instance needs for cluster membership and
    /// create the cluster admin account. The instance must be restarted afterwards.
    pub async fn prepare_local_instance(&mut self, params: &PrepareInstanceParams) -> Result<()> {
        validate::require_non_empty(&params.cluster_admin, "clusterAdmin")?;
        validate::require_password(
            &params.cluster_admin_password,
            MIN_PASSWORD_LEN,
            "clusterAdminPassword",
        )?;
        let port = validate::require_port(params.port, "localInstancePort")?;
        validate::require_password(&params.root_password, MIN_PASSWORD_LEN, "rootPassword")?;

        let target = InstanceEndpoint::new(ROOT_USER, &params.root_password, LOCAL_HOST, port);
        let mycnf_path = Some(params.cnf_path.clone()).filter(|p| !p.is_empty());
        tracing::info!(instance = %target, ?mycnf_path, "Preparing instance for cluster usage");

        self.gateway
            .configure_local_instance(&ConfigureInstanceRequest {
                target,
                mycnf_path,
                cluster_admin: Some(ClusterAdmin {
                    user: params.cluster_admin.clone(),
                    password: params.cluster_admin_password.clone(),
                }),
            })
            .await
            .map_err(|e| IcError::cluster_op("The local instance could not be configured", e))
    }

    /// Create a cluster seeded on `admin@hostname:port`. The new cluster becomes the active one.
    pub async fn create_production_cluster(
        &mut self,
        params: &ProductionClusterParams,
    ) -> Result<ClusterHandle> {
        validate::require_non_empty(&params.cluster_name, "clusterName")?;
        validate::require_non_empty(&params.cluster_admin, "clusterAdmin")?;
        validate::require_password(
            &params.cluster_admin_password,
            MIN_PASSWORD_LEN,
            "clusterAdminPassword",
        )?;
        validate::require_host(&params.hostname, "seedInstanceHost")?;
        let port = validate::require_port(params.port, "seedInstancePort")?;

        let seed = InstanceEndpoint::new(
            &params.cluster_admin,
            &params.cluster_admin_password,
            &params.hostname,
            port,
        );
        self.open_session(&seed).await?;

        let cluster = self
            .gateway
            .create_cluster(&params.cluster_name)
            .await
            .map_err(|e| IcError::cluster_op("The InnoDB cluster could not be created", e))?;
        tracing::info!(cluster = %cluster, "Production cluster created");

        self.context.set_active(cluster.clone());
        Ok(cluster)
    }

    /// Join a local instance to the cluster reachable at `cluster_host:cluster_port`.
    /// The cluster becomes the active one; on failure the active cluster is left as it was.
    pub async fn add_local_instance_to_cluster(
        &mut self,
        params: &AddInstanceParams,
    ) -> Result<ClusterHandle> {
        validate::require_non_empty(&params.cluster_admin, "clusterAdmin")?;
        validate::require_password(
            &params.cluster_admin_password,
            MIN_PASSWORD_LEN,
            "clusterAdminPassword",
        )?;
        validate::require_host(&params.cluster_host, "clusterInstanceHostname")?;
        let cluster_port = validate::require_port(params.cluster_port, "clusterInstancePort")?;
        validate::require_password(
            &params.local_root_password,
            MIN_PASSWORD_LEN,
            "localRootPassword",
        )?;
        validate::require_host(&params.local_host, "localInstanceHostname")?;
        let local_port = validate::require_port(params.local_port, "localInstancePort")?;

        let cluster_endpoint = InstanceEndpoint::new(
            &params.cluster_admin,
            &params.cluster_admin_password,
            &params.cluster_host,
            cluster_port,
        );
        // The admin account is created on every prepared instance, so it is used for the join too.
        let local_endpoint = InstanceEndpoint::new(
            &params.cluster_admin,
            &params.cluster_admin_password,
            &params.local_host,
            local_port,
        );
        tracing::info!(
            instance = %local_endpoint.address(),
            cluster_instance = %cluster_endpoint.address(),
            "Adding local instance to cluster"
        );

        self.open_session(&cluster_endpoint).await?;

        let cluster = self
            .gateway
            .get_cluster()
            .await
            .map_err(|e| IcError::cluster_op("The InnoDB cluster could not be retrieved", e))?;

        let uri = local_endpoint.uri();
        self.gateway
            .add_instance(
                &cluster,
                &AddInstanceRequest {
                    target: local_endpoint,
                },
            )
            .await
            .map_err(|e| {
                IcError::cluster_op(
                    format!("The instance '{uri}' could not be added to the cluster"),
                    e,
                )
            })?;

        self.context.set_active(cluster.clone());
        Ok(cluster)
    }
}
