use anyhow::Result;
use std::path::Path;

use icadmin_core::IcError;
use icadmin_core::status::render_status;
use icadmin_core::types::InstanceEndpoint;

use crate::prompt;

/// Each invocation is a new process, so a session is opened first: through
/// `uri` if given, else through the URI the active cluster was resolved with.
pub async fn run(base_dir: &Path, root_password: Option<String>, uri: Option<String>) -> Result<()> {
    let mut provisioner = super::open_provisioner(base_dir)?;

    let uri = uri
        .or_else(|| provisioner.context().peek().map(|c| c.session_uri.clone()))
        .ok_or(IcError::NoActiveCluster)?;
    let password = prompt::password(root_password, &format!("Please enter the password for '{uri}': "))?;
    let endpoint = InstanceEndpoint::from_uri(&uri, &password)?;

    provisioner.open_session(&endpoint).await?;
    let view = provisioner.status().await?;
    super::save_state(base_dir, &provisioner)?;

    println!();
    print!("{}", render_status(&view));
    println!();
    Ok(())
}
