//! JavaScript generation for `mysqlsh --js`.
//!
//! Every script prints exactly one result line: `@@icadmin:ok <json>` or
//! `@@icadmin:err <json string>`.

use icadmin_core::gateway::{ConfigureInstanceRequest, RebootRequest};
use icadmin_core::types::InstanceEndpoint;

pub(crate) const OK_MARKER: &str = "@@icadmin:ok ";
pub(crate) const ERR_MARKER: &str = "@@icadmin:err ";

/// A JSON-encoded JavaScript string literal.
pub(crate) fn js_str(s: &str) -> String {
    serde_json::Value::String(s.to_owned()).to_string()
}

fn js_str_list(items: &[String]) -> String {
    let items: Vec<String> = items.iter().map(|s| js_str(s)).collect();
    format!("[{}]", items.join(", "))
}

/// Wrap `expr` so its value (or the thrown message) is printed as a result line.
/// With a session, `shell.connect` runs first inside the same `try`.
pub(crate) fn render(session: Option<&InstanceEndpoint>, expr: &str) -> String {
    let mut script = String::from("try {\n");
    if let Some(ep) = session {
        script.push_str(&format!(
            "  shell.connect({}, {});\n",
            js_str(&ep.uri()),
            js_str(ep.password())
        ));
    }
    script.push_str(&format!("  var __r = {expr};\n"));
    script.push_str(&format!(
        "  println({} + JSON.stringify(__r === undefined ? null : __r));\n",
        js_str(OK_MARKER)
    ));
    script.push_str("} catch (e) {\n");
    script.push_str(&format!(
        "  println({} + JSON.stringify(String(e && e.message ? e.message : e)));\n",
        js_str(ERR_MARKER)
    ));
    script.push_str("}\n");
    script
}

pub(crate) fn deploy_sandbox(port: u16, password: &str) -> String {
    format!(
        "dba.deploySandboxInstance({port}, {{password: {}}})",
        js_str(password)
    )
}

pub(crate) fn stop_sandbox(port: u16, password: &str) -> String {
    format!(
        "dba.stopSandboxInstance({port}, {{password: {}}})",
        js_str(password)
    )
}

pub(crate) fn delete_sandbox(port: u16) -> String {
    format!("dba.deleteSandboxInstance({port})")
}

pub(crate) fn start_sandbox(port: u16) -> String {
    format!("dba.startSandboxInstance({port})")
}

pub(crate) fn session_probe() -> String {
    "shell.getSession().getUri()".to_string()
}

pub(crate) fn create_cluster(name: &str) -> String {
    format!("dba.createCluster({}).getName()", js_str(name))
}

pub(crate) fn get_cluster() -> String {
    "dba.getCluster().getName()".to_string()
}

pub(crate) fn reboot_cluster(req: &RebootRequest) -> String {
    format!(
        "dba.rebootClusterFromCompleteOutage({}, {{password: {}, rejoinInstances: {}, removeInstances: {}}}).getName()",
        js_str(&req.cluster_name),
        js_str(&req.password),
        js_str_list(&req.rejoin_instances),
        js_str_list(&req.remove_instances),
    )
}

pub(crate) fn configure_local_instance(req: &ConfigureInstanceRequest) -> String {
    let mut options = vec![format!("password: {}", js_str(req.target.password()))];
    if let Some(path) = &req.mycnf_path {
        options.push(format!("mycnfPath: {}", js_str(path)));
    }
    if let Some(admin) = &req.cluster_admin {
        options.push(format!("clusterAdmin: {}", js_str(&admin.user)));
        options.push(format!("clusterAdminPassword: {}", js_str(&admin.password)));
    }
    format!(
        "dba.configureLocalInstance({}, {{{}}})",
        js_str(&req.target.uri()),
        options.join(", ")
    )
}

pub(crate) fn cluster_status(name: &str) -> String {
    format!("dba.getCluster({}).status()", js_str(name))
}

pub(crate) fn describe_cluster(name: &str) -> String {
    format!("dba.getCluster({}).describe()", js_str(name))
}

pub(crate) fn add_instance(name: &str, target: &InstanceEndpoint) -> String {
    format!(
        "dba.getCluster({}).addInstance({}, {{password: {}}})",
        js_str(name),
        js_str(&target.uri()),
        js_str(target.password())
    )
}
