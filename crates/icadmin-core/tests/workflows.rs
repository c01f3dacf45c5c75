mod common;

use common::{Call, Op, StubGateway, provisioner};
use icadmin_core::IcError;
use icadmin_core::config::SandboxSettings;
use icadmin_core::types::ClusterHandle;
use icadmin_core::workflows::{AddInstanceParams, PrepareInstanceParams, ProductionClusterParams};

const SANDBOX_PORTS: [u16; 9] = [3310, 3320, 3330, 3340, 3350, 3360, 3370, 3380, 3390];

fn prepare_params() -> PrepareInstanceParams {
    PrepareInstanceParams {
        cluster_admin: "dba".into(),
        cluster_admin_password: "bazinga".into(),
        port: 3306,
        root_password: "foobar".into(),
        cnf_path: "/etc/mysql/mysql.conf.d/mysqld.cnf".into(),
    }
}

fn production_params() -> ProductionClusterParams {
    ProductionClusterParams {
        cluster_name: "devCluster".into(),
        cluster_admin: "dba".into(),
        cluster_admin_password: "foobar".into(),
        hostname: "192.168.1.123".into(),
        port: 3306,
    }
}

fn add_params() -> AddInstanceParams {
    AddInstanceParams {
        cluster_admin: "dba".into(),
        cluster_admin_password: "bazinga".into(),
        cluster_host: "10.0.0.5".into(),
        cluster_port: 3306,
        local_root_password: "foobar".into(),
        local_host: "10.0.0.7".into(),
        local_port: 3307,
    }
}

// ── Validation ──────────────────────────────────────────────

#[tokio::test]
async fn deploy_rejects_out_of_range_count_without_calls() {
    for count in [Some(0), Some(10), Some(-3), None] {
        let mut p = provisioner(StubGateway::new());
        let err = p.deploy_sandbox_cluster(count, "pass1234").await.unwrap_err();
        assert!(err.is_validation(), "count {count:?} gave {err}");
        assert!(p.gateway().calls().is_empty());
        assert!(p.context().peek().is_none());
    }
}

#[tokio::test]
async fn deploy_rejects_unchecked_sandbox_layout_without_calls() {
    let layouts = [
        SandboxSettings {
            base_port: 65530,
            ..SandboxSettings::default()
        },
        SandboxSettings {
            slots: 12,
            ..SandboxSettings::default()
        },
    ];
    for sandbox in layouts {
        let mut p = provisioner(StubGateway::new()).with_sandbox(sandbox);
        let err = p.deploy_sandbox_cluster(Some(9), "pass1234").await.unwrap_err();
        assert!(matches!(err, IcError::Config(_)), "got {err}");
        assert!(p.gateway().calls().is_empty());
    }
}

#[tokio::test]
async fn short_passwords_rejected_by_every_workflow() {
    for pw in ["", "abc"] {
        let mut p = provisioner(StubGateway::new());
        assert!(p.deploy_sandbox_cluster(Some(3), pw).await.unwrap_err().is_validation());
        assert!(p.delete_sandbox_instances(pw).await.unwrap_err().is_validation());
        assert!(p.stop_sandbox_instances(pw).await.unwrap_err().is_validation());
        assert!(p.start_sandbox_cluster(pw).await.unwrap_err().is_validation());
        assert!(p.restart_sandbox_cluster(pw).await.unwrap_err().is_validation());

        let params = PrepareInstanceParams {
            root_password: pw.into(),
            ..prepare_params()
        };
        assert!(p.prepare_local_instance(&params).await.unwrap_err().is_validation());

        let params = ProductionClusterParams {
            cluster_admin_password: pw.into(),
            ..production_params()
        };
        assert!(p.create_production_cluster(&params).await.unwrap_err().is_validation());

        let params = AddInstanceParams {
            local_root_password: pw.into(),
            ..add_params()
        };
        assert!(p.add_local_instance_to_cluster(&params).await.unwrap_err().is_validation());

        assert!(p.gateway().calls().is_empty());
    }
}

#[tokio::test]
async fn production_rejects_bad_host_and_port() {
    let mut p = provisioner(StubGateway::new());
    let params = ProductionClusterParams {
        hostname: "not a host".into(),
        ..production_params()
    };
    assert!(p.create_production_cluster(&params).await.unwrap_err().is_validation());

    let params = ProductionClusterParams {
        port: 80,
        ..production_params()
    };
    assert!(p.create_production_cluster(&params).await.unwrap_err().is_validation());

    let params = AddInstanceParams {
        local_host: "".into(),
        ..add_params()
    };
    assert!(p.add_local_instance_to_cluster(&params).await.unwrap_err().is_validation());
    assert!(p.gateway().calls().is_empty());
}

// ── Sandbox deploy ──────────────────────────────────────────

#[tokio::test]
async fn deploy_three_instances_end_to_end() {
    let mut p = provisioner(StubGateway::new().online_after(2));
    let report = p.deploy_sandbox_cluster(Some(3), "pass1234").await.unwrap();

    assert_eq!(report.ports, vec![3310, 3320, 3330]);
    assert!(report.seed_online);
    assert!(report.all_online);
    assert!(report.join_failures.is_empty());
    assert_eq!(report.reconfigured, vec![3310, 3320, 3330]);
    assert_eq!(report.last_view.member_count(), 3);
    assert_eq!(p.context().peek(), Some(&report.cluster));
    assert_eq!(report.cluster.name, "sandboxCluster");

    let gw = p.gateway();
    assert_eq!(
        gw.calls_of(Op::Deploy),
        vec![Call::Deploy(3310), Call::Deploy(3320), Call::Deploy(3330)]
    );
    assert_eq!(
        gw.calls_of(Op::Connect),
        vec![Call::Connect("root@localhost:3310".into())]
    );
    assert_eq!(
        gw.calls_of(Op::AddInstance),
        vec![
            Call::AddInstance("root@localhost:3320".into()),
            Call::AddInstance("root@localhost:3330".into()),
        ]
    );
    assert_eq!(gw.calls_of(Op::Configure).len(), 3);
}

#[tokio::test]
async fn deploy_issues_calls_in_order() {
    let mut p = provisioner(StubGateway::new());
    p.deploy_sandbox_cluster(Some(2), "pass1234").await.unwrap();

    let ops: Vec<Call> = p.gateway().calls();
    let create = ops
        .iter()
        .position(|c| matches!(c, Call::CreateCluster(_)))
        .unwrap();
    let last_deploy = ops
        .iter()
        .rposition(|c| matches!(c, Call::Deploy(_)))
        .unwrap();
    let connect = ops.iter().position(|c| matches!(c, Call::Connect(_))).unwrap();
    let join = ops
        .iter()
        .position(|c| matches!(c, Call::AddInstance(_)))
        .unwrap();
    let first_configure = ops
        .iter()
        .position(|c| matches!(c, Call::Configure { .. }))
        .unwrap();
    assert!(last_deploy < connect);
    assert!(connect < create);
    assert!(create < join);
    assert!(join < first_configure);
}

#[tokio::test]
async fn deploy_single_instance_skips_joins() {
    let mut p = provisioner(StubGateway::new());
    let report = p.deploy_sandbox_cluster(Some(1), "pass1234").await.unwrap();
    assert!(p.gateway().calls_of(Op::AddInstance).is_empty());
    assert_eq!(report.reconfigured, vec![3310]);
}

#[tokio::test]
async fn deploy_failure_aborts_before_cluster_creation() {
    let gw = StubGateway::new().failing_port(Op::Deploy, 3320);
    let mut p = provisioner(gw);
    let err = p.deploy_sandbox_cluster(Some(3), "pass1234").await.unwrap_err();

    match &err {
        IcError::Provisioning(msg) => {
            assert!(msg.contains("3320"), "{msg}");
            assert!(msg.contains("stub failure"), "{msg}");
        }
        other => panic!("expected Provisioning, got {other:?}"),
    }
    assert!(p.gateway().calls_of(Op::CreateCluster).is_empty());
    assert!(p.gateway().calls_of(Op::Deploy).len() == 2);
    assert!(p.context().peek().is_none());
}

#[tokio::test]
async fn deploy_session_or_create_failure_is_provisioning_error() {
    for op in [Op::Connect, Op::CreateCluster] {
        let mut p = provisioner(StubGateway::new().failing(op));
        let err = p.deploy_sandbox_cluster(Some(2), "pass1234").await.unwrap_err();
        assert!(matches!(err, IcError::Provisioning(_)), "{op:?}: {err}");
        assert!(p.context().peek().is_none());
    }
}

#[tokio::test]
async fn deploy_join_failure_is_recorded_not_fatal() {
    let gw = StubGateway::new().failing_port(Op::AddInstance, 3320);
    let mut p = provisioner(gw);
    let report = p.deploy_sandbox_cluster(Some(3), "pass1234").await.unwrap();

    assert_eq!(report.join_failures.len(), 1);
    assert!(matches!(
        report.join_failures[0],
        IcError::InstanceOperation { port: 3320, .. }
    ));
    // Both joins were attempted.
    assert_eq!(p.gateway().calls_of(Op::AddInstance).len(), 2);
    assert!(p.context().peek().is_some());
}

#[tokio::test]
async fn deploy_without_convergence_skips_reconfigure_but_succeeds() {
    let mut p = provisioner(StubGateway::new().never_online());
    let report = p.deploy_sandbox_cluster(Some(3), "pass1234").await.unwrap();

    assert!(!report.seed_online);
    assert!(!report.all_online);
    assert!(report.reconfigured.is_empty());
    assert!(p.gateway().calls_of(Op::Configure).is_empty());
    // Seed poll and member poll both ran to the attempt limit.
    assert_eq!(p.gateway().calls_of(Op::Status).len(), 20);
    // Joins still happened after the seed timeout.
    assert_eq!(p.gateway().calls_of(Op::AddInstance).len(), 2);
    assert_eq!(p.context().peek(), Some(&report.cluster));
}

#[tokio::test]
async fn deploy_configure_failure_is_fatal() {
    let gw = StubGateway::new().failing_port(Op::Configure, 3330);
    let mut p = provisioner(gw);
    let err = p.deploy_sandbox_cluster(Some(3), "pass1234").await.unwrap_err();
    assert!(matches!(err, IcError::Provisioning(_)));
    assert!(p.context().peek().is_none());
}

// ── Sandbox teardown / stop / start ─────────────────────────

#[tokio::test]
async fn delete_visits_all_ports_even_when_everything_fails() {
    let gw = StubGateway::new()
        .failing(Op::Stop)
        .failing(Op::Delete);
    let mut p = provisioner(gw);
    p.context_mut()
        .set_active(ClusterHandle::new("sandboxCluster", "root@localhost:3310"));

    let report = p.delete_sandbox_instances("pass1234").await.unwrap();

    assert_eq!(report.visited, SANDBOX_PORTS.to_vec());
    assert_eq!(report.failures.len(), 18);
    assert_eq!(p.gateway().calls_of(Op::Stop).len(), 9);
    assert_eq!(p.gateway().calls_of(Op::Delete).len(), 9);
    assert!(p.context().peek().is_none());
}

#[tokio::test]
async fn delete_stops_before_deleting_each_port() {
    let mut p = provisioner(StubGateway::new());
    p.delete_sandbox_instances("pass1234").await.unwrap();
    let calls = p.gateway().calls();
    assert_eq!(calls[0], Call::Stop(3310));
    assert_eq!(calls[1], Call::Delete(3310));
    assert_eq!(calls[17], Call::Delete(3390));
}

#[tokio::test]
async fn stop_visits_ports_in_descending_order() {
    let gw = StubGateway::new().failing_port(Op::Stop, 3350);
    let mut p = provisioner(gw);
    let report = p.stop_sandbox_instances("pass1234").await.unwrap();

    let mut expected = SANDBOX_PORTS.to_vec();
    expected.reverse();
    assert_eq!(report.visited, expected);
    assert!(report.visited.windows(2).all(|w| w[0] > w[1]));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(p.gateway().calls_of(Op::Stop).len(), 9);
}

#[tokio::test]
async fn start_reboots_from_seed_then_starts_other_members() {
    let gw = StubGateway::new()
        .with_describe_hosts(&["localhost:3310", "localhost:3320", "localhost:3330"])
        .failing_port(Op::Start, 3330);
    let mut p = provisioner(gw);
    let report = p.start_sandbox_cluster("pass1234").await.unwrap();

    let calls = p.gateway().calls();
    assert_eq!(calls[0], Call::Start(3310));
    assert_eq!(calls[1], Call::Connect("root@localhost:3310".into()));
    assert_eq!(calls[2], Call::Reboot("sandboxCluster".into()));
    assert_eq!(report.batch.visited, vec![3320, 3330]);
    assert_eq!(report.batch.failures.len(), 1);
    assert_eq!(p.context().peek(), Some(&report.cluster));
}

#[tokio::test]
async fn start_reboot_failure_is_fatal() {
    let mut p = provisioner(StubGateway::new().failing(Op::Reboot));
    let err = p.start_sandbox_cluster("pass1234").await.unwrap_err();
    assert!(matches!(err, IcError::Reboot(_)));
    assert!(p.gateway().calls_of(Op::Describe).is_empty());
    assert!(p.context().peek().is_none());
}

#[tokio::test]
async fn start_seed_failure_is_reboot_error() {
    let mut p = provisioner(StubGateway::new().failing_port(Op::Start, 3310));
    let err = p.start_sandbox_cluster("pass1234").await.unwrap_err();
    assert!(matches!(err, IcError::Reboot(_)));
    assert!(p.gateway().calls_of(Op::Connect).is_empty());
}

#[tokio::test]
async fn start_describe_failure_keeps_rebooted_cluster_active() {
    let mut p = provisioner(StubGateway::new().failing(Op::Describe));
    let err = p.start_sandbox_cluster("pass1234").await.unwrap_err();
    assert!(matches!(err, IcError::ClusterOperation { .. }));
    assert!(p.context().peek().is_some());
}

#[tokio::test]
async fn restart_stops_everything_before_starting() {
    let gw = StubGateway::new().with_describe_hosts(&["localhost:3310", "localhost:3320"]);
    let mut p = provisioner(gw);
    let report = p.restart_sandbox_cluster("pass1234").await.unwrap();

    assert_eq!(report.stopped.visited.len(), 9);
    assert_eq!(report.started.batch.visited, vec![3320]);
    let calls = p.gateway().calls();
    let last_stop = calls.iter().rposition(|c| matches!(c, Call::Stop(_))).unwrap();
    let first_start = calls.iter().position(|c| matches!(c, Call::Start(_))).unwrap();
    assert!(last_stop < first_start);
}

// ── Production workflows ────────────────────────────────────

#[tokio::test]
async fn prepare_passes_cnf_path_only_when_given() {
    let mut p = provisioner(StubGateway::new());
    p.prepare_local_instance(&prepare_params()).await.unwrap();
    let params = PrepareInstanceParams {
        cnf_path: String::new(),
        ..prepare_params()
    };
    p.prepare_local_instance(&params).await.unwrap();

    assert_eq!(
        p.gateway().calls(),
        vec![
            Call::Configure {
                uri: "root@localhost:3306".into(),
                mycnf_path: Some("/etc/mysql/mysql.conf.d/mysqld.cnf".into()),
                cluster_admin: Some("dba".into()),
            },
            Call::Configure {
                uri: "root@localhost:3306".into(),
                mycnf_path: None,
                cluster_admin: Some("dba".into()),
            },
        ]
    );
}

#[tokio::test]
async fn prepare_failure_is_surfaced() {
    let mut p = provisioner(StubGateway::new().failing(Op::Configure));
    let err = p.prepare_local_instance(&prepare_params()).await.unwrap_err();
    assert!(err.to_string().contains("could not be configured"));
    assert!(err.to_string().contains("stub failure"));
}

#[tokio::test]
async fn create_production_cluster_sets_active() {
    let mut p = provisioner(StubGateway::new());
    let cluster = p.create_production_cluster(&production_params()).await.unwrap();

    assert_eq!(cluster.name, "devCluster");
    assert_eq!(cluster.session_uri, "dba@192.168.1.123:3306");
    assert_eq!(p.context().peek(), Some(&cluster));
    assert_eq!(
        p.gateway().calls(),
        vec![
            Call::Connect("dba@192.168.1.123:3306".into()),
            Call::CreateCluster("devCluster".into()),
        ]
    );
}

#[tokio::test]
async fn create_production_cluster_session_failure() {
    let mut p = provisioner(StubGateway::new().failing(Op::Connect));
    let err = p.create_production_cluster(&production_params()).await.unwrap_err();
    match err {
        IcError::Session { uri, .. } => assert_eq!(uri, "dba@192.168.1.123:3306"),
        other => panic!("expected Session, got {other:?}"),
    }
    assert!(p.gateway().calls_of(Op::CreateCluster).is_empty());
}

#[tokio::test]
async fn create_production_cluster_create_failure() {
    let mut p = provisioner(StubGateway::new().failing(Op::CreateCluster));
    let err = p.create_production_cluster(&production_params()).await.unwrap_err();
    assert!(matches!(err, IcError::ClusterOperation { .. }));
    assert!(p.context().peek().is_none());
}

#[tokio::test]
async fn add_local_instance_joins_and_sets_active() {
    let mut p = provisioner(StubGateway::new());
    let cluster = p.add_local_instance_to_cluster(&add_params()).await.unwrap();

    assert_eq!(
        p.gateway().calls(),
        vec![
            Call::Connect("dba@10.0.0.5:3306".into()),
            Call::GetCluster,
            Call::AddInstance("dba@10.0.0.7:3307".into()),
        ]
    );
    assert_eq!(p.context().peek(), Some(&cluster));
}

#[tokio::test]
async fn add_local_instance_failure_leaves_active_cluster_unchanged() {
    let previous = ClusterHandle::new("sandboxCluster", "root@localhost:3310");
    let mut p = provisioner(StubGateway::new().failing(Op::AddInstance));
    p.context_mut().set_active(previous.clone());

    let err = p.add_local_instance_to_cluster(&add_params()).await.unwrap_err();
    match &err {
        IcError::ClusterOperation { context, .. } => {
            assert!(context.contains("dba@10.0.0.7:3307"), "{context}")
        }
        other => panic!("expected ClusterOperation, got {other:?}"),
    }
    assert_eq!(p.context().peek(), Some(&previous));
}

#[tokio::test]
async fn add_local_instance_errors_are_distinct_per_step() {
    let mut p = provisioner(StubGateway::new().failing(Op::Connect));
    let err = p.add_local_instance_to_cluster(&add_params()).await.unwrap_err();
    assert!(matches!(err, IcError::Session { .. }));

    let mut p = provisioner(StubGateway::new().failing(Op::GetCluster));
    let err = p.add_local_instance_to_cluster(&add_params()).await.unwrap_err();
    assert!(err.to_string().contains("could not be retrieved"));
    assert!(p.gateway().calls_of(Op::AddInstance).is_empty());
}

// ── Status ──────────────────────────────────────────────────

#[tokio::test]
async fn status_without_cluster_or_session_fails() {
    let mut p = provisioner(StubGateway::new());
    let err = p.status().await.unwrap_err();
    assert!(matches!(err, IcError::NoActiveCluster));
    assert!(p.gateway().calls().is_empty());
}

#[tokio::test]
async fn status_after_deploy_reports_members() {
    let mut p = provisioner(StubGateway::new());
    p.deploy_sandbox_cluster(Some(3), "pass1234").await.unwrap();
    let view = p.status().await.unwrap();
    assert_eq!(view.cluster_name, "sandboxCluster");
    assert_eq!(view.member_count(), 3);
    assert_eq!(view.primary, "localhost:3310");
}

#[tokio::test]
async fn status_after_delete_has_no_cluster() {
    let mut p = provisioner(StubGateway::new());
    p.context_mut()
        .set_active(ClusterHandle::new("sandboxCluster", "root@localhost:3310"));
    p.delete_sandbox_instances("pass1234").await.unwrap();
    assert!(p.context().peek().is_none());
}
