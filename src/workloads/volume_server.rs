//! Desired StatefulSet for the volume servers of a SeaweedFS cluster.
//!
//! Volume servers are independent shards, so pods come up in parallel and every ordinal
//! is eligible for replacement on a template change (partition 0). Pacing a rollout is
//! left to whoever raises the partition.

use super::constants::*;
use super::labels::{labels_for_volume_server, master_name, volume_server_name};
use crate::models::cluster_config::ClusterConfig;
use crate::models::workload_spec::{
    ContainerTemplate, EnvBinding, PodManagementPolicy, PodTemplate, PortSpec, ProbePolicy,
    UpdatePolicy, UpdateStrategy, WorkloadIdentity, WorkloadSpec,
};

/// Builds the volume server workload for `config`.
///
/// Pure and total: the same config always yields the same spec, and nothing about the
/// config is validated here (see `ClusterConfig::from_resource`).
pub fn build(config: &ClusterConfig) -> WorkloadSpec {
    let name = volume_server_name(&config.name);
    let labels = labels_for_volume_server(&config.name);

    WorkloadSpec {
        identity: WorkloadIdentity {
            name: name.clone(),
            namespace: config.namespace.clone(),
            service_name: name,
            labels: labels.clone(),
        },
        replicas: config.volume_server_count,
        update_policy: UpdatePolicy {
            pod_management: PodManagementPolicy::Parallel,
            strategy: UpdateStrategy::RollingUpdate { partition: 0 },
        },
        pod_template: PodTemplate {
            labels,
            enable_service_links: false,
            container: ContainerTemplate {
                name: CONTAINER_NAME.to_string(),
                image: config.image.clone(),
                image_pull_policy: IMAGE_PULL_POLICY.to_string(),
                env: vec![
                    EnvBinding::field_ref("POD_IP", "status.podIP"),
                    EnvBinding::field_ref("POD_NAME", "metadata.name"),
                    EnvBinding::field_ref("NAMESPACE", "metadata.namespace"),
                ],
                command: vec![
                    "/bin/sh".to_string(),
                    "-ec".to_string(),
                    volume_server_command(config),
                ],
                ports: vec![
                    PortSpec {
                        container_port: VOLUME_HTTP_PORT,
                        name: Some(VOLUME_PORT_NAME.to_string()),
                    },
                    PortSpec {
                        container_port: VOLUME_GRPC_PORT,
                        name: None,
                    },
                ],
                readiness: status_probe(
                    READINESS_INITIAL_DELAY_SECONDS,
                    READINESS_FAILURE_THRESHOLD,
                ),
                liveness: status_probe(
                    LIVENESS_INITIAL_DELAY_SECONDS,
                    LIVENESS_FAILURE_THRESHOLD,
                ),
            },
        },
    }
}

/// Shell command line starting `weed volume`.
///
/// `$(POD_NAME)` is expanded by the kubelet from the env binding of the same name, so each
/// pod advertises its own stable `<pod>.<cluster>-volume` address.
pub fn volume_server_command(config: &ClusterConfig) -> String {
    format!(
        "weed volume -port={} -max=0 -ip=$(POD_NAME).{} -mserver={}",
        VOLUME_HTTP_PORT,
        volume_server_name(&config.name),
        master_peers(&config.name, config.master_count)
    )
}

/// Comma separated addresses of master ordinals `0..master_count`.
pub fn master_peers(cluster_name: &str, master_count: i32) -> String {
    let service = master_name(cluster_name);

    (0..master_count)
        .map(|ordinal| format!("{}-{}.{}:{}", service, ordinal, service, MASTER_PORT))
        .collect::<Vec<String>>()
        .join(",")
}

fn status_probe(initial_delay_seconds: i32, failure_threshold: i32) -> ProbePolicy {
    ProbePolicy {
        path: HEALTH_CHECK_PATH.to_string(),
        port: VOLUME_HTTP_PORT,
        initial_delay_seconds,
        timeout_seconds: PROBE_TIMEOUT_SECONDS,
        period_seconds: PROBE_PERIOD_SECONDS,
        success_threshold: PROBE_SUCCESS_THRESHOLD,
        failure_threshold,
    }
}
