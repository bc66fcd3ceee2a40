use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::api::ObjectMeta;

use super::constants::{VOLUME_GRPC_PORT, VOLUME_GRPC_PORT_NAME, VOLUME_HTTP_PORT, VOLUME_PORT_NAME};
use super::labels::{labels_for_volume_server, volume_server_name};
use crate::models::cluster_config::ClusterConfig;

/// Headless service governing the volume server StatefulSet.
///
/// Publishes `<pod>.<cluster>-volume` records for every pod, ready or not, which is the
/// address each volume server advertises to the masters with `-ip`.
pub fn build_headless_service(config: &ClusterConfig) -> Service {
    Service {
        metadata: ObjectMeta {
            name: Some(volume_server_name(&config.name)),
            namespace: Some(config.namespace.clone()),
            labels: Some(labels_for_volume_server(&config.name)),
            ..ObjectMeta::default()
        },
        spec: Some(ServiceSpec {
            cluster_ip: Some("None".to_string()),
            publish_not_ready_addresses: Some(true),
            selector: Some(labels_for_volume_server(&config.name)),
            ports: Some(vec![
                service_port(VOLUME_PORT_NAME, VOLUME_HTTP_PORT),
                service_port(VOLUME_GRPC_PORT_NAME, VOLUME_GRPC_PORT),
            ]),
            ..ServiceSpec::default()
        }),
        ..Service::default()
    }
}

fn service_port(name: &str, port: i32) -> ServicePort {
    ServicePort {
        name: Some(name.to_string()),
        port,
        target_port: Some(IntOrString::Int(port)),
        protocol: Some("TCP".to_string()),
        ..ServicePort::default()
    }
}
