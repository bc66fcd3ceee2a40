use k8s_openapi::api::apps::v1::{
    RollingUpdateStatefulSetStrategy, StatefulSet, StatefulSetSpec, StatefulSetUpdateStrategy,
};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvVar, EnvVarSource, HTTPGetAction, ObjectFieldSelector, PodSpec,
    PodTemplateSpec, Probe,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::api::ObjectMeta;
use std::collections::BTreeMap;
use std::time::Duration;

/// Desired state of a volume server StatefulSet.
///
/// Built in one go by `workloads::volume_server::build` and never mutated afterwards. Use
/// `to_statefulset` to get the object submitted to the API server.
#[derive(Debug, PartialEq, Clone)]
pub struct WorkloadSpec {
    pub identity: WorkloadIdentity,
    pub replicas: i32,
    pub update_policy: UpdatePolicy,
    pub pod_template: PodTemplate,
}

#[derive(Debug, PartialEq, Clone)]
pub struct WorkloadIdentity {
    pub name: String,
    pub namespace: String,

    // governing headless service, gives each pod `<pod-name>.<service_name>`
    pub service_name: String,

    // applied to pods and used verbatim as the selector
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PodManagementPolicy {
    OrderedReady,
    Parallel,
}

impl PodManagementPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PodManagementPolicy::OrderedReady => "OrderedReady",
            PodManagementPolicy::Parallel => "Parallel",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UpdateStrategy {
    /// Replace pods with ordinal >= `partition` whenever the template changes.
    RollingUpdate { partition: i32 },
    OnDelete,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct UpdatePolicy {
    pub pod_management: PodManagementPolicy,
    pub strategy: UpdateStrategy,
}

#[derive(Debug, PartialEq, Clone)]
pub struct PodTemplate {
    pub labels: BTreeMap<String, String>,
    pub enable_service_links: bool,
    pub container: ContainerTemplate,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ContainerTemplate {
    pub name: String,
    pub image: String,
    pub image_pull_policy: String,
    pub env: Vec<EnvBinding>,
    pub command: Vec<String>,
    pub ports: Vec<PortSpec>,
    pub readiness: ProbePolicy,
    pub liveness: ProbePolicy,
}

/// Where the value of an environment variable comes from.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum EnvSource {
    /// Known when the workload is built.
    Literal(String),
    /// Field path on the running pod, resolved by the kubelet at container start.
    FieldRef(String),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct EnvBinding {
    pub name: String,
    pub source: EnvSource,
}

impl EnvBinding {
    pub fn field_ref(name: &str, field_path: &str) -> Self {
        EnvBinding {
            name: name.to_string(),
            source: EnvSource::FieldRef(field_path.to_string()),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PortSpec {
    pub container_port: i32,
    pub name: Option<String>,
}

/// Periodic HTTP health check and the thresholds that turn results into a verdict.
///
/// Durations are whole seconds as the kubelet takes them.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ProbePolicy {
    pub path: String,
    pub port: i32,
    pub initial_delay_seconds: i32,
    pub timeout_seconds: i32,
    pub period_seconds: i32,
    pub success_threshold: i32,
    pub failure_threshold: i32,
}

impl ProbePolicy {
    pub fn initial_delay(&self) -> Duration {
        seconds(self.initial_delay_seconds)
    }

    pub fn period(&self) -> Duration {
        seconds(self.period_seconds)
    }

    pub fn timeout(&self) -> Duration {
        seconds(self.timeout_seconds)
    }

    /// Earliest time after container start at which a container that never answers can be
    /// judged unhealthy: every attempt up to the failure threshold has to time out first.
    pub fn deadline_for_failure(&self) -> Duration {
        let attempts_before_last = self.failure_threshold.max(1) as u32 - 1;
        self.initial_delay() + self.period() * attempts_before_last + self.timeout()
    }

    fn to_probe(&self) -> Probe {
        Probe {
            http_get: Some(HTTPGetAction {
                path: Some(self.path.clone()),
                port: IntOrString::Int(self.port),
                scheme: Some("HTTP".to_string()),
                ..Default::default()
            }),
            initial_delay_seconds: Some(self.initial_delay_seconds),
            timeout_seconds: Some(self.timeout_seconds),
            period_seconds: Some(self.period_seconds),
            success_threshold: Some(self.success_threshold),
            failure_threshold: Some(self.failure_threshold),
            ..Default::default()
        }
    }
}

fn seconds(value: i32) -> Duration {
    Duration::from_secs(value.max(0) as u64)
}

impl WorkloadSpec {
    /// Renders this workload as the `StatefulSet` the API server understands.
    pub fn to_statefulset(&self) -> StatefulSet {
        StatefulSet {
            metadata: ObjectMeta {
                name: Some(self.identity.name.clone()),
                namespace: Some(self.identity.namespace.clone()),
                ..ObjectMeta::default()
            },
            spec: Some(StatefulSetSpec {
                service_name: self.identity.service_name.clone(),
                pod_management_policy: Some(self.update_policy.pod_management.as_str().to_string()),
                replicas: Some(self.replicas),
                update_strategy: Some(self.update_policy.strategy.to_update_strategy()),
                selector: LabelSelector {
                    match_labels: Some(self.identity.labels.clone()),
                    ..LabelSelector::default()
                },
                template: self.pod_template.to_pod_template_spec(),
                ..StatefulSetSpec::default()
            }),
            ..StatefulSet::default()
        }
    }
}

impl UpdateStrategy {
    fn to_update_strategy(&self) -> StatefulSetUpdateStrategy {
        match self {
            UpdateStrategy::RollingUpdate { partition } => StatefulSetUpdateStrategy {
                type_: Some("RollingUpdate".to_string()),
                rolling_update: Some(RollingUpdateStatefulSetStrategy {
                    partition: Some(*partition),
                    ..Default::default()
                }),
            },
            UpdateStrategy::OnDelete => StatefulSetUpdateStrategy {
                type_: Some("OnDelete".to_string()),
                rolling_update: None,
            },
        }
    }
}

impl PodTemplate {
    fn to_pod_template_spec(&self) -> PodTemplateSpec {
        PodTemplateSpec {
            metadata: Some(ObjectMeta {
                labels: Some(self.labels.clone()),
                ..ObjectMeta::default()
            }),
            spec: Some(PodSpec {
                enable_service_links: Some(self.enable_service_links),
                containers: vec![self.container.to_container()],
                ..PodSpec::default()
            }),
        }
    }
}

impl ContainerTemplate {
    fn to_container(&self) -> Container {
        Container {
            name: self.name.clone(),
            image: Some(self.image.clone()),
            image_pull_policy: Some(self.image_pull_policy.clone()),
            env: Some(self.env.iter().map(EnvBinding::to_env_var).collect()),
            command: Some(self.command.clone()),
            ports: Some(
                self.ports
                    .iter()
                    .map(|port| ContainerPort {
                        container_port: port.container_port,
                        name: port.name.clone(),
                        ..ContainerPort::default()
                    })
                    .collect(),
            ),
            readiness_probe: Some(self.readiness.to_probe()),
            liveness_probe: Some(self.liveness.to_probe()),
            ..Container::default()
        }
    }
}

impl EnvBinding {
    fn to_env_var(&self) -> EnvVar {
        match &self.source {
            EnvSource::Literal(value) => EnvVar {
                name: self.name.clone(),
                value: Some(value.clone()),
                value_from: None,
            },
            EnvSource::FieldRef(field_path) => EnvVar {
                name: self.name.clone(),
                value: None,
                value_from: Some(EnvVarSource {
                    field_ref: Some(ObjectFieldSelector {
                        field_path: field_path.clone(),
                        ..ObjectFieldSelector::default()
                    }),
                    ..EnvVarSource::default()
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::time::Duration;

    use super::{EnvBinding, EnvSource, PodManagementPolicy, UpdateStrategy};
    use crate::models::cluster_config::ClusterConfig;
    use crate::workloads::volume_server::build;

    fn rendered() -> serde_json::Value {
        let spec = build(&ClusterConfig::new("demo", "ops", "swfs:3", 3));
        serde_json::to_value(spec.to_statefulset()).unwrap()
    }

    #[test]
    fn renders_statefulset_metadata_and_policy() {
        let statefulset = rendered();

        assert_eq!(statefulset["metadata"]["name"], "demo-volume");
        assert_eq!(statefulset["metadata"]["namespace"], "ops");
        assert_eq!(statefulset["spec"]["serviceName"], "demo-volume");
        assert_eq!(statefulset["spec"]["replicas"], 3);
        assert_eq!(statefulset["spec"]["podManagementPolicy"], "Parallel");
        assert_eq!(
            statefulset["spec"]["updateStrategy"],
            json!({ "type": "RollingUpdate", "rollingUpdate": { "partition": 0 } })
        );
    }

    #[test]
    fn selector_matches_pod_labels() {
        let statefulset = rendered();

        assert_eq!(
            statefulset["spec"]["selector"]["matchLabels"],
            statefulset["spec"]["template"]["metadata"]["labels"]
        );
    }

    #[test]
    fn renders_container() {
        let statefulset = rendered();
        let pod = &statefulset["spec"]["template"]["spec"];
        let container = &pod["containers"][0];

        assert_eq!(pod["enableServiceLinks"], false);
        assert_eq!(pod["containers"].as_array().unwrap().len(), 1);
        assert_eq!(container["name"], "seaweedfs");
        assert_eq!(container["image"], "swfs:3");
        assert_eq!(container["imagePullPolicy"], "IfNotPresent");
        assert_eq!(
            container["ports"],
            json!([
                { "containerPort": 8444, "name": "swfs-volume" },
                { "containerPort": 18444 }
            ])
        );
        assert_eq!(
            container["env"][0],
            json!({ "name": "POD_IP", "valueFrom": { "fieldRef": { "fieldPath": "status.podIP" } } })
        );
    }

    #[test]
    fn renders_http_probes() {
        let statefulset = rendered();
        let container = &statefulset["spec"]["template"]["spec"]["containers"][0];

        assert_eq!(
            container["readinessProbe"],
            json!({
                "httpGet": { "path": "/status", "port": 8444, "scheme": "HTTP" },
                "initialDelaySeconds": 15,
                "timeoutSeconds": 5,
                "periodSeconds": 90,
                "successThreshold": 1,
                "failureThreshold": 100
            })
        );
        assert_eq!(container["livenessProbe"]["initialDelaySeconds"], 20);
        assert_eq!(container["livenessProbe"]["failureThreshold"], 6);
    }

    #[test]
    fn literal_env_renders_as_value() {
        let binding = EnvBinding {
            name: "WEED_DIR".to_string(),
            source: EnvSource::Literal("/data".to_string()),
        };

        assert_eq!(
            serde_json::to_value(binding.to_env_var()).unwrap(),
            json!({ "name": "WEED_DIR", "value": "/data" })
        );
    }

    #[test]
    fn pod_management_policy_names() {
        let mut spec = build(&ClusterConfig::new("demo", "ops", "swfs:3", 3));
        spec.update_policy.pod_management = PodManagementPolicy::OrderedReady;

        assert_eq!(PodManagementPolicy::Parallel.as_str(), "Parallel");
        assert_eq!(
            spec.to_statefulset().spec.unwrap().pod_management_policy.as_deref(),
            Some("OrderedReady")
        );
    }

    #[test]
    fn on_delete_has_no_rolling_update() {
        let strategy = UpdateStrategy::OnDelete.to_update_strategy();

        assert_eq!(strategy.type_.as_deref(), Some("OnDelete"));
        assert!(strategy.rolling_update.is_none());
    }

    #[test]
    fn failure_deadlines() {
        let spec = build(&ClusterConfig::new("demo", "ops", "swfs:3", 3));
        let container = &spec.pod_template.container;

        // 15 + 99 * 90 + 5
        assert_eq!(
            container.readiness.deadline_for_failure(),
            Duration::from_secs(8930)
        );
        // 20 + 5 * 90 + 5
        assert_eq!(
            container.liveness.deadline_for_failure(),
            Duration::from_secs(475)
        );
    }
}
