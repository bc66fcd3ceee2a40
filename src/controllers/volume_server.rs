use k8s_openapi::api::apps::v1::StatefulSet;
use k8s_openapi::api::core::v1::Service;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client};
use log::{debug, info};

use crate::models::cluster_config::ClusterConfig;
use crate::utils::error::Error;
use crate::workloads::volume_server;
use crate::workloads::volume_service::build_headless_service;

pub const FIELD_MANAGER: &str = "seaweed-operator";

/// Submits the generated volume server objects to the API server.
pub struct VolumeServerController {
    client: Client,
}

impl VolumeServerController {
    pub fn new(client: Client) -> Self {
        VolumeServerController { client }
    }

    /// Server-side applies the headless service and the StatefulSet for `config`.
    ///
    /// The service goes first so pod DNS names exist by the time volume servers register
    /// with the masters.
    ///
    /// # Arguments
    /// - `config` - The cluster whose volume servers should exist.
    pub async fn apply(&self, config: &ClusterConfig) -> Result<StatefulSet, Error> {
        let params = PatchParams::apply(FIELD_MANAGER).force();

        let service = build_headless_service(config);
        let service_name = service.metadata.name.clone().unwrap_or_default();
        let service_api: Api<Service> = Api::namespaced(self.client.clone(), &config.namespace);
        service_api
            .patch(&service_name, &params, &Patch::Apply(&service))
            .await?;
        debug!("applied service {}/{}", config.namespace, service_name);

        let workload = volume_server::build(config);
        debug!(
            "built volume server workload {}/{} with {} replicas",
            config.namespace, workload.identity.name, workload.replicas
        );
        let statefulset_api: Api<StatefulSet> =
            Api::namespaced(self.client.clone(), &config.namespace);
        let statefulset = statefulset_api
            .patch(
                &workload.identity.name,
                &params,
                &Patch::Apply(&workload.to_statefulset()),
            )
            .await?;

        info!(
            "applied statefulset {}/{} with {} replicas",
            config.namespace, workload.identity.name, workload.replicas
        );

        Ok(statefulset)
    }
}
