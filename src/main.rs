use futures::stream::StreamExt;
use kube::{api::ListParams, client::Client, Api};
use kube_runtime::controller::{Context, ReconcilerAction};
use kube_runtime::Controller;
use log::{error, info, warn};
use tokio::time::Duration;

use seaweed_volume_operator::controllers::volume_server::VolumeServerController;
use seaweed_volume_operator::models::cluster_config::ClusterConfig;
use seaweed_volume_operator::models::seaweed::Seaweed;
use seaweed_volume_operator::utils::config::OperatorConfig;
use seaweed_volume_operator::utils::error::Error;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let operator_config = OperatorConfig::from_env();

    // The client will later be moved to the custom controller
    let kubernetes_client: Client = Client::try_default()
        .await
        .expect("Expected a valid KUBECONFIG environment variable.");

    let seaweed_api: Api<Seaweed> = match &operator_config.watch_namespace {
        Some(namespace) => Api::namespaced(kubernetes_client.clone(), namespace),
        None => Api::all(kubernetes_client.clone()),
    };
    let context: Context<ContextData> = Context::new(ContextData::new(kubernetes_client.clone()));

    info!(
        "watching Seaweed resources in {}",
        operator_config
            .watch_namespace
            .as_deref()
            .unwrap_or("all namespaces")
    );

    // Objects are applied without owner references, so drift on the StatefulSet is only
    // corrected by the periodic requeue.
    Controller::new(seaweed_api, ListParams::default())
        .run(reconcile, on_error, context)
        .for_each(|reconciliation_result| async move {
            match reconciliation_result {
                Ok((seaweed, _action)) => {
                    info!("Reconciliation successful. Resource: {}", seaweed.name);
                }
                Err(reconciliation_err) => {
                    warn!("Reconciliation error: {:?}", reconciliation_err)
                }
            }
        })
        .await;
}

/// Context injected with each `reconcile` and `on_error` method invocation.
struct ContextData {
    controller: VolumeServerController,
}

impl ContextData {
    /// Constructs a new instance of ContextData.
    ///
    /// # Arguments:
    /// - `client`: A Kubernetes client to make Kubernetes REST API requests with. Volume
    /// server objects will be applied with this client.
    pub fn new(client: Client) -> Self {
        let controller = VolumeServerController::new(client);
        ContextData { controller }
    }
}

async fn reconcile(
    seaweed: Seaweed,
    context: Context<ContextData>,
) -> Result<ReconcilerAction, Error> {
    let config = ClusterConfig::from_resource(&seaweed)?;

    context.get_ref().controller.apply(&config).await?;

    Ok(ReconcilerAction {
        requeue_after: Some(Duration::from_secs(300)),
    })
}

/// Logs the error and requeues the resource for another reconciliation after fifteen seconds.
///
/// # Arguments
/// - `error`: A reference to the `Error` that occurred during reconciliation.
/// - `_context`: Unused argument. Context Data "injected" automatically by kube-rs.
fn on_error(error: &Error, _context: Context<ContextData>) -> ReconcilerAction {
    error!("Reconciliation error:\n{:?}", error);
    ReconcilerAction {
        requeue_after: Some(Duration::from_secs(15)),
    }
}
