use kube::ResourceExt;

use super::seaweed::Seaweed;
use crate::utils::error::Error;
use crate::workloads::constants::DEFAULT_MASTER_COUNT;

/// Everything the workload builders need to know about a cluster.
///
/// Values are assumed well formed: `name` is a DNS label and both counts are
/// non-negative. `from_resource` is where that is checked.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ClusterConfig {
    pub name: String,
    pub namespace: String,
    pub image: String,
    pub volume_server_count: i32,

    // size of the master quorum volume servers register with
    pub master_count: i32,
}

impl ClusterConfig {
    pub fn new(name: &str, namespace: &str, image: &str, volume_server_count: i32) -> Self {
        ClusterConfig {
            name: name.to_string(),
            namespace: namespace.to_string(),
            image: image.to_string(),
            volume_server_count,
            master_count: DEFAULT_MASTER_COUNT,
        }
    }

    /// Derives a `ClusterConfig` from a `Seaweed` resource.
    ///
    /// # Arguments
    /// - `seaweed`: The resource being reconciled. It must be namespaced and must not ask for
    /// a negative number of volume servers.
    pub fn from_resource(seaweed: &Seaweed) -> Result<Self, Error> {
        let namespace = match seaweed.namespace() {
            None => {
                return Err(Error::UserInputError(
                    "Expected Seaweed resource to be namespaced. Can't deploy to an unknown namespace."
                        .to_owned(),
                ));
            }
            Some(namespace) => namespace,
        };

        if seaweed.spec.volume_server_count < 0 {
            return Err(Error::UserInputError(format!(
                "volumeServerCount must not be negative, got {}",
                seaweed.spec.volume_server_count
            )));
        }

        Ok(ClusterConfig::new(
            &seaweed.name(),
            &namespace,
            &seaweed.spec.image,
            seaweed.spec.volume_server_count,
        ))
    }
}
