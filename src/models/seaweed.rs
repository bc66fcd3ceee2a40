use kube_derive::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Desired state of a SeaweedFS cluster as authored by the user.
///
/// ```yaml
/// apiVersion: seaweed.seaweedfs.com/v1
/// kind: Seaweed
/// metadata:
///   name: fs1
///   namespace: storage
/// spec:
///   image: chrislusf/seaweedfs:latest
///   volumeServerCount: 3
/// ```
#[derive(CustomResource, Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "seaweed.seaweedfs.com",
    version = "v1",
    kind = "Seaweed",
    plural = "seaweeds",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct SeaweedSpec {
    /// Container image for every SeaweedFS process in the cluster.
    pub image: String,

    /// Number of volume server replicas.
    #[serde(default)]
    pub volume_server_count: i32,
}

#[cfg(test)]
mod tests {
    use super::{Seaweed, SeaweedSpec};

    #[test]
    fn spec_deserializes_camel_case() {
        let spec: SeaweedSpec = serde_json::from_str(
            r#"{ "image": "chrislusf/seaweedfs:2.96", "volumeServerCount": 4 }"#,
        )
        .unwrap();

        assert_eq!(spec.image, "chrislusf/seaweedfs:2.96");
        assert_eq!(spec.volume_server_count, 4);
    }

    #[test]
    fn volume_server_count_defaults_to_zero() {
        let spec: SeaweedSpec =
            serde_json::from_str(r#"{ "image": "chrislusf/seaweedfs:2.96" }"#).unwrap();

        assert_eq!(spec.volume_server_count, 0);
    }

    #[test]
    fn new_sets_name_and_spec() {
        let seaweed = Seaweed::new(
            "fs1",
            SeaweedSpec {
                image: "swfs:3".to_string(),
                volume_server_count: 2,
            },
        );

        assert_eq!(seaweed.metadata.name.as_deref(), Some("fs1"));
        assert_eq!(seaweed.spec.volume_server_count, 2);
    }
}
