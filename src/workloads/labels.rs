use std::collections::BTreeMap;

pub fn volume_server_name(cluster_name: &str) -> String {
    format!("{}-volume", cluster_name)
}

pub fn master_name(cluster_name: &str) -> String {
    format!("{}-master", cluster_name)
}

/// Labels carried by volume server pods. The StatefulSet selector and the headless service
/// selector both use this set, so per-pod DNS names only resolve while they agree.
pub fn labels_for_volume_server(cluster_name: &str) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert("app".to_string(), "seaweedfs".to_string());
    labels.insert("component".to_string(), "volume".to_string());
    labels.insert("seaweedfs/name".to_string(), cluster_name.to_string());
    labels
}
