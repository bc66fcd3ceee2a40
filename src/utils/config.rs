use std::env;

/// Settings of the operator process itself, read from its environment.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct OperatorConfig {
    /// Only watch `Seaweed` resources in this namespace. Cluster wide when `None`.
    pub watch_namespace: Option<String>,
}

impl OperatorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let watch_namespace = lookup("WATCH_NAMESPACE")
            .map(|namespace| namespace.trim().to_string())
            .filter(|namespace| !namespace.is_empty());

        OperatorConfig { watch_namespace }
    }
}

#[cfg(test)]
mod tests {
    use super::OperatorConfig;

    #[test]
    fn watches_all_namespaces_by_default() {
        let config = OperatorConfig::from_lookup(|_| None);

        assert_eq!(config.watch_namespace, None);
    }

    #[test]
    fn reads_watch_namespace() {
        let config = OperatorConfig::from_lookup(|key| match key {
            "WATCH_NAMESPACE" => Some("storage".to_string()),
            _ => None,
        });

        assert_eq!(config.watch_namespace.as_deref(), Some("storage"));
    }

    #[test]
    fn blank_watch_namespace_means_all() {
        let config = OperatorConfig::from_lookup(|_| Some("  ".to_string()));

        assert_eq!(config.watch_namespace, None);
    }
}
