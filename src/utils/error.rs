/// Utility enum that covers all possible errors during reconciliation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Any error originating from the `kube-rs` crate
    #[error("Kubernetes reported error: {source}")]
    KubeError {
        #[from]
        source: kube::Error,
    },

    /// Error in user input or Seaweed resource definition, typically missing fields.
    #[error("Invalid Seaweed CRD: {0}")]
    UserInputError(String),
}
