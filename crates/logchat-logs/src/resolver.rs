use std::collections::BTreeSet;

use logchat_k8s::{ClusterApi, ClusterError};
use logchat_types::Diagnostic;

/// Why pod resolution produced no targets
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("pod '{pod}' not found in namespace '{namespace}'")]
    NotFound { pod: String, namespace: String },

    #[error("error fetching pods in namespace '{namespace}': {source}")]
    ListFailed {
        namespace: String,
        source: ClusterError,
    },
}

impl ResolveError {
    /// The single line shown to the user instead of logs
    pub fn into_diagnostic(self) -> Diagnostic {
        match self {
            Self::NotFound { pod, namespace } => Diagnostic::PodNotFound { pod, namespace },
            Self::ListFailed { namespace, source } => Diagnostic::PodListFailed {
                namespace,
                detail: source.to_string(),
            },
        }
    }
}

/// Decides which pods of a namespace a request should inspect
pub struct PodResolver<'a, C> {
    cluster: &'a C,
}

impl<'a, C: ClusterApi> PodResolver<'a, C> {
    pub fn new(cluster: &'a C) -> Self {
        Self { cluster }
    }

    /// Sorted pod names of a namespace.
    ///
    /// Lookup failures are logged and yield an empty set.
    pub async fn list_pods(&self, namespace: &str) -> BTreeSet<String> {
        match self.cluster.list_pods(namespace).await {
            Ok(pods) => pods.into_iter().map(|p| p.name).collect(),
            Err(e) => {
                tracing::error!(namespace, error = %e, "error fetching pods");
                BTreeSet::new()
            }
        }
    }

    /// Pods to inspect, in the order the cluster lists them.
    ///
    /// A named pod must exist in the namespace; without one every pod is a target.
    pub async fn resolve_targets(
        &self,
        namespace: &str,
        pod: Option<&str>,
    ) -> Result<Vec<String>, ResolveError> {
        if let Some(pod) = pod {
            let pods = self.list_pods(namespace).await;
            if !pods.contains(pod) {
                return Err(ResolveError::NotFound {
                    pod: pod.to_string(),
                    namespace: namespace.to_string(),
                });
            }
            return Ok(vec![pod.to_string()]);
        }

        let pods = self
            .cluster
            .list_pods(namespace)
            .await
            .map_err(|source| ResolveError::ListFailed {
                namespace: namespace.to_string(),
                source,
            })?;

        Ok(pods.into_iter().map(|p| p.name).collect())
    }
}
