use std::future::Future;

use logchat_types::PodSummary;

use crate::ClusterError;

/// Cluster operations the log pipeline needs.
///
/// Implementations are shared read-only across requests; futures are `Send` so
/// they can be awaited from HTTP handlers.
pub trait ClusterApi: Send + Sync {
    /// Names of all namespaces, in the order the API returns them
    fn list_namespaces(&self) -> impl Future<Output = Result<Vec<String>, ClusterError>> + Send;

    /// All pods in a namespace with their container names
    fn list_pods(
        &self,
        namespace: &str,
    ) -> impl Future<Output = Result<Vec<PodSummary>, ClusterError>> + Send;

    /// A single pod by name
    fn get_pod(
        &self,
        namespace: &str,
        name: &str,
    ) -> impl Future<Output = Result<PodSummary, ClusterError>> + Send;

    /// The last `tail_lines` lines of a container's log as one text blob
    fn container_logs(
        &self,
        namespace: &str,
        pod: &str,
        container: &str,
        tail_lines: i64,
        timestamps: bool,
    ) -> impl Future<Output = Result<String, ClusterError>> + Send;
}
