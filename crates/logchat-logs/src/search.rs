use logchat_k8s::{ClusterApi, ClusterError};
use logchat_types::{Diagnostic, Query};

use crate::{LogFormatter, LogRetriever, PodResolver};

/// Tunables for a log search
#[derive(Clone, Debug)]
pub struct SearchSettings {
    /// Pods fetched concurrently per request
    pub max_concurrent_pods: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_concurrent_pods: 8,
        }
    }
}

/// Resolve, retrieve and format logs for one request.
///
/// Holds the cluster handle created at startup; `None` means the client could
/// not be initialized and every request degrades to a single diagnostic.
pub struct LogSearch<C> {
    cluster: Option<C>,
    settings: SearchSettings,
}

impl<C: ClusterApi> LogSearch<C> {
    pub fn new(cluster: Option<C>, settings: SearchSettings) -> Self {
        Self { cluster, settings }
    }

    pub fn cluster(&self) -> Option<&C> {
        self.cluster.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.cluster.is_some()
    }

    /// Sorted namespace names
    pub async fn list_namespaces(&self) -> Result<Vec<String>, ClusterError> {
        let cluster = self.cluster.as_ref().ok_or(ClusterError::Unavailable)?;
        let mut namespaces = cluster.list_namespaces().await?;
        namespaces.sort();
        Ok(namespaces)
    }

    /// Sorted pod names, empty when the cluster is unavailable or the lookup fails
    pub async fn list_pods(&self, namespace: &str) -> Vec<String> {
        match &self.cluster {
            Some(cluster) => PodResolver::new(cluster)
                .list_pods(namespace)
                .await
                .into_iter()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Run a query against `namespace`, optionally restricted to one pod.
    ///
    /// Always returns at least one display line.
    pub async fn run(
        &self,
        namespace: &str,
        query: &Query,
        pod: Option<&str>,
        limit: i64,
    ) -> Vec<String> {
        let Some(cluster) = &self.cluster else {
            return vec![Diagnostic::ClientUnavailable.to_string()];
        };

        let targets = match PodResolver::new(cluster)
            .resolve_targets(namespace, pod)
            .await
        {
            Ok(targets) => targets,
            Err(e) => {
                tracing::warn!(namespace, error = %e, "pod resolution failed");
                return vec![e.into_diagnostic().to_string()];
            }
        };

        let lines = LogRetriever::new(cluster)
            .with_concurrency(self.settings.max_concurrent_pods)
            .fetch(namespace, query, &targets, limit)
            .await;

        let output = LogFormatter::format(lines);
        tracing::info!(
            namespace,
            pods = targets.len(),
            lines = output.len(),
            "log search complete"
        );
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logchat_k8s::testing::FakeCluster;
    use logchat_query::interpret;

    fn search(cluster: FakeCluster) -> LogSearch<FakeCluster> {
        LogSearch::new(Some(cluster), SearchSettings::default())
    }

    #[tokio::test]
    async fn test_unavailable_cluster() {
        let search: LogSearch<FakeCluster> = LogSearch::new(None, SearchSettings::default());
        let out = search.run("prod", &Query::default(), None, 50).await;
        assert_eq!(out, vec!["kubernetes client is not initialized"]);
        assert!(search.list_pods("prod").await.is_empty());
        assert_eq!(
            search.list_namespaces().await,
            Err(ClusterError::Unavailable)
        );
    }

    #[tokio::test]
    async fn test_missing_pod_never_fetches_logs() {
        let search = search(
            FakeCluster::new()
                .with_pod("prod", "web-0", &["app"])
                .with_logs("web-0", "app", &["t1 error"]),
        );

        let out = search
            .run("prod", &interpret("error", None), Some("web-9"), 50)
            .await;

        assert_eq!(out, vec!["pod 'web-9' not found in namespace 'prod'"]);
        assert_eq!(search.cluster().map(|c| c.log_fetches()), Some(0));
    }

    #[tokio::test]
    async fn test_end_to_end_job_query() {
        let search = search(
            FakeCluster::new()
                .with_pod("myns", "worker-abc", &["worker", "istio-proxy"])
                .with_logs(
                    "worker-abc",
                    "worker",
                    &[
                        "2024-05-01T12:00:00Z starting",
                        "2024-05-01T12:00:01Z ERROR cannot reach db",
                        "2024-05-01T12:00:02Z error: retry budget exhausted",
                    ],
                )
                .with_logs("worker-abc", "istio-proxy", &["2024-05-01T12:00:00Z error proxy"]),
        );

        let query = interpret("show error logs job myns/worker", Some("default"));
        let namespace = query.namespace.clone().unwrap();
        let out = search.run(&namespace, &query, None, 50).await;

        assert_eq!(
            out,
            vec![
                "   1. [worker-abc/worker] 2024-05-01T12:00:01Z ERROR cannot reach db",
                "   2. [worker-abc/worker] 2024-05-01T12:00:02Z error: retry budget exhausted",
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_pod_contributes_nothing() {
        let search = search(
            FakeCluster::new()
                .with_pod("prod", "a", &["app"])
                .with_pod("prod", "b", &["app"])
                .with_pod("prod", "c", &["app"])
                .with_logs("a", "app", &["t1 boom", "t2 boom", "t3 ok"])
                .with_logs("b", "app", &["t1 ok"])
                .with_logs("c", "app", &["t1 boom"]),
        );

        let out = search
            .run("prod", &interpret(r#"find "boom""#, None), None, 50)
            .await;

        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|l| l.contains("boom")));
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_other_pods() {
        let search = search(
            FakeCluster::new()
                .with_pod("prod", "a", &["app"])
                .with_pod("prod", "b", &["app"])
                .with_pod("prod", "c", &["app"])
                .with_logs("a", "app", &["t1 hello"])
                .with_logs("c", "app", &["t1 hello"])
                .with_broken_pod("b"),
        );

        let out = search.run("prod", &Query::default(), None, 50).await;

        assert_eq!(
            out,
            vec![
                "   1. [a/app] t1 hello",
                "[b] failed to read pod info: connection reset by peer",
                "   1. [c/app] t1 hello",
            ]
        );
    }

    #[tokio::test]
    async fn test_pod_list_failure_is_one_line() {
        let search = search(FakeCluster::new().with_broken_namespace("prod"));
        let out = search.run("prod", &Query::default(), None, 50).await;
        assert_eq!(
            out,
            vec!["error fetching pods in namespace 'prod': connection reset by peer"]
        );
    }

    #[tokio::test]
    async fn test_empty_namespace_reports_no_logs() {
        let search = search(FakeCluster::new().with_namespace("quiet"));
        let out = search.run("quiet", &Query::default(), None, 50).await;
        assert_eq!(out, vec!["no logs found"]);
    }

    #[tokio::test]
    async fn test_namespaces_sorted() {
        let search = search(
            FakeCluster::new()
                .with_namespace("zeta")
                .with_namespace("alpha")
                .with_namespace("mid"),
        );
        assert_eq!(
            search.list_namespaces().await.unwrap(),
            vec!["alpha", "mid", "zeta"]
        );
    }

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn test_run_future_is_send() {
        let search = search(FakeCluster::new());
        let query = Query::default();
        assert_send(&search.run("prod", &query, Some("api-0"), 50));
    }
}
