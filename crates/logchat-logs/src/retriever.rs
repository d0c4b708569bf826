use futures::{StreamExt, stream};

use logchat_k8s::ClusterApi;
use logchat_types::{Diagnostic, LogRecord, Query, RetrievedLine, clamp_limit};

/// Fetches, filters and splits container logs for a set of pods
pub struct LogRetriever<'a, C> {
    cluster: &'a C,

    /// Pods fetched at once; results keep pod order regardless
    concurrency: usize,
}

impl<'a, C: ClusterApi> LogRetriever<'a, C> {
    pub fn new(cluster: &'a C) -> Self {
        Self {
            cluster,
            concurrency: 1,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Retrieve matching lines from every target pod.
    ///
    /// `limit` is clamped to [`logchat_types::MAX_LIMIT`]. A failing pod or
    /// container contributes one diagnostic and never stops the others. When
    /// nothing at all comes back the result is a single "no logs found" line.
    pub async fn fetch(
        &self,
        namespace: &str,
        query: &Query,
        pods: &[String],
        limit: i64,
    ) -> Vec<RetrievedLine> {
        let limit = clamp_limit(limit);

        // Owned names keep the per-pod futures free of higher-ranked borrows,
        // which the Send check on HTTP handlers cannot see through
        let per_pod: Vec<Vec<RetrievedLine>> = stream::iter(pods.iter().cloned())
            .map(|pod| async move { self.fetch_pod(namespace, query, &pod, limit).await })
            .buffered(self.concurrency)
            .collect()
            .await;

        let lines: Vec<RetrievedLine> = per_pod.into_iter().flatten().collect();
        if lines.is_empty() {
            return vec![Diagnostic::NoLogs.into()];
        }
        lines
    }

    async fn fetch_pod(
        &self,
        namespace: &str,
        query: &Query,
        pod: &str,
        limit: i64,
    ) -> Vec<RetrievedLine> {
        let summary = match self.cluster.get_pod(namespace, pod).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(namespace, pod, error = %e, "failed to read pod info");
                return vec![
                    Diagnostic::PodInfoFailed {
                        pod: pod.to_string(),
                        detail: e.to_string(),
                    }
                    .into(),
                ];
            }
        };

        // An unknown container name falls back to every container
        let targets: Vec<&str> = match query.container.as_deref() {
            Some(container) if summary.has_container(container) => vec![container],
            _ => summary.containers.iter().map(String::as_str).collect(),
        };

        let mut lines = Vec::new();
        for container in targets {
            match self
                .cluster
                .container_logs(namespace, pod, container, limit, true)
                .await
            {
                Ok(text) => lines.extend(
                    text.lines()
                        .filter(|line| query.matches(line))
                        .map(|line| {
                            RetrievedLine::Record(LogRecord::from_raw(pod, container, line))
                        }),
                ),
                Err(e) => {
                    tracing::warn!(
                        namespace,
                        pod,
                        container,
                        error = %e,
                        "failed to fetch logs"
                    );
                    lines.push(
                        Diagnostic::LogFetchFailed {
                            pod: pod.to_string(),
                            container: container.to_string(),
                            detail: e.to_string(),
                        }
                        .into(),
                    );
                }
            }
        }

        tracing::debug!(namespace, pod, lines = lines.len(), "pod logs retrieved");
        lines
    }
}
