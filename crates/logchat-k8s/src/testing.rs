//! In-memory cluster for tests

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

use parking_lot::Mutex;

use crate::{ClusterApi, ClusterError, PodSummary};

/// Reported by calls configured to time out
const TIMEOUT: Duration = Duration::from_secs(15);

/// A call made against [`FakeCluster`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    ListNamespaces,
    ListPods(String),
    GetPod(String, String),
    ContainerLogs {
        pod: String,
        container: String,
        tail_lines: i64,
    },
}

/// Cluster double with canned pods and logs.
///
/// `container_logs` honours `tail_lines` the way the API server does.
#[derive(Default)]
pub struct FakeCluster {
    namespaces: BTreeMap<String, Vec<PodSummary>>,
    logs: HashMap<(String, String), String>,
    broken_pods: HashSet<String>,
    broken_containers: HashSet<(String, String)>,
    broken_namespaces: HashSet<String>,
    slow_pods: HashSet<String>,
    slow_containers: HashSet<(String, String)>,
    namespace_error: Option<ClusterError>,
    calls: Mutex<Vec<Call>>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespaces.entry(namespace.to_string()).or_default();
        self
    }

    pub fn with_pod(mut self, namespace: &str, pod: &str, containers: &[&str]) -> Self {
        self.namespaces
            .entry(namespace.to_string())
            .or_default()
            .push(PodSummary::new(
                pod,
                containers.iter().map(|c| c.to_string()).collect(),
            ));
        self
    }

    /// Set the log text for a container, one entry per line
    pub fn with_logs(mut self, pod: &str, container: &str, lines: &[&str]) -> Self {
        self.logs
            .insert((pod.to_string(), container.to_string()), lines.join("\n"));
        self
    }

    /// `get_pod` fails for this pod
    pub fn with_broken_pod(mut self, pod: &str) -> Self {
        self.broken_pods.insert(pod.to_string());
        self
    }

    /// `container_logs` fails for this pod/container
    pub fn with_broken_container(mut self, pod: &str, container: &str) -> Self {
        self.broken_containers
            .insert((pod.to_string(), container.to_string()));
        self
    }

    /// `get_pod` times out for this pod
    pub fn with_timeout_pod(mut self, pod: &str) -> Self {
        self.slow_pods.insert(pod.to_string());
        self
    }

    /// `container_logs` times out for this pod/container
    pub fn with_timeout_container(mut self, pod: &str, container: &str) -> Self {
        self.slow_containers
            .insert((pod.to_string(), container.to_string()));
        self
    }

    /// `list_pods` fails for this namespace
    pub fn with_broken_namespace(mut self, namespace: &str) -> Self {
        self.broken_namespaces.insert(namespace.to_string());
        self
    }

    /// `list_namespaces` fails with this error
    pub fn with_namespace_error(mut self, err: ClusterError) -> Self {
        self.namespace_error = Some(err);
        self
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Number of log fetches made so far
    pub fn log_fetches(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::ContainerLogs { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

impl ClusterApi for FakeCluster {
    async fn list_namespaces(&self) -> Result<Vec<String>, ClusterError> {
        self.record(Call::ListNamespaces);
        if let Some(err) = &self.namespace_error {
            return Err(err.clone());
        }
        Ok(self.namespaces.keys().cloned().collect())
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodSummary>, ClusterError> {
        self.record(Call::ListPods(namespace.to_string()));
        if self.broken_namespaces.contains(namespace) {
            return Err(ClusterError::Transport("connection reset by peer".to_string()));
        }
        Ok(self.namespaces.get(namespace).cloned().unwrap_or_default())
    }

    async fn get_pod(&self, namespace: &str, name: &str) -> Result<PodSummary, ClusterError> {
        self.record(Call::GetPod(namespace.to_string(), name.to_string()));
        if self.broken_pods.contains(name) {
            return Err(ClusterError::Transport("connection reset by peer".to_string()));
        }
        if self.slow_pods.contains(name) {
            return Err(ClusterError::Timeout(TIMEOUT));
        }
        self.namespaces
            .get(namespace)
            .and_then(|pods| pods.iter().find(|p| p.name == name))
            .cloned()
            .ok_or_else(|| ClusterError::NotFound(format!("pods \"{}\" not found", name)))
    }

    async fn container_logs(
        &self,
        _namespace: &str,
        pod: &str,
        container: &str,
        tail_lines: i64,
        _timestamps: bool,
    ) -> Result<String, ClusterError> {
        self.record(Call::ContainerLogs {
            pod: pod.to_string(),
            container: container.to_string(),
            tail_lines,
        });

        let key = (pod.to_string(), container.to_string());
        if self.broken_containers.contains(&key) {
            return Err(ClusterError::Transport("stream closed".to_string()));
        }
        if self.slow_containers.contains(&key) {
            return Err(ClusterError::Timeout(TIMEOUT));
        }

        let text = self.logs.get(&key).cloned().unwrap_or_default();
        let lines: Vec<&str> = text.lines().collect();
        let keep = usize::try_from(tail_lines).unwrap_or(0).min(lines.len());
        Ok(lines[lines.len() - keep..].join("\n"))
    }
}
