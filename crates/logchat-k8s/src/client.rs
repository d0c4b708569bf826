//! Kubernetes client for logchat

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::{Namespace, Pod};
use kube::Api;
use kube::api::{ListParams, LogParams};
use kube::config::KubeConfigOptions;

use crate::{ClusterApi, ClusterError, PodSummary};

/// Kubernetes client wrapper.
///
/// Built once at startup and shared read-only; every call is bounded by
/// `timeout`.
#[derive(Clone)]
pub struct KubeClient {
    client: kube::Client,
    timeout: Duration,
}

impl KubeClient {
    /// Create a client from the kubeconfig (or in-cluster config).
    ///
    /// With `context` set, that kubeconfig context is used instead of the current one.
    pub async fn new(context: Option<&str>, timeout: Duration) -> Result<Self> {
        let config = match context {
            Some(name) => kube::Config::from_kubeconfig(&KubeConfigOptions {
                context: Some(name.to_string()),
                ..Default::default()
            })
            .await
            .context(format!("Failed to create config for context: {}", name))?,
            None => kube::Config::infer()
                .await
                .context("Failed to infer kube config. Is kubectl configured?")?,
        };

        let client =
            kube::Client::try_from(config).context("Failed to create kubernetes client")?;

        Ok(Self::from_client(client, timeout))
    }

    pub fn from_client(client: kube::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Run a kube call under the request timeout
    async fn bounded<T, F>(&self, fut: F) -> Result<T, ClusterError>
    where
        F: Future<Output = Result<T, kube::Error>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(ClusterError::from),
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "cluster call timed out");
                Err(ClusterError::Timeout(self.timeout))
            }
        }
    }

    /// Convert a k8s Pod to PodSummary
    fn pod_to_summary(pod: Pod) -> PodSummary {
        let name = pod.metadata.name.unwrap_or_default();
        let containers = pod
            .spec
            .map(|spec| spec.containers.into_iter().map(|c| c.name).collect())
            .unwrap_or_default();
        PodSummary::new(name, containers)
    }
}

impl ClusterApi for KubeClient {
    async fn list_namespaces(&self) -> Result<Vec<String>, ClusterError> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        let list = self.bounded(namespaces.list(&ListParams::default())).await?;

        Ok(list
            .items
            .into_iter()
            .filter_map(|ns| ns.metadata.name)
            .collect())
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodSummary>, ClusterError> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let list = self.bounded(pods.list(&ListParams::default())).await?;

        Ok(list.items.into_iter().map(Self::pod_to_summary).collect())
    }

    async fn get_pod(&self, namespace: &str, name: &str) -> Result<PodSummary, ClusterError> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let pod = self.bounded(pods.get(name)).await?;

        Ok(Self::pod_to_summary(pod))
    }

    async fn container_logs(
        &self,
        namespace: &str,
        pod: &str,
        container: &str,
        tail_lines: i64,
        timestamps: bool,
    ) -> Result<String, ClusterError> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let params = LogParams {
            container: Some(container.to_string()),
            tail_lines: Some(tail_lines),
            timestamps,
            ..Default::default()
        };

        self.bounded(pods.logs(pod, &params)).await
    }
}
