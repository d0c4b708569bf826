//! Kubernetes client for logchat
//!
//! This crate defines the cluster operations the log pipeline depends on
//! ([`ClusterApi`]) and provides the `kube`-backed implementation.

mod api;
mod client;
mod error;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use api::ClusterApi;
pub use client::KubeClient;
pub use error::ClusterError;

// Re-export types that are used in our public API
pub use logchat_types::PodSummary;
