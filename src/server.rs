//! HTTP API
//!
//! `GET /namespaces`, `GET /pods/{namespace}`, `POST /chat` and `GET /healthz`,
//! all answering JSON with permissive CORS.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use logchat_k8s::ClusterApi;

use crate::chat::{ChatReply, ChatRequest, ChatService};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamespacesResponse {
    pub namespaces: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PodsResponse {
    pub pods: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub cluster_connected: bool,
}

/// Build the application router
pub fn router<C>(service: Arc<ChatService<C>>) -> Router
where
    C: ClusterApi + 'static,
{
    Router::new()
        .route("/namespaces", get(namespaces::<C>))
        .route("/pods/{namespace}", get(pods::<C>))
        .route("/chat", post(chat::<C>))
        .route("/healthz", get(health::<C>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

/// Serve until `shutdown` is cancelled
pub async fn serve<C>(
    service: Arc<ChatService<C>>,
    bind: SocketAddr,
    shutdown: CancellationToken,
) -> Result<()>
where
    C: ClusterApi + 'static,
{
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .context(format!("Failed to bind {}", bind))?;
    tracing::info!(%bind, "listening");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("HTTP server failed")
}

async fn namespaces<C: ClusterApi>(
    State(service): State<Arc<ChatService<C>>>,
) -> Json<NamespacesResponse> {
    match service.search().list_namespaces().await {
        Ok(namespaces) => Json(NamespacesResponse {
            namespaces,
            error: None,
        }),
        Err(e) => {
            tracing::error!(error = %e, "error listing namespaces");
            Json(NamespacesResponse {
                namespaces: Vec::new(),
                error: Some(e.to_string()),
            })
        }
    }
}

async fn pods<C: ClusterApi>(
    State(service): State<Arc<ChatService<C>>>,
    Path(namespace): Path<String>,
) -> Json<PodsResponse> {
    Json(PodsResponse {
        pods: service.search().list_pods(&namespace).await,
    })
}

async fn chat<C: ClusterApi>(
    State(service): State<Arc<ChatService<C>>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Json<ChatReply> {
    match body {
        Ok(Json(request)) => Json(service.reply(request).await),
        Err(rejection) => {
            tracing::error!(error = %rejection, "invalid chat request");
            Json(ChatReply::line(format!(
                "Internal server error: {}",
                rejection.body_text()
            )))
        }
    }
}

async fn health<C: ClusterApi>(
    State(service): State<Arc<ChatService<C>>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        cluster_connected: service.search().is_connected(),
    })
}
