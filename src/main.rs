mod chat;
mod cli;
mod config;
mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use logchat_k8s::KubeClient;
use logchat_logs::{LogSearch, SearchSettings};

use chat::{ChatRequest, ChatService};
use cli::{Cli, Command};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli).await;

    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }

    result
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(context) = cli.context {
        config.cluster.context = Some(context);
    }

    let service = Arc::new(build_service(&config).await);

    match cli.command {
        Command::Serve { bind } => {
            let bind = bind.unwrap_or(config.server.bind);
            let addr: SocketAddr = bind
                .parse()
                .context(format!("Invalid bind address: {}", bind))?;

            let shutdown = CancellationToken::new();
            let signal = shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("shutting down");
                }
                signal.cancel();
            });

            server::serve(service, addr, shutdown).await
        }
        Command::Query {
            text,
            namespace,
            pod,
            limit,
        } => {
            let mut request = ChatRequest::new(text.join(" "));
            if let Some(namespace) = namespace {
                request = request.with_namespace(namespace);
            }
            if let Some(pod) = pod {
                request = request.with_pod(pod);
            }
            if let Some(limit) = limit {
                request = request.with_limit(limit);
            }

            for line in service.reply(request).await.reply {
                println!("{}", line);
            }
            Ok(())
        }
    }
}

/// Connect to the cluster once; a failed connection leaves the service running
/// in degraded mode rather than aborting startup.
async fn build_service(config: &Config) -> ChatService<KubeClient> {
    let client = match KubeClient::new(
        config.cluster.context.as_deref(),
        config.cluster.request_timeout(),
    )
    .await
    {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::error!("Failed to load kube config: {:#}", e);
            None
        }
    };

    let search = LogSearch::new(
        client,
        SearchSettings {
            max_concurrent_pods: config.logs.max_concurrent_pods,
        },
    );

    ChatService::new(search, config.logs.default_limit)
}
