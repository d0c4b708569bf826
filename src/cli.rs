use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// logchat - ask a Kubernetes cluster for container logs in plain language
#[derive(Parser, Debug)]
#[command(name = "logchat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to ~/.logchat/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Kubernetes context name (defaults to the current context)
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the HTTP API
    Serve {
        /// Address to listen on, e.g. 0.0.0.0:8090
        #[arg(long)]
        bind: Option<String>,
    },

    /// Run a single query and print the reply
    Query {
        /// Free-text query, e.g. show error logs job myns/worker
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Namespace used when the query names none
        #[arg(short, long)]
        namespace: Option<String>,

        /// Restrict to a single pod
        #[arg(short, long)]
        pod: Option<String>,

        /// Lines fetched per container (capped at 1000)
        #[arg(long)]
        limit: Option<i64>,
    },
}
