//! Chat request handling: validate input, interpret it, run the log search

use serde::{Deserialize, Serialize};
use serde_json::Value;

use logchat_k8s::ClusterApi;
use logchat_logs::LogSearch;
use logchat_query::QueryInterpreter;

/// Body of `POST /chat`
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChatRequest {
    pub message: String,
    pub namespace: Option<String>,
    pub pod: Option<String>,

    /// A number or a numeric string
    pub limit: Option<Value>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_pod(mut self, pod: impl Into<String>) -> Self {
        self.pod = Some(pod.into());
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(Value::from(limit));
        self
    }
}

/// Body returned by `POST /chat`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    pub reply: Vec<String>,
}

impl ChatReply {
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            reply: vec![text.into()],
        }
    }
}

/// Answers chat requests against one cluster
pub struct ChatService<C> {
    search: LogSearch<C>,
    interpreter: QueryInterpreter,
    default_limit: i64,
}

impl<C: ClusterApi> ChatService<C> {
    pub fn new(search: LogSearch<C>, default_limit: i64) -> Self {
        Self {
            search,
            interpreter: QueryInterpreter::new(),
            default_limit,
        }
    }

    pub fn search(&self) -> &LogSearch<C> {
        &self.search
    }

    pub async fn reply(&self, request: ChatRequest) -> ChatReply {
        let message = request.message.trim();
        if message.is_empty() {
            return ChatReply::line("Please enter a search keyword.");
        }

        let namespace = non_blank(request.namespace.as_deref());
        let pod = non_blank(request.pod.as_deref());
        let limit = parse_limit(request.limit.as_ref()).unwrap_or(self.default_limit);

        let query = self.interpreter.interpret(message, namespace);
        let Some(namespace) = query.namespace.as_deref() else {
            return ChatReply::line("Please select or specify a namespace.");
        };

        tracing::info!(
            namespace,
            pod,
            container = query.container.as_deref(),
            keyword = query.keyword.as_deref(),
            limit,
            "chat query"
        );

        ChatReply {
            reply: self.search.run(namespace, &query, pod, limit).await,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_limit(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
