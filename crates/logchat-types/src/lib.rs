//! Shared types for logchat
//!
//! This crate contains data structures used across multiple logchat crates.

use std::fmt;

/// Hard ceiling on lines fetched per container, whatever the caller asks for
pub const MAX_LIMIT: i64 = 1000;

/// Lines fetched per container when the caller does not say
pub const DEFAULT_LIMIT: i64 = 50;

/// Clamp a requested line limit into `1..=MAX_LIMIT`
pub fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(1, MAX_LIMIT)
}

// ============================================================================
// Query Types
// ============================================================================

/// Structured lookup produced from free-text input
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    pub namespace: Option<String>,
    pub container: Option<String>,

    /// `None` means no filtering: every fetched line is kept
    pub keyword: Option<String>,
}

impl Query {
    pub fn new(
        namespace: Option<String>,
        container: Option<String>,
        keyword: Option<String>,
    ) -> Self {
        Self {
            namespace,
            container,
            keyword,
        }
    }

    /// Case-insensitive substring match against the keyword
    pub fn matches(&self, line: &str) -> bool {
        match &self.keyword {
            Some(keyword) => line.to_lowercase().contains(&keyword.to_lowercase()),
            None => true,
        }
    }
}

// ============================================================================
// Kubernetes Resource Types
// ============================================================================

/// Pod name plus the containers declared in its spec
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PodSummary {
    pub name: String,
    pub containers: Vec<String>,
}

impl PodSummary {
    pub fn new(name: impl Into<String>, containers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            containers,
        }
    }

    pub fn has_container(&self, container: &str) -> bool {
        self.containers.iter().any(|c| c == container)
    }
}

// ============================================================================
// Log Types
// ============================================================================

/// A retained log line, split into timestamp and message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRecord {
    pub pod: String,
    pub container: String,
    pub timestamp: Option<String>,
    pub message: String,
}

impl LogRecord {
    /// Split a raw line on its first whitespace run.
    ///
    /// The cluster prefixes each line with an RFC 3339 timestamp when asked to, so
    /// the first token is taken as the timestamp. A line without any whitespace is
    /// kept whole as the message.
    pub fn from_raw(pod: &str, container: &str, raw: &str) -> Self {
        let (timestamp, message) = match raw.split_once(char::is_whitespace) {
            Some((ts, rest)) if !ts.is_empty() => {
                (Some(ts.to_string()), rest.trim_start().to_string())
            }
            _ => (None, raw.to_string()),
        };

        Self {
            pod: pod.to_string(),
            container: container.to_string(),
            timestamp,
            message,
        }
    }
}

/// A numbered, display-ready log line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormattedLine {
    /// 1-based, restarting for each pod/container pair
    pub index: usize,
    pub pod: String,
    pub container: String,
    pub timestamp: Option<String>,
    pub message: String,
}

impl FormattedLine {
    pub fn new(index: usize, record: LogRecord) -> Self {
        Self {
            index,
            pod: record.pod,
            container: record.container,
            timestamp: record.timestamp,
            message: record.message,
        }
    }
}

impl fmt::Display for FormattedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.timestamp {
            Some(ts) => write!(
                f,
                "{:4}. [{}/{}] {} {}",
                self.index, self.pod, self.container, ts, self.message
            ),
            None => write!(
                f,
                "{:4}. [{}/{}] {}",
                self.index, self.pod, self.container, self.message
            ),
        }
    }
}

// ============================================================================
// Reply Types
// ============================================================================

/// User-visible explanation of something that went wrong or came back empty
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    ClientUnavailable,
    PodNotFound { pod: String, namespace: String },
    PodListFailed { namespace: String, detail: String },
    PodInfoFailed { pod: String, detail: String },
    LogFetchFailed {
        pod: String,
        container: String,
        detail: String,
    },
    NoLogs,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientUnavailable => write!(f, "kubernetes client is not initialized"),
            Self::PodNotFound { pod, namespace } => {
                write!(f, "pod '{}' not found in namespace '{}'", pod, namespace)
            }
            Self::PodListFailed { namespace, detail } => {
                write!(
                    f,
                    "error fetching pods in namespace '{}': {}",
                    namespace, detail
                )
            }
            Self::PodInfoFailed { pod, detail } => {
                write!(f, "[{}] failed to read pod info: {}", pod, detail)
            }
            Self::LogFetchFailed {
                pod,
                container,
                detail,
            } => write!(f, "[{}/{}] failed to fetch logs: {}", pod, container, detail),
            Self::NoLogs => write!(f, "no logs found"),
        }
    }
}

/// Output of log retrieval, before numbering
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RetrievedLine {
    Record(LogRecord),
    Diagnostic(Diagnostic),
}

impl From<Diagnostic> for RetrievedLine {
    fn from(d: Diagnostic) -> Self {
        Self::Diagnostic(d)
    }
}

/// One line of the final reply
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplyLine {
    Log(FormattedLine),
    Diagnostic(Diagnostic),
}

impl fmt::Display for ReplyLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Log(line) => fmt::Display::fmt(line, f),
            Self::Diagnostic(d) => fmt::Display::fmt(d, f),
        }
    }
}
