//! Log retrieval for logchat
//!
//! This crate resolves which pods to inspect, fetches and filters their
//! container logs, and numbers the surviving lines for display.

mod formatter;
mod resolver;
mod retriever;
mod search;

pub use formatter::LogFormatter;
pub use resolver::{PodResolver, ResolveError};
pub use retriever::LogRetriever;
pub use search::{LogSearch, SearchSettings};

// Re-export types used in our public API
pub use logchat_types::{
    DEFAULT_LIMIT, Diagnostic, FormattedLine, LogRecord, MAX_LIMIT, Query, ReplyLine,
    RetrievedLine,
};
