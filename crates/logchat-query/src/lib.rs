//! Query interpretation for logchat
//!
//! Turns free text such as `show error logs job payments/worker` into a
//! structured [`Query`]. Interpretation is pure and never fails.

mod rules;

use regex::Regex;
use std::sync::LazyLock;

pub use logchat_types::Query;
pub use rules::{DEFAULT_RULES, Effect, KeywordRule, Predicate};

/// `job <namespace>/<container>`, case-insensitive
static JOB_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)job\s+([\w-]+)/([\w-]+)").expect("JOB_TARGET pattern is valid")
});

/// Interprets user text against an ordered keyword rule table
#[derive(Clone, Debug)]
pub struct QueryInterpreter {
    rules: Vec<KeywordRule>,
}

impl QueryInterpreter {
    pub fn new() -> Self {
        Self::with_rules(DEFAULT_RULES.to_vec())
    }

    /// Use a custom rule table, evaluated front to back
    pub fn with_rules(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    /// Parse `text` into a query.
    ///
    /// An explicit `job ns/container` target overrides `default_namespace`.
    pub fn interpret(&self, text: &str, default_namespace: Option<&str>) -> Query {
        let (namespace, container) = match extract_target(text) {
            Some((ns, container)) => (Some(ns), Some(container)),
            None => (default_namespace.map(str::to_string), None),
        };

        let keyword = self.resolve_keyword(text);

        Query::new(namespace, container, keyword)
    }

    /// First rule that fires decides the keyword
    fn resolve_keyword(&self, text: &str) -> Option<String> {
        let lowered = text.to_lowercase();

        for rule in &self.rules {
            if let Some(keyword) = rule.apply(text, &lowered) {
                tracing::debug!(rule = rule.name, ?keyword, "keyword rule fired");
                return keyword;
            }
        }

        None
    }
}

impl Default for QueryInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpret with the default rule table
pub fn interpret(text: &str, default_namespace: Option<&str>) -> Query {
    QueryInterpreter::new().interpret(text, default_namespace)
}

fn extract_target(text: &str) -> Option<(String, String)> {
    let caps = JOB_TARGET.captures(text)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}
