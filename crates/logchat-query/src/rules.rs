use regex::Regex;
use std::sync::LazyLock;

/// "all logs" with at most one word between: "show me all logs", "all error logs".
/// "all" and "logs" in unrelated clauses do not count.
static ALL_LOGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\ball\s+(?:\w+\s+)?logs\b").expect("ALL_LOGS pattern is valid")
});

/// First double-quoted span with at least one character
static QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"]+)""#).expect("QUOTED pattern is valid")
});

/// When a rule fires
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Predicate {
    /// The lower-cased text asks for every log line
    AllLogs,
    /// The lower-cased text contains this marker
    Contains(&'static str),
    /// The text, before lower-casing, holds a double-quoted span
    Quoted,
    /// Always fires
    Always,
}

/// What a fired rule sets the keyword to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    NoFilter,
    Keyword(&'static str),
    FirstQuoted,
    TrimmedText,
}

/// One entry of the keyword rule table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeywordRule {
    pub name: &'static str,
    pub predicate: Predicate,
    pub effect: Effect,
}

impl KeywordRule {
    pub const fn new(name: &'static str, predicate: Predicate, effect: Effect) -> Self {
        Self {
            name,
            predicate,
            effect,
        }
    }

    /// Evaluate the rule.
    ///
    /// Returns `None` when the rule does not fire, otherwise the keyword it yields
    /// (`Some(None)` meaning "no filtering").
    pub fn apply(&self, text: &str, lowered: &str) -> Option<Option<String>> {
        let fired = match self.predicate {
            Predicate::AllLogs => ALL_LOGS.is_match(lowered),
            Predicate::Contains(marker) => lowered.contains(marker),
            Predicate::Quoted => QUOTED.is_match(text),
            Predicate::Always => true,
        };

        if !fired {
            return None;
        }

        Some(match self.effect {
            Effect::NoFilter => None,
            Effect::Keyword(keyword) => Some(keyword.to_string()),
            Effect::FirstQuoted => first_quoted(text).map(str::to_string),
            Effect::TrimmedText => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
        })
    }
}

/// Keyword rules in priority order
pub const DEFAULT_RULES: [KeywordRule; 7] = [
    KeywordRule::new("all-logs", Predicate::AllLogs, Effect::NoFilter),
    KeywordRule::new("error", Predicate::Contains("error"), Effect::Keyword("error")),
    KeywordRule::new("warn", Predicate::Contains("warn"), Effect::Keyword("warn")),
    KeywordRule::new("info", Predicate::Contains("info"), Effect::Keyword("INFO")),
    KeywordRule::new("debug", Predicate::Contains("debug"), Effect::Keyword("DEBUG")),
    KeywordRule::new("quoted", Predicate::Quoted, Effect::FirstQuoted),
    KeywordRule::new("fallback", Predicate::Always, Effect::TrimmedText),
];

/// Only the first quoted span counts; later ones are ignored
fn first_quoted(text: &str) -> Option<&str> {
    QUOTED
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> KeywordRule {
        DEFAULT_RULES
            .iter()
            .copied()
            .find(|r| r.name == name)
            .unwrap()
    }

    fn run(name: &str, text: &str) -> Option<Option<String>> {
        rule(name).apply(text, &text.to_lowercase())
    }

    #[test]
    fn test_all_logs_rule() {
        assert_eq!(run("all-logs", "show all logs"), Some(None));
        assert_eq!(run("all-logs", "Show Me All Logs please"), Some(None));
        assert_eq!(run("all-logs", "show me all error logs"), Some(None));
        assert_eq!(run("all-logs", "show error logs"), None);
        assert_eq!(run("all-logs", "install logs"), None);
    }

    #[test]
    fn test_all_logs_needs_adjacent_words() {
        assert_eq!(run("all-logs", "find all errors in the api logs"), None);
        assert_eq!(
            run("all-logs", "are there any errors at all? check the logs"),
            None
        );
        assert_eq!(
            run("all-logs", "show warn lines from all pods, not the debug logs"),
            None
        );
    }

    #[test]
    fn test_level_rules() {
        assert_eq!(run("error", "Any ERRORS?"), Some(Some("error".to_string())));
        assert_eq!(run("warn", "warnings only"), Some(Some("warn".to_string())));
        assert_eq!(run("info", "info lines"), Some(Some("INFO".to_string())));
        assert_eq!(run("debug", "Debug output"), Some(Some("DEBUG".to_string())));
        assert_eq!(run("debug", "nothing here"), None);
    }

    #[test]
    fn test_quoted_rule_takes_first_span() {
        assert_eq!(
            run("quoted", r#"find "boot failed" or "oom" now"#),
            Some(Some("boot failed".to_string()))
        );
        assert_eq!(run("quoted", r#"empty "" quotes"#), None);
        assert_eq!(run("quoted", "no quotes"), None);
    }

    #[test]
    fn test_fallback_rule() {
        assert_eq!(
            run("fallback", "  random text  "),
            Some(Some("random text".to_string()))
        );
        assert_eq!(run("fallback", "   "), Some(None));
    }
}
