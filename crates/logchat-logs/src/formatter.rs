use std::collections::HashMap;

use logchat_types::{FormattedLine, ReplyLine, RetrievedLine};

/// Numbers retrieved lines for display
pub struct LogFormatter;

impl LogFormatter {
    /// Attach a 1-based index to every log record.
    ///
    /// Each pod/container pair counts from 1 on its own; diagnostics pass
    /// through unnumbered and order is preserved.
    pub fn number(lines: Vec<RetrievedLine>) -> Vec<ReplyLine> {
        let mut counters: HashMap<(String, String), usize> = HashMap::new();

        lines
            .into_iter()
            .map(|line| match line {
                RetrievedLine::Record(record) => {
                    let index = counters
                        .entry((record.pod.clone(), record.container.clone()))
                        .and_modify(|n| *n += 1)
                        .or_insert(1);
                    ReplyLine::Log(FormattedLine::new(*index, record))
                }
                RetrievedLine::Diagnostic(d) => ReplyLine::Diagnostic(d),
            })
            .collect()
    }

    /// Number and render to display strings
    pub fn format(lines: Vec<RetrievedLine>) -> Vec<String> {
        Self::number(lines)
            .into_iter()
            .map(|line| line.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logchat_types::{Diagnostic, LogRecord};

    fn rec(pod: &str, container: &str, raw: &str) -> RetrievedLine {
        RetrievedLine::Record(LogRecord::from_raw(pod, container, raw))
    }

    #[test]
    fn test_numbering_restarts_per_pair() {
        let out = LogFormatter::format(vec![
            rec("a", "app", "t1 one"),
            rec("a", "app", "t2 two"),
            rec("a", "proxy", "t1 three"),
            rec("b", "app", "t1 four"),
            rec("b", "app", "t2 five"),
            rec("b", "app", "t3 six"),
        ]);

        assert_eq!(
            out,
            vec![
                "   1. [a/app] t1 one",
                "   2. [a/app] t2 two",
                "   1. [a/proxy] t1 three",
                "   1. [b/app] t1 four",
                "   2. [b/app] t2 five",
                "   3. [b/app] t3 six",
            ]
        );
    }

    #[test]
    fn test_diagnostics_do_not_consume_indices() {
        let out = LogFormatter::format(vec![
            rec("a", "app", "t1 one"),
            RetrievedLine::Diagnostic(Diagnostic::LogFetchFailed {
                pod: "a".to_string(),
                container: "proxy".to_string(),
                detail: "stream closed".to_string(),
            }),
            rec("a", "app", "bare"),
        ]);

        assert_eq!(
            out,
            vec![
                "   1. [a/app] t1 one",
                "[a/proxy] failed to fetch logs: stream closed",
                "   2. [a/app] bare",
            ]
        );
    }

    #[test]
    fn test_indices_are_contiguous() {
        let mut lines = Vec::new();
        for i in 0..25 {
            lines.push(rec("a", "app", &format!("t{} a", i)));
            if i % 5 == 0 {
                lines.push(RetrievedLine::Diagnostic(Diagnostic::NoLogs));
            }
        }
        for i in 0..7 {
            lines.push(rec("b", "app", &format!("t{} b", i)));
        }

        let numbered = LogFormatter::number(lines);
        for pod in ["a", "b"] {
            let indices: Vec<usize> = numbered
                .iter()
                .filter_map(|l| match l {
                    ReplyLine::Log(f) if f.pod == pod => Some(f.index),
                    _ => None,
                })
                .collect();
            let expected: Vec<usize> = (1..=indices.len()).collect();
            assert_eq!(indices, expected);
        }
    }

    #[test]
    fn test_wide_indices_not_truncated() {
        let lines: Vec<RetrievedLine> = (0..10_000).map(|_| rec("a", "app", "x")).collect();
        let out = LogFormatter::format(lines);
        assert_eq!(out[9_999], "10000. [a/app] x");
    }
}
