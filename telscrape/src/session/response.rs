//! Result types for read-to-prompt and command execution.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Output collected up to, and including, the next prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadResult {
    /// Data lines in arrival order, terminators removed.
    pub lines: Vec<String>,

    /// The prompt that ended the read. Never empty.
    pub prompt: String,
}

impl ReadResult {
    pub(crate) fn new(lines: Vec<String>, prompt: String) -> Self {
        debug_assert!(!prompt.is_empty());
        Self { lines, prompt }
    }

    /// Whether no data lines preceded the prompt.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Response from a command execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    /// The command that was executed.
    pub command: String,

    /// Output lines, with the echoed command removed.
    pub lines: Vec<String>,

    /// The prompt that was matched at the end.
    pub prompt: String,

    /// Time taken to execute the command.
    pub elapsed: Duration,
}

impl Response {
    /// Build a response from a read, dropping the command echo if present.
    pub(crate) fn from_read(command: impl Into<String>, read: ReadResult, elapsed: Duration) -> Self {
        let command = command.into();
        let mut lines = read.lines;
        if lines.first().is_some_and(|first| *first == command) {
            lines.remove(0);
        }
        Self {
            command,
            lines,
            prompt: read.prompt,
            elapsed,
        }
    }

    /// The output joined with newlines.
    pub fn result(&self) -> String {
        self.lines.join("\n")
    }

    /// Check if any output line contains a substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.lines.iter().any(|line| line.contains(pattern))
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.result())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(lines: &[&str], prompt: &str) -> ReadResult {
        ReadResult::new(lines.iter().map(|l| l.to_string()).collect(), prompt.to_string())
    }

    #[test]
    fn test_echo_is_stripped() {
        let response = Response::from_read(
            "show clock",
            read(&["show clock", "*10:02:11.123 UTC Mon Oct 19 2026"], "router#"),
            Duration::from_millis(12),
        );
        assert_eq!(response.lines, vec!["*10:02:11.123 UTC Mon Oct 19 2026"]);
        assert_eq!(response.prompt, "router#");
        assert!(response.contains("UTC"));
    }

    #[test]
    fn test_echo_only_stripped_when_first() {
        let response = Response::from_read(
            "show clock",
            read(&["banner", "show clock"], "router#"),
            Duration::ZERO,
        );
        assert_eq!(response.lines, vec!["banner", "show clock"]);
    }

    #[test]
    fn test_result_and_display() {
        let response = Response::from_read("cmd", read(&["a", "b"], "sw1#"), Duration::ZERO);
        assert_eq!(response.result(), "a\nb");
        assert_eq!(response.to_string(), "a\nb");

        let empty = Response::from_read("cmd", read(&["cmd"], "sw1#"), Duration::ZERO);
        assert!(empty.lines.is_empty());
        assert_eq!(empty.result(), "");
    }

    #[test]
    fn test_read_result_serializes() {
        let json = serde_json::to_value(read(&["data1"], "router#")).unwrap();
        assert_eq!(json["lines"][0], "data1");
        assert_eq!(json["prompt"], "router#");
    }
}
