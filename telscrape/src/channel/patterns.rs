//! Prompt pattern matching.
//!
//! A prompt pattern is a regex plus a convention for deriving the prompt
//! text: if the pattern has a capture group, group 1 is the prompt; if it has
//! none, the whole matched line is.

use regex::bytes::Regex;

/// Fallback pattern: any line ending in `#`, `$` or `:`.
pub const DEFAULT_PROMPT_PATTERN: &str = r".*[#$:]$";

/// A successful prompt match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMatch {
    /// The full line the pattern matched, without terminator.
    pub line: String,

    /// The canonical prompt text. Never empty.
    pub prompt: String,
}

/// A compiled prompt pattern.
#[derive(Debug, Clone)]
pub struct PromptPattern {
    regex: Regex,
    has_capture_group: bool,
    trim_trailing_whitespace: bool,
}

impl PromptPattern {
    /// Compile a prompt pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        Ok(Self {
            // Slot 0 is the implicit whole-match group.
            has_capture_group: regex.captures_len() > 1,
            regex,
            trim_trailing_whitespace: true,
        })
    }

    /// Whether captured prompt text is trimmed of trailing whitespace
    /// (default: true).
    pub fn trim_trailing_whitespace(mut self, trim: bool) -> Self {
        self.trim_trailing_whitespace = trim;
        self
    }

    /// Whether group 1 supplies the prompt text.
    pub fn has_capture_group(&self) -> bool {
        self.has_capture_group
    }

    /// Get the pattern source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Get a reference to the underlying regex.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Evaluate an in-progress line buffer.
    pub fn evaluate(&self, line: &[u8]) -> Option<PromptMatch> {
        let caps = self.regex.captures(line)?;
        let line = String::from_utf8_lossy(line)
            .trim_end_matches(['\r', '\n'])
            .to_string();

        let captured = if self.has_capture_group {
            caps.get(1).map(|group| {
                let text = String::from_utf8_lossy(group.as_bytes());
                if self.trim_trailing_whitespace {
                    text.trim_end().to_string()
                } else {
                    text.into_owned()
                }
            })
        } else {
            None
        };

        let prompt = match captured {
            Some(text) if !text.is_empty() => text,
            _ => line.clone(),
        };
        if prompt.is_empty() {
            return None;
        }

        Some(PromptMatch { line, prompt })
    }

    /// Classify a completed line of text.
    pub fn classify(&self, line: &str) -> Option<PromptMatch> {
        self.evaluate(line.as_bytes())
    }
}

impl Default for PromptPattern {
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_PROMPT_PATTERN).expect("default prompt pattern is valid"),
            has_capture_group: false,
            trim_trailing_whitespace: true,
        }
    }
}
