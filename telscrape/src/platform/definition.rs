//! Platform definition for vendor-specific configurations.

use std::fmt;

use crate::channel::PromptPattern;
use crate::error::{ChannelError, Result};
use crate::telnet::Negotiator;

/// Configuration value describing one device family.
///
/// A session is parameterized by a platform rather than specialized per
/// vendor: the platform supplies the prompt pattern and the negotiation
/// policy, and carries data the vendor login layer acts on.
#[derive(Clone)]
pub struct PlatformDefinition {
    /// Platform name (e.g., "generic", "cisco_ios").
    pub name: String,

    /// Regex matching every prompt the device shows, including login
    /// prompts. Group 1, if present, is the prompt text.
    pub prompt_pattern: String,

    /// Option negotiation policy.
    pub negotiator: Negotiator,

    /// Commands to run once the shell is ready (e.g. disabling paging).
    pub on_open_commands: Vec<String>,
}

impl PlatformDefinition {
    /// Create a new platform definition using the default prompt pattern.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt_pattern: crate::channel::DEFAULT_PROMPT_PATTERN.to_string(),
            negotiator: Negotiator::ignore(),
            on_open_commands: vec![],
        }
    }

    /// Set the prompt pattern.
    pub fn with_prompt_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.prompt_pattern = pattern.into();
        self
    }

    /// Set the negotiation policy.
    pub fn with_negotiator(mut self, negotiator: Negotiator) -> Self {
        self.negotiator = negotiator;
        self
    }

    /// Add an on_open command.
    pub fn with_on_open_command(mut self, command: impl Into<String>) -> Self {
        self.on_open_commands.push(command.into());
        self
    }

    /// Compile the prompt pattern.
    pub fn compile_prompt(&self) -> Result<PromptPattern> {
        PromptPattern::new(&self.prompt_pattern).map_err(|e| ChannelError::from(e).into())
    }
}

impl fmt::Debug for PlatformDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformDefinition")
            .field("name", &self.name)
            .field("prompt_pattern", &self.prompt_pattern)
            .field("on_open_commands", &self.on_open_commands)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let platform = PlatformDefinition::new("lab")
            .with_prompt_pattern(r"(lab-\w+[>#])$")
            .with_negotiator(Negotiator::refuse_all())
            .with_on_open_command("terminal length 0");

        assert_eq!(platform.name, "lab");
        assert_eq!(platform.on_open_commands, vec!["terminal length 0"]);

        let prompt = platform.compile_prompt().unwrap();
        assert_eq!(prompt.evaluate(b"lab-sw1#").unwrap().prompt, "lab-sw1#");
    }

    #[test]
    fn test_invalid_prompt_pattern() {
        let platform = PlatformDefinition::new("broken").with_prompt_pattern("([");
        assert!(platform.compile_prompt().unwrap_err().is_config_error());
    }
}
