//! Generic platform definition.
//!
//! Any shell whose prompt ends in `#`, `$` or `:`. Option offers are left
//! unanswered.

use crate::platform::PlatformDefinition;
use crate::telnet::Negotiator;

/// Create the generic platform definition.
pub fn platform() -> PlatformDefinition {
    PlatformDefinition::new("generic").with_negotiator(Negotiator::ignore())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telnet::{TelnetOption, Verb};

    #[test]
    fn test_generic_platform() {
        let platform = platform();
        assert_eq!(platform.name, "generic");
        assert!(platform.on_open_commands.is_empty());
        assert!(
            platform
                .negotiator
                .respond(&[TelnetOption::new(Verb::Do, 1)])
                .is_empty()
        );
    }

    #[test]
    fn test_prompt_match() {
        let prompt = platform().compile_prompt().unwrap();
        assert_eq!(prompt.evaluate(b"user@host:~$").unwrap().prompt, "user@host:~$");
        assert!(prompt.evaluate(b"login:").is_some());
        assert!(prompt.evaluate(b"some output").is_none());
    }
}
