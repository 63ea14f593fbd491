//! Cisco IOS platform definition.
//!
//! One pattern covers the login prompts, user and privileged exec, and the
//! configuration modes. Every option the device offers is refused, so no
//! window size or echo negotiation takes place.

use crate::platform::PlatformDefinition;
use crate::telnet::Negotiator;

const PROMPT_PATTERN: &str = r"([Uu]sername:|[Uu]ser:|[Pp]assword:|\w+[>#]|\w+\(config\)#|\w+\(config-\w+\)#)\s?$";

/// Create the Cisco IOS platform definition.
pub fn platform() -> PlatformDefinition {
    PlatformDefinition::new("cisco_ios")
        .with_prompt_pattern(PROMPT_PATTERN)
        .with_negotiator(Negotiator::refuse_all())
        .with_on_open_command("terminal length 0")
}
