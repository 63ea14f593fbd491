//! Alcatel-Lucent OmniStack 6200 platform definition.

use crate::platform::PlatformDefinition;
use crate::telnet::Negotiator;

const PROMPT_PATTERN: &str = r"(User Name:|Password:|\w+[>#]|\w+\(config\)#|\w+\(config-\w+\)#)$";

/// Create the OmniStack platform definition.
pub fn platform() -> PlatformDefinition {
    PlatformDefinition::new("omnistack")
        .with_prompt_pattern(PROMPT_PATTERN)
        .with_negotiator(Negotiator::refuse_all())
        .with_on_open_command("terminal datadump")
}
