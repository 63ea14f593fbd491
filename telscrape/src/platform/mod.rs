//! Platform definitions for multi-vendor support.
//!
//! A platform is a configuration value: prompt pattern, negotiation policy
//! and on-open commands for one device family. Login and privilege flows
//! are built on top of a session by the caller.

mod definition;
mod registry;
pub mod vendors;

pub use definition::PlatformDefinition;
pub use registry::PlatformRegistry;
