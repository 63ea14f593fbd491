//! # Telscrape
//!
//! Async Telnet CLI scraper library for network device automation.
//!
//! Telscrape drives interactive, line-oriented shells over Telnet (RFC 854/855):
//! it decodes option negotiation out of the byte stream, answers it through a
//! pluggable policy, and provides the "write a line, read until the prompt
//! comes back" primitive that login and command automation is built on.
//!
//! ## Features
//!
//! - Byte-level IAC decoding with ordered option batches
//! - Prompt detection after every byte, so bare `Password:` prompts work
//! - Capture-group prompt convention (group 1 is the prompt text)
//! - Pluggable option negotiation with an observability hook
//! - Vendor platform profiles (generic, Cisco IOS, OmniStack)
//! - Optional read deadline
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use telscrape::SessionBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), telscrape::Error> {
//!     let mut session = SessionBuilder::new("192.168.1.1")
//!         .platform("cisco_ios")
//!         .build()?;
//!
//!     session.connect().await?;
//!
//!     // Login is the caller's job: answer whatever prompt shows up.
//!     let read = session.read_to_prompt().await?;
//!     if read.prompt.ends_with(':') {
//!         session.write("admin").await?;
//!         session.read_to_prompt().await?;
//!         session.write("secret").await?;
//!         session.read_to_prompt().await?;
//!     }
//!
//!     let response = session.send_command("show version").await?;
//!     println!("{}", response);
//!
//!     session.close().await;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod error;
pub mod platform;
pub mod session;
pub mod telnet;
pub mod transport;

// Re-export main types for convenience
pub use channel::{PromptMatch, PromptPattern};
pub use error::Error;
pub use platform::{PlatformDefinition, PlatformRegistry};
pub use session::{ReadResult, Response, SessionBuilder, SessionState, TelnetSession};
pub use telnet::{NegotiationEvent, NegotiationObserver, Negotiator, TelnetOption, Verb};
pub use transport::TransportConfig;
