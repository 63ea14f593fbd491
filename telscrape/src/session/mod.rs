//! Session layer: the read-to-prompt engine and its builder.
//!
//! A [`TelnetSession`] owns one transport. It writes lines, reads decoded
//! output up to the next prompt, and answers option negotiation inline.

mod builder;
mod engine;
mod response;

pub use builder::SessionBuilder;
pub use engine::{SessionState, TelnetSession};
pub use response::{ReadResult, Response};
