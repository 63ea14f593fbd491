//! Telnet protocol units and option negotiation.
//!
//! Only the subset needed to drive a remote CLI is modelled: `IAC <verb> <code>`
//! triples and a pluggable policy for answering them.

mod negotiator;
mod option;

pub use negotiator::{NegotiationEvent, NegotiationObserver, Negotiator};
pub use option::{DO, DONT, IAC, SB, TelnetOption, Verb, WILL, WONT, option_name};
