//! Transport layer: establishing the byte stream a session runs over.

pub mod config;
mod tcp;

pub use config::{DEFAULT_PORT, TransportConfig};
pub use tcp::{BoxedStream, TelnetStream, connect_tcp};
