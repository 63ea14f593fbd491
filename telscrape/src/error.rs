//! Error types for telscrape.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for telscrape operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level errors (establishing the connection)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel errors (decoding, prompt detection)
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Session-level errors (state, writes)
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Platform/vendor errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

impl Error {
    /// The transport could not be established.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// A prompt boundary was never found, or reading the stream failed.
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Error::Channel(e) if !matches!(e, ChannelError::InvalidPattern(_)))
    }

    /// The session was set up wrongly: a prompt pattern that does not
    /// compile, or an unknown or conflicting platform.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::Channel(ChannelError::InvalidPattern(_)) | Error::Platform(_)
        )
    }

    /// A write to the transport failed mid-operation.
    pub fn is_command_error(&self) -> bool {
        matches!(self, Error::Session(SessionError::CommandFailed { .. }))
    }
}

/// Transport layer errors (TCP connection setup).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// Connecting took longer than the configured connect timeout
    #[error("Connection timed out after {0:?}")]
    Timeout(Duration),
}

/// Channel layer errors (byte decoding, prompt matching).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// The stream ended before the prompt pattern matched
    #[error("Prompt not found before end of stream{}", partial_suffix(.partial))]
    PromptNotFound { partial: Option<String> },

    /// Reading from the transport failed
    #[error("Read failed: {0}")]
    Read(#[source] io::Error),

    /// No prompt within the configured read timeout
    #[error("Prompt not found within {0:?}")]
    ReadTimeout(Duration),

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

fn partial_suffix(partial: &Option<String>) -> String {
    match partial {
        Some(text) => format!(" (unterminated output: {text:?})"),
        None => String::new(),
    }
}

/// Session layer errors (state machine, command writes).
#[derive(Error, Debug)]
pub enum SessionError {
    /// Session not connected
    #[error("Session not connected - call connect() first")]
    NotConnected,

    /// Session already connected
    #[error("Session already connected")]
    AlreadyConnected,

    /// Session was closed and cannot be reused
    #[error("Session closed")]
    Closed,

    /// Writing to the transport failed
    #[error("Command failed: {source}")]
    CommandFailed {
        #[source]
        source: io::Error,
    },
}

/// Platform/vendor definition errors.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Platform name not in the registry
    #[error("Unknown platform: '{name}'")]
    UnknownPlatform { name: String },

    /// Platform name already registered
    #[error("Platform already registered: '{name}'")]
    AlreadyRegistered { name: String },

    /// Invalid platform definition
    #[error("Invalid platform definition: {message}")]
    InvalidDefinition { message: String },
}

/// Result type alias using telscrape's Error.
pub type Result<T> = std::result::Result<T, Error>;
