//! Channel layer: Telnet byte decoding and prompt detection.
//!
//! This module turns the raw byte stream into lines, prompts and option
//! batches. It performs no writes; answering options is the session's job.

mod buffer;
mod decoder;
mod patterns;

pub use buffer::LineBuffer;
pub use decoder::{DecodeEvent, Decoder};
pub use patterns::{DEFAULT_PROMPT_PATTERN, PromptMatch, PromptPattern};
