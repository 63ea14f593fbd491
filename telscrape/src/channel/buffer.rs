//! Line buffer for the decoder.
//!
//! Holds the bytes of the line currently being assembled. Telnet control
//! bytes never reach it; the decoder strips them first.

use bytes::BytesMut;

const CRLF: &[u8] = b"\r\n";

/// Accumulates the text of one line, byte by byte.
#[derive(Debug)]
pub struct LineBuffer {
    buffer: BytesMut,
}

impl LineBuffer {
    /// Create an empty buffer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Append one text byte.
    pub fn push(&mut self, byte: u8) {
        self.buffer.extend_from_slice(&[byte]);
    }

    /// Whether the buffer ends with the CR LF line terminator.
    pub fn ends_with_crlf(&self) -> bool {
        self.buffer.ends_with(CRLF)
    }

    /// Whether the last byte is a carriage return.
    pub fn ends_with_cr(&self) -> bool {
        self.buffer.last() == Some(&b'\r')
    }

    /// Take the line, without its terminator, and reset.
    pub fn take_line(&mut self) -> String {
        let raw = self.buffer.split();
        let text = raw.strip_suffix(CRLF).unwrap_or(&raw[..]);
        String::from_utf8_lossy(text).into_owned()
    }

    /// Take whatever is buffered, or `None` if nothing is.
    pub fn take_partial(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(self.take_line())
    }

    /// Get a reference to the buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the current buffer length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::with_capacity(256)
    }
}
