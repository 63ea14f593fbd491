//! Telnet stream decoder.
//!
//! Splits the raw byte stream into line text and `IAC <verb> <code>` units.
//! The prompt pattern is evaluated after every appended text byte, so a prompt
//! without a trailing newline (`Password:`) ends a decode pass as soon as it
//! is complete.
//!
//! Options are collected into a batch. The batch is released to the caller:
//! - at the end of a decode pass, before the line or prompt that ended it, and
//! - whenever every received byte has been consumed and the next read would
//!   wait on the remote, so a handshake can be answered before more text
//!   arrives.

use std::io;
use std::mem;

use log::trace;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use super::buffer::LineBuffer;
use super::patterns::{PromptMatch, PromptPattern};
use crate::telnet::{IAC, TelnetOption};

/// Outcome of one [`Decoder::next_event`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeEvent {
    /// A batch of options to negotiate. The line in progress is kept.
    Options(Vec<TelnetOption>),

    /// A CR LF terminated line, terminator removed.
    Line(String),

    /// The line buffer matched the prompt pattern.
    Prompt(PromptMatch),

    /// The stream ended. `partial` holds any unterminated text.
    Eof { partial: Option<String> },
}

/// Byte-at-a-time Telnet decoder over a buffered reader.
#[derive(Debug)]
pub struct Decoder<R> {
    reader: BufReader<R>,
    line: LineBuffer,
    batch: Vec<TelnetOption>,
    ready: Option<DecodeEvent>,
    /// IAC seen: `Some(None)` awaits the verb, `Some(Some(verb))` the code.
    pending_iac: Option<Option<u8>>,
    swallow_lf: bool,
}

impl<R: AsyncRead + Unpin> Decoder<R> {
    /// Create a decoder reading from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line: LineBuffer::default(),
            batch: Vec::new(),
            ready: None,
            pending_iac: None,
            swallow_lf: false,
        }
    }

    /// Release the underlying reader. Buffered bytes are discarded.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    /// Return an event so the next call to `next_event` yields it again.
    pub fn push_back(&mut self, event: DecodeEvent) {
        debug_assert!(self.ready.is_none(), "only one event can be pushed back");
        self.ready = Some(event);
    }

    /// Bytes of the line currently being assembled.
    pub fn pending_line(&self) -> &[u8] {
        self.line.as_slice()
    }

    /// Decode until a line, a prompt, an option batch or end of stream.
    ///
    /// Cancel safe: every byte taken from the reader is recorded in the
    /// decoder before the next await, including a partly received IAC unit,
    /// so dropping the future and calling again loses nothing.
    pub async fn next_event(&mut self, prompt: &PromptPattern) -> io::Result<DecodeEvent> {
        if let Some(event) = self.ready.take() {
            return Ok(event);
        }

        loop {
            if !self.batch.is_empty() && self.reader.buffer().is_empty() {
                return Ok(DecodeEvent::Options(mem::take(&mut self.batch)));
            }

            let Some(byte) = self.next_byte().await? else {
                if self.pending_iac.take().is_some() {
                    trace!("stream ended inside an IAC sequence");
                }
                let partial = self.line.take_partial();
                return Ok(self.finish(DecodeEvent::Eof { partial }));
            };

            match self.pending_iac {
                Some(None) => {
                    self.pending_iac = Some(Some(byte));
                    continue;
                }
                Some(Some(verb)) => {
                    self.pending_iac = None;
                    let option = TelnetOption::from_pair(verb, byte);
                    trace!("decoded option: {}", option);
                    self.batch.push(option);
                    continue;
                }
                None if byte == IAC => {
                    self.pending_iac = Some(None);
                    continue;
                }
                None => {}
            }

            // LF left over from a prompt matched on its trailing CR.
            if mem::take(&mut self.swallow_lf) && byte == b'\n' && self.line.is_empty() {
                continue;
            }

            self.line.push(byte);

            if let Some(matched) = prompt.evaluate(self.line.as_slice()) {
                trace!("prompt matched: {:?}", matched.prompt);
                self.swallow_lf = self.line.ends_with_cr();
                self.line.clear();
                return Ok(self.finish(DecodeEvent::Prompt(matched)));
            }

            if self.line.ends_with_crlf() {
                let text = self.line.take_line();
                return Ok(self.finish(DecodeEvent::Line(text)));
            }
        }
    }

    /// Hand out the pending batch first, holding `event` for the next call.
    fn finish(&mut self, event: DecodeEvent) -> DecodeEvent {
        if self.batch.is_empty() {
            event
        } else {
            self.ready = Some(event);
            DecodeEvent::Options(mem::take(&mut self.batch))
        }
    }

    /// Take one byte. The byte is consumed only once it has been returned.
    async fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = self.reader.fill_buf().await?.first().copied();
        if byte.is_some() {
            self.reader.consume(1);
        }
        Ok(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telnet::Verb;

    fn never() -> PromptPattern {
        PromptPattern::new(r"^NEVER MATCHES$").unwrap()
    }

    async fn drain(input: &[u8], prompt: &PromptPattern) -> Vec<DecodeEvent> {
        let mut decoder = Decoder::new(input);
        let mut events = Vec::new();
        loop {
            let event = decoder.next_event(prompt).await.unwrap();
            let done = matches!(event, DecodeEvent::Eof { .. });
            events.push(event);
            if done {
                return events;
            }
        }
    }

    #[tokio::test]
    async fn test_plain_lines_pass_through() {
        let input = b"show version\r\n  Cisco IOS\tSoftware \r\n\r\nend\r\n";
        let events = drain(input, &never()).await;
        assert_eq!(
            events,
            vec![
                DecodeEvent::Line("show version".into()),
                DecodeEvent::Line("  Cisco IOS\tSoftware ".into()),
                DecodeEvent::Line(String::new()),
                DecodeEvent::Line("end".into()),
                DecodeEvent::Eof { partial: None },
            ]
        );
    }

    #[tokio::test]
    async fn test_options_are_removed_from_text() {
        let input = b"ab\xff\xfd\x01cd\xff\xfb\x03\xff\xfa\x18e\r\n";
        let events = drain(input, &never()).await;
        assert_eq!(
            events,
            vec![
                DecodeEvent::Options(vec![
                    TelnetOption::new(Verb::Do, 1),
                    TelnetOption::new(Verb::Will, 3),
                    TelnetOption::new(Verb::Subnegotiation, 24),
                ]),
                DecodeEvent::Line("abcde".into()),
                DecodeEvent::Eof { partial: None },
            ]
        );
    }

    #[tokio::test]
    async fn test_prompt_without_terminator() {
        let prompt = PromptPattern::new(r"(Username:)\s?$").unwrap();
        let events = drain(b"Username: ", &prompt).await;
        assert_eq!(
            events[0],
            DecodeEvent::Prompt(PromptMatch {
                line: "Username:".into(),
                prompt: "Username:".into(),
            })
        );
        // The pad space stays in the stream.
        assert_eq!(events[1], DecodeEvent::Eof { partial: Some(" ".into()) });
    }

    #[tokio::test]
    async fn test_lf_after_prompt_cr_is_swallowed() {
        // Needs one whitespace byte, so it first matches on the CR.
        let prompt = PromptPattern::new(r"(\w+:)\s$").unwrap();
        let events = drain(b"Login:\r\nnext\r\n", &prompt).await;
        assert_eq!(
            events,
            vec![
                DecodeEvent::Prompt(PromptMatch {
                    line: "Login:".into(),
                    prompt: "Login:".into(),
                }),
                DecodeEvent::Line("next".into()),
                DecodeEvent::Eof { partial: None },
            ]
        );
    }

    #[tokio::test]
    async fn test_unterminated_text_at_eof() {
        let events = drain(b"partial output", &never()).await;
        assert_eq!(
            events,
            vec![DecodeEvent::Eof {
                partial: Some("partial output".into())
            }]
        );
    }

    #[tokio::test]
    async fn test_truncated_option_at_eof() {
        let events = drain(b"x\r\n\xff\xfd", &never()).await;
        assert_eq!(
            events,
            vec![
                DecodeEvent::Line("x".into()),
                DecodeEvent::Eof { partial: None },
            ]
        );
    }

    #[tokio::test]
    async fn test_batch_released_when_input_drained() {
        let mock = tokio_test::io::Builder::new()
            .read(b"\xff\xfd\x01\xff\xfd\x03")
            .read(b"router#")
            .build();
        let prompt = PromptPattern::new(r"(\w+#)$").unwrap();
        let mut decoder = Decoder::new(mock);

        let first = decoder.next_event(&prompt).await.unwrap();
        assert_eq!(
            first,
            DecodeEvent::Options(vec![
                TelnetOption::new(Verb::Do, 1),
                TelnetOption::new(Verb::Do, 3),
            ])
        );
        assert!(decoder.pending_line().is_empty());

        let second = decoder.next_event(&prompt).await.unwrap();
        assert!(matches!(second, DecodeEvent::Prompt(ref m) if m.prompt == "router#"));
    }

    #[tokio::test]
    async fn test_options_counted_in_order() {
        let mut input = Vec::new();
        for code in 0..40u8 {
            input.extend_from_slice(&[0xFF, 0xFD, code]);
            input.push(b'a' + (code % 26));
        }
        input.extend_from_slice(b"\r\n");

        let events = drain(&input, &never()).await;
        let DecodeEvent::Options(batch) = &events[0] else {
            panic!("expected an option batch first, got {:?}", events[0]);
        };
        assert_eq!(batch.len(), 40);
        assert!(batch.iter().enumerate().all(|(i, o)| o.code() == i as u8));

        let DecodeEvent::Line(text) = &events[1] else {
            panic!("expected a line, got {:?}", events[1]);
        };
        assert_eq!(text.len(), 40);
        assert!(!text.as_bytes().contains(&0xFF));
    }

    #[tokio::test]
    async fn test_resumes_option_split_by_cancellation() {
        use std::time::Duration;
        use tokio::io::AsyncWriteExt;

        let (client, mut server) = tokio::io::duplex(64);
        let prompt = PromptPattern::new(r"(\w+#)$").unwrap();
        let mut decoder = Decoder::new(client);

        server.write_all(b"\xff").await.unwrap();
        let cancelled =
            tokio::time::timeout(Duration::from_millis(50), decoder.next_event(&prompt)).await;
        assert!(cancelled.is_err());

        server.write_all(b"\xfd\x01data\r\nrouter#").await.unwrap();
        assert_eq!(
            decoder.next_event(&prompt).await.unwrap(),
            DecodeEvent::Options(vec![TelnetOption::new(Verb::Do, 1)])
        );
        assert_eq!(
            decoder.next_event(&prompt).await.unwrap(),
            DecodeEvent::Line("data".into())
        );
        assert!(matches!(
            decoder.next_event(&prompt).await.unwrap(),
            DecodeEvent::Prompt(ref m) if m.prompt == "router#"
        ));
    }

    #[tokio::test]
    async fn test_push_back() {
        let mut decoder = Decoder::new(&b"one\r\n"[..]);
        let prompt = never();
        let event = decoder.next_event(&prompt).await.unwrap();
        decoder.push_back(event.clone());
        assert_eq!(decoder.next_event(&prompt).await.unwrap(), event);
    }
}
